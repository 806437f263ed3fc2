//! Issue collector (C8): an append-only list of diagnostics plus an error
//! cap. Above the cap, later errors degrade to a single summary issue
//! (§4.7, §4.8).

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use cel_common::position::{LineMap, Position};
use cel_common::Span;

/// Severity ordering matches the LSP-ish vocabulary the teacher's
/// diagnostics model already uses; only `Error` marks a result invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Deprecated,
    Information,
    Warning,
    Error,
}

/// One collected issue: severity, source span, and a fully-rendered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub span: Span,
    pub code: u32,
    pub message: String,
}

impl Issue {
    /// Renders as `"<sev>: <input>:<line>:<col>: <msg> (in container
    /// '<c>')"` (§4.8). When `source` is empty or the span's offsets are
    /// out of range, falls back to `(-1,-1)` rather than panicking — a
    /// checker must never abort rendering on inconsistent source info.
    pub fn render(&self, input_name: &str, container: &str, source: &str, line_map: &LineMap) -> String {
        let (line, col) = self.position(source, line_map);
        format!(
            "{}: {}:{}:{}: {} (in container '{}')",
            severity_label(self.severity),
            input_name,
            line,
            col,
            self.message,
            container
        )
    }

    fn position(&self, source: &str, line_map: &LineMap) -> (i64, i64) {
        if self.span.start as usize > source.len() {
            return (-1, -1);
        }
        let Position { line, character } = line_map.offset_to_position(self.span.start, source);
        (i64::from(line), i64::from(character))
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARNING",
        Severity::Information => "INFO",
        Severity::Deprecated => "DEPRECATED",
    }
}

/// Per-call collector. Created fresh at the start of every `Check()` and
/// discarded at its end (§5) — never shared across calls.
pub struct IssueCollector {
    issues: Vec<Issue>,
    error_count: u32,
    max_error_issues: u32,
    summary_emitted: bool,
}

impl IssueCollector {
    pub fn new(max_error_issues: u32) -> Self {
        Self {
            issues: Vec::new(),
            error_count: 0,
            max_error_issues,
            summary_emitted: false,
        }
    }

    /// Returns `true` if an error-severity issue has already been recorded
    /// past the cap — the walker uses this to skip more work on a node
    /// whose errors would never surface anyway, though it is never required
    /// to stop.
    pub fn at_error_cap(&self) -> bool {
        self.summary_emitted
    }

    pub fn push_error(&mut self, span: Span, code: u32, message: impl Into<String>) {
        if self.summary_emitted {
            return;
        }
        if self.max_error_issues > 0 && self.error_count >= self.max_error_issues {
            self.issues.push(Issue {
                severity: Severity::Error,
                span,
                code: diagnostic_codes::TOO_MANY_ERRORS,
                message: format_message(
                    diagnostic_messages::TOO_MANY_ERRORS,
                    &[&self.max_error_issues.to_string()],
                ),
            });
            self.summary_emitted = true;
            return;
        }
        self.issues.push(Issue {
            severity: Severity::Error,
            span,
            code,
            message: message.into(),
        });
        self.error_count += 1;
    }

    pub fn push_warning(&mut self, span: Span, code: u32, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            span,
            code,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0 || self.summary_emitted
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn errors_past_cap_collapse_to_one_summary() {
        let mut collector = IssueCollector::new(2);
        collector.push_error(span(), 1, "first");
        collector.push_error(span(), 1, "second");
        collector.push_error(span(), 1, "third");
        collector.push_error(span(), 1, "fourth");
        assert_eq!(collector.issues().len(), 3);
        assert!(collector.issues().last().unwrap().message.contains("too many errors"));
    }

    #[test]
    fn warnings_never_count_toward_the_cap() {
        let mut collector = IssueCollector::new(1);
        collector.push_warning(span(), 2, "a warning");
        collector.push_error(span(), 1, "one error");
        assert!(collector.has_errors());
        assert_eq!(collector.issues().len(), 2);
    }

    #[test]
    fn zero_cap_means_unbounded() {
        let mut collector = IssueCollector::new(0);
        for _ in 0..50 {
            collector.push_error(span(), 1, "err");
        }
        assert_eq!(collector.issues().len(), 50);
    }

    #[test]
    fn render_falls_back_on_out_of_range_offset() {
        let issue = Issue {
            severity: Severity::Error,
            span: Span::new(1000, 1001),
            code: 1,
            message: "oops".to_string(),
        };
        let line_map = LineMap::build("short");
        let rendered = issue.render("<input>", "", "short", &line_map);
        assert!(rendered.contains("-1:-1"));
    }
}
