//! Diagnostics: severities, rendering, and the CEL-specific message table.
//!
//! A `Diagnostic` carries a stable numeric `code`, a byte range into the
//! checked expression's source, and a fully-rendered `message_text` (already
//! expanded via [`format_message`]). Error-severity diagnostics mark a
//! `ValidationResult` invalid; `Warning`/`Suggestion`/`Message` never do.

pub mod data;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_messages {
    pub use super::data::diagnostic_messages::*;
}

pub mod diagnostic_codes {
    pub use super::data::diagnostic_codes::*;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    use self::data::DIAGNOSTIC_MESSAGES;
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_overload_matches_scenario_text() {
        let template = get_message_template(diagnostic_codes::NO_MATCHING_OVERLOAD).unwrap();
        let rendered = format_message(template, &["_+_", "int, string"]);
        assert_eq!(
            rendered,
            "no matching overload for '_+_' applied to '(int, string)'"
        );
    }

    #[test]
    fn comprehension_range_matches_scenario_text() {
        let template =
            get_message_template(diagnostic_codes::UNSUPPORTED_COMPREHENSION_RANGE).unwrap();
        let rendered = format_message(template, &["string"]);
        assert_eq!(
            rendered,
            "expression of type 'string' cannot be the range of a comprehension"
        );
    }

    #[test]
    fn field_type_mismatch_matches_scenario_text() {
        let template = get_message_template(diagnostic_codes::FIELD_TYPE_MISMATCH).unwrap();
        let rendered = format_message(
            template,
            &["single_duration", "google.protobuf.Duration", "null_type"],
        );
        assert_eq!(
            rendered,
            "'single_duration' is 'google.protobuf.Duration' but provided type is 'null_type'"
        );
    }

    #[test]
    fn error_diagnostic_renders_with_code() {
        let d = Diagnostic::error(
            "<input>",
            3,
            1,
            format_message(
                get_message_template(diagnostic_codes::NO_MATCHING_OVERLOAD).unwrap(),
                &["_+_", "int, string"],
            ),
            diagnostic_codes::NO_MATCHING_OVERLOAD,
        );
        assert_eq!(d.category, DiagnosticCategory::Error);
        assert_eq!(d.code, 3004);
        assert!(d.message_text.contains("no matching overload"));
    }
}
