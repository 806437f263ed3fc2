//! Common types and utilities shared across the CEL type-checker crates.
//!
//! This crate provides foundational pieces used by `cel-checker`:
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`, `ByteSpan`)
//! - Line/column position conversion (`LineMap`, `Position`, `Location`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, `format_message`)
//! - Checker options (`CheckerOptions`)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{ByteSpan, Span, SpanBuilder, Spanned};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Location, Position, Range, SourceLocation};

// Diagnostics: severities, rendering, and the CEL-specific message table
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, diagnostic_codes,
    diagnostic_messages, format_message,
};

// Checker options (the six knobs from the external-interfaces contract)
pub mod options;
pub use options::CheckerOptions;

// Centralized limits and thresholds
pub mod limits;
