//! Options controlling type-checker behavior.
//!
//! This module lives in `cel-common` so that both the checker and any
//! embedding application can reference `CheckerOptions` without creating a
//! circular dependency.

/// Options for a built checker, set once via the builder and frozen into the
/// environment for the lifetime of every `Check()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// When true, relational overloads are exposed between distinct numeric
    /// types (e.g. `1.0 < 2` resolves to `less_double_int64`). Callers must
    /// otherwise cast operands to a common numeric type or to `dyn` before
    /// comparing them.
    pub enable_cross_numeric_comparisons: bool,
    /// When true, `null` is assignable to message, `Duration`, `Timestamp`,
    /// and abstract types. Historically CEL allowed this; it is inconsistent
    /// with the usual interpretation of `null` as the JSON null literal, so
    /// new environments should migrate towards turning it off.
    pub enable_legacy_null_assignment: bool,
    /// When true, the reference recorded for a struct-creation node carries
    /// the fully-qualified message name even when the expression used an
    /// unqualified or container-relative name.
    pub update_struct_type_names: bool,
    /// When true, a context declaration naming a well-known type (wrapper,
    /// `Any`, `Duration`, `Timestamp`) is accepted; otherwise it is rejected
    /// at build time with "not a struct".
    pub allow_well_known_type_context_declarations: bool,
    /// Maximum number of error-severity issues to collect before collapsing
    /// the remainder into a single summary issue.
    pub max_error_issues: u32,
    /// Maximum number of AST nodes a single `Check()` call will visit before
    /// aborting with a hard failure. `None` means unbounded.
    pub max_expression_node_count: Option<u32>,
}

/// Recommended default node budget when a caller wants a bound but has not
/// measured one for their own expressions. Canonical definition lives in
/// [`crate::limits`]; re-exported here since callers reach for it next to
/// the field it bounds.
pub use crate::limits::RECOMMENDED_MAX_EXPRESSION_NODE_COUNT;

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            enable_cross_numeric_comparisons: false,
            enable_legacy_null_assignment: true,
            update_struct_type_names: true,
            allow_well_known_type_context_declarations: false,
            max_error_issues: 20,
            max_expression_node_count: None,
        }
    }
}
