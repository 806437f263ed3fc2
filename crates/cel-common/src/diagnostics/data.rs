//! Diagnostic message table for the CEL type checker.
//!
//! Codes are grouped by the error kinds enumerated in the error handling
//! design: undeclared references, field errors, overload resolution,
//! comprehension and construction errors, and build-time errors.
use super::DiagnosticCategory;
use super::DiagnosticMessage;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: 3001,
        category: DiagnosticCategory::Error,
        message: "undeclared reference to '{0}' (in container '{1}')",
    },
    DiagnosticMessage {
        code: 3002,
        category: DiagnosticCategory::Error,
        message: "undeclared reference to function '{0}'",
    },
    DiagnosticMessage {
        code: 3003,
        category: DiagnosticCategory::Error,
        message: "undefined field '{0}' not found in struct '{1}'",
    },
    DiagnosticMessage {
        code: 3004,
        category: DiagnosticCategory::Error,
        message: "no matching overload for '{0}' applied to '({1})'",
    },
    DiagnosticMessage {
        code: 3005,
        category: DiagnosticCategory::Error,
        message: "ambiguous overload for '{0}' applied to '({1})': {2}",
    },
    DiagnosticMessage {
        code: 3006,
        category: DiagnosticCategory::Error,
        message: "'{0}' is '{1}' but provided type is '{2}'",
    },
    DiagnosticMessage {
        code: 3007,
        category: DiagnosticCategory::Error,
        message: "expression of type '{0}' cannot be the range of a comprehension",
    },
    DiagnosticMessage {
        code: 3008,
        category: DiagnosticCategory::Warning,
        message: "unsupported map key type '{0}'",
    },
    DiagnosticMessage {
        code: 3009,
        category: DiagnosticCategory::Error,
        message: "expression of type '{0}' cannot be the operand of a select operation",
    },
    DiagnosticMessage {
        code: 3010,
        category: DiagnosticCategory::Error,
        message: "'{0}' is not a message type and cannot be constructed with field initializers",
    },
    DiagnosticMessage {
        code: 3011,
        category: DiagnosticCategory::Error,
        message: "too many errors; stopping after {0} issues",
    },
    DiagnosticMessage {
        code: 3012,
        category: DiagnosticCategory::Error,
        message: "no deducible type for node '{0}'",
    },
    DiagnosticMessage {
        code: 3013,
        category: DiagnosticCategory::Error,
        message: "expression node count {0} exceeds the maximum of {1}",
    },
    DiagnosticMessage {
        code: 4001,
        category: DiagnosticCategory::Error,
        message: "duplicate declaration of variable '{0}'",
    },
    DiagnosticMessage {
        code: 4002,
        category: DiagnosticCategory::Error,
        message: "duplicate declaration of function '{0}'",
    },
    DiagnosticMessage {
        code: 4003,
        category: DiagnosticCategory::Error,
        message: "duplicate overload id '{0}' on function '{1}'",
    },
    DiagnosticMessage {
        code: 4004,
        category: DiagnosticCategory::Error,
        message: "overload '{0}' is incompatible with an existing overload '{1}' on function '{2}'",
    },
    DiagnosticMessage {
        code: 4005,
        category: DiagnosticCategory::Error,
        message: "context declaration '{0}' could not be resolved in the schema: {1}",
    },
    DiagnosticMessage {
        code: 4006,
        category: DiagnosticCategory::Error,
        message: "context declaration '{0}' names '{1}', which is not a struct",
    },
];

pub mod diagnostic_messages {
    pub const UNDECLARED_REFERENCE: &str = "undeclared reference to '{0}' (in container '{1}')";
    pub const UNDECLARED_FUNCTION_REFERENCE: &str = "undeclared reference to function '{0}'";
    pub const UNDEFINED_FIELD: &str = "undefined field '{0}' not found in struct '{1}'";
    pub const NO_MATCHING_OVERLOAD: &str = "no matching overload for '{0}' applied to '({1})'";
    pub const AMBIGUOUS_OVERLOAD: &str =
        "ambiguous overload for '{0}' applied to '({1})': {2}";
    pub const FIELD_TYPE_MISMATCH: &str = "'{0}' is '{1}' but provided type is '{2}'";
    pub const UNSUPPORTED_COMPREHENSION_RANGE: &str =
        "expression of type '{0}' cannot be the range of a comprehension";
    pub const UNSUPPORTED_MAP_KEY_TYPE: &str = "unsupported map key type '{0}'";
    pub const NON_SELECTABLE_TYPE: &str =
        "expression of type '{0}' cannot be the operand of a select operation";
    pub const NOT_A_MESSAGE_TYPE: &str =
        "'{0}' is not a message type and cannot be constructed with field initializers";
    pub const TOO_MANY_ERRORS: &str = "too many errors; stopping after {0} issues";
    pub const NO_DEDUCIBLE_TYPE: &str = "no deducible type for node '{0}'";
    pub const EXPRESSION_NODE_COUNT_EXCEEDED: &str =
        "expression node count {0} exceeds the maximum of {1}";
    pub const DUPLICATE_VARIABLE: &str = "duplicate declaration of variable '{0}'";
    pub const DUPLICATE_FUNCTION: &str = "duplicate declaration of function '{0}'";
    pub const DUPLICATE_OVERLOAD_ID: &str = "duplicate overload id '{0}' on function '{1}'";
    pub const INCOMPATIBLE_OVERLOAD: &str =
        "overload '{0}' is incompatible with an existing overload '{1}' on function '{2}'";
    pub const CONTEXT_DECLARATION_UNRESOLVED: &str =
        "context declaration '{0}' could not be resolved in the schema: {1}";
    pub const CONTEXT_DECLARATION_NOT_A_STRUCT: &str =
        "context declaration '{0}' names '{1}', which is not a struct";
}

pub mod diagnostic_codes {
    pub const UNDECLARED_REFERENCE: u32 = 3001;
    pub const UNDECLARED_FUNCTION_REFERENCE: u32 = 3002;
    pub const UNDEFINED_FIELD: u32 = 3003;
    pub const NO_MATCHING_OVERLOAD: u32 = 3004;
    pub const AMBIGUOUS_OVERLOAD: u32 = 3005;
    pub const FIELD_TYPE_MISMATCH: u32 = 3006;
    pub const UNSUPPORTED_COMPREHENSION_RANGE: u32 = 3007;
    pub const UNSUPPORTED_MAP_KEY_TYPE: u32 = 3008;
    pub const NON_SELECTABLE_TYPE: u32 = 3009;
    pub const NOT_A_MESSAGE_TYPE: u32 = 3010;
    pub const TOO_MANY_ERRORS: u32 = 3011;
    pub const NO_DEDUCIBLE_TYPE: u32 = 3012;
    pub const EXPRESSION_NODE_COUNT_EXCEEDED: u32 = 3013;
    pub const DUPLICATE_VARIABLE: u32 = 4001;
    pub const DUPLICATE_FUNCTION: u32 = 4002;
    pub const DUPLICATE_OVERLOAD_ID: u32 = 4003;
    pub const INCOMPATIBLE_OVERLOAD: u32 = 4004;
    pub const CONTEXT_DECLARATION_UNRESOLVED: u32 = 4005;
    pub const CONTEXT_DECLARATION_NOT_A_STRUCT: u32 = 4006;
}
