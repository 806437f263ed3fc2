//! Validation result (C10): a pair of (optional checked AST, issues). A
//! result is valid iff an AST is present, which holds iff no error-severity
//! issue was recorded (§3, §4.10).

use rustc_hash::FxHashMap;

use crate::ast::{Constant, ExprId};
use crate::issues::Issue;
use crate::types::Type;

/// What an ident/select/call/struct-creation node resolved to (§3).
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub fully_qualified_name: String,
    /// Populated only on call nodes: the surviving overload id(s) after
    /// resolution (§4.6).
    pub overload_ids: Option<Vec<String>>,
    /// Populated when the reference denotes a known constant (e.g. an enum
    /// value used as an identifier).
    pub constant_value: Option<Constant>,
}

impl Reference {
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            fully_qualified_name: name.into(),
            overload_ids: None,
            constant_value: None,
        }
    }

    pub fn call(name: impl Into<String>, overload_ids: Vec<String>) -> Self {
        Self {
            fully_qualified_name: name.into(),
            overload_ids: Some(overload_ids),
            constant_value: None,
        }
    }
}

/// The checker's output AST: per-node type and reference annotations plus
/// the `source_info` copied unchanged from the input (§3).
#[derive(Clone, Debug, Default)]
pub struct CheckedAst {
    pub type_map: FxHashMap<ExprId, Type>,
    pub reference_map: FxHashMap<ExprId, Reference>,
    pub root: Option<ExprId>,
}

impl CheckedAst {
    pub fn type_of(&self, id: ExprId) -> Option<&Type> {
        self.type_map.get(&id)
    }

    pub fn reference_of(&self, id: ExprId) -> Option<&Reference> {
        self.reference_map.get(&id)
    }

    pub fn result_type(&self) -> Option<&Type> {
        self.root.and_then(|id| self.type_of(id))
    }
}

/// Raised by [`ValidationResult::into_ast`] when the result is invalid.
#[derive(Debug, Clone)]
pub struct IntoAstError {
    pub issues: Vec<Issue>,
}

impl std::fmt::Display for IntoAstError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "check() produced no AST: {} issue(s)",
            self.issues.len()
        )
    }
}

impl std::error::Error for IntoAstError {}

/// Pair of (optional checked AST, issues), following
/// `checker/validation_result.h`'s `IsValid`/`GetAst`/`ReleaseAst`/
/// `GetIssues` surface adapted to idiomatic Rust.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    ast: Option<CheckedAst>,
    issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn new(ast: Option<CheckedAst>, issues: Vec<Issue>) -> Self {
        Self { ast, issues }
    }

    pub fn is_valid(&self) -> bool {
        self.ast.is_some()
    }

    pub fn ast(&self) -> Option<&CheckedAst> {
        self.ast.as_ref()
    }

    pub fn into_ast(self) -> Result<CheckedAst, IntoAstError> {
        self.ast.ok_or(IntoAstError {
            issues: self.issues,
        })
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}
