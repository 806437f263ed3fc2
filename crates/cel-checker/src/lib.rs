//! Type checker core for the Common Expression Language (CEL).
//!
//! A [`Builder`] accumulates variable/function declarations, a schema
//! oracle, and options into an immutable [`Checker`]; `Checker::check`
//! type-annotates a [`ParsedAst`] and reports diagnostics via a
//! [`ValidationResult`]. See each module for the corresponding piece of the
//! design: [`types`] (the type model), [`env`] (the frozen environment),
//! [`overload`] (call resolution), [`checker`] (the walker), [`builder`]
//! (assembly and finalization).

pub(crate) use cel_common::limits;

pub mod ast;
pub mod builder;
pub mod checker;
pub mod decls;
pub mod env;
pub mod issues;
pub mod optional;
pub mod overload;
pub mod result;
pub mod schema;
pub mod stdlib;
pub mod subst;
pub mod types;

pub use ast::{Comprehension, Constant, ExprId, ExprKind, ExprNode, MapEntry, ParsedAst, StructEntry};
pub use builder::{BuildError, Builder, Checker};
pub use checker::{AbortReason, CheckOutcome};
pub use decls::{FunctionDecl, OverloadDecl, VariableDecl};
pub use env::Environment;
pub use issues::{Issue, IssueCollector, Severity};
pub use overload::{resolve, Resolution};
pub use result::{CheckedAst, IntoAstError, Reference, ValidationResult};
pub use schema::{Cardinality, EnumDescriptor, FieldDescriptor, MapSchema, MessageDescriptor, SchemaOracle};
pub use subst::Substitution;
pub use types::{AssignabilityOptions, Primitive, Type, TypeParamId};
