//! AST walker / annotator (C7): bottom-up typing with top-down context for
//! comprehension variable overlays and qualified-name rewrites (§4.7).

mod call;
mod collections;
mod comprehension;

use rustc_hash::FxHashMap;
use tracing::{debug_span, trace};

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use cel_common::Span;

use crate::ast::{Constant, ExprId, ExprKind, ExprNode, ParsedAst};
use crate::env::Environment;
use crate::issues::{IssueCollector, Severity};
use crate::result::{CheckedAst, Reference, ValidationResult};
use crate::subst::Substitution;
use crate::types::{reset_type_param_ids, Primitive, Type};

/// Why `Check()` aborted without producing an AST — distinct from a
/// collected error issue; these are hard failures of the call itself
/// (§4.7, §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    NodeBudgetExceeded { visited: u32, limit: u32 },
    NoDeducibleType { node: ExprId },
}

/// Either a completed `ValidationResult` or a hard abort (§4.7's node
/// budget, or an internal invariant violation).
#[derive(Debug)]
pub enum CheckOutcome {
    Completed(ValidationResult),
    Aborted(AbortReason),
}

/// Comprehension-scoped variable overlay. Iteration-variable resolution
/// does not perform the container walk (§4.4 rule 3); a lookup first
/// checks the scope stack top-down, then falls through to the environment.
struct Scope {
    vars: FxHashMap<String, Type>,
}

/// Per-call walker state. Created fresh at the top of [`check`] and
/// discarded at its end — nothing here outlives one `Check()` call (§5).
pub(crate) struct Walker<'a> {
    env: &'a Environment,
    ast: &'a ParsedAst,
    subst: Substitution,
    issues: IssueCollector,
    node_count: u32,
    max_nodes: Option<u32>,
    type_map: FxHashMap<ExprId, Type>,
    reference_map: FxHashMap<ExprId, Reference>,
    scopes: Vec<Scope>,
}

/// Runs the checker over `ast` inside `env`, producing a [`CheckOutcome`]
/// (§2, §4.7).
pub fn check(env: &Environment, ast: &ParsedAst) -> CheckOutcome {
    let _span = debug_span!("check", container = %env.container()).entered();
    reset_type_param_ids();

    let mut walker = Walker {
        env,
        ast,
        subst: Substitution::new(),
        issues: IssueCollector::new(env.options().max_error_issues),
        node_count: 0,
        max_nodes: env.options().max_expression_node_count,
        type_map: FxHashMap::default(),
        reference_map: FxHashMap::default(),
        scopes: Vec::new(),
    };

    let Some(root) = ast.root() else {
        return CheckOutcome::Completed(ValidationResult::new(
            Some(CheckedAst::default()),
            Vec::new(),
        ));
    };

    match walker.type_of(root) {
        Ok(_) => {
            let issues = walker.issues.into_issues();
            if walker.issues_would_invalidate(&issues) {
                CheckOutcome::Completed(ValidationResult::new(None, issues))
            } else {
                let checked = CheckedAst {
                    type_map: walker.type_map,
                    reference_map: walker.reference_map,
                    root: Some(root),
                };
                CheckOutcome::Completed(ValidationResult::new(Some(checked), issues))
            }
        }
        Err(reason) => CheckOutcome::Aborted(reason),
    }
}

impl<'a> Walker<'a> {
    fn issues_would_invalidate(&self, issues: &[crate::issues::Issue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Increments the node counter, aborting when it exceeds the budget
    /// (§4.7). Called once per visited node, at the start of [`type_of`].
    fn bump_node_count(&mut self) -> Result<(), AbortReason> {
        self.node_count += 1;
        if let Some(limit) = self.max_nodes {
            if self.node_count > limit {
                return Err(AbortReason::NodeBudgetExceeded {
                    visited: self.node_count,
                    limit,
                });
            }
        }
        Ok(())
    }

    fn node(&self, id: ExprId) -> Result<&'a ExprNode, AbortReason> {
        self.ast
            .get(id)
            .ok_or(AbortReason::NoDeducibleType { node: id })
    }

    fn error_at(&mut self, id: ExprId, code: u32, message: impl Into<String>) {
        let span = self.ast.span(id);
        self.issues.push_error(span, code, message);
    }

    fn warning_at(&mut self, id: ExprId, code: u32, message: impl Into<String>) {
        let span = self.ast.span(id);
        self.issues.push_warning(span, code, message);
    }

    fn record(&mut self, id: ExprId, ty: Type) -> Type {
        let closed = ty.substitute(&self.subst);
        self.type_map.insert(id, closed.clone());
        closed
    }

    /// Resolves an unqualified iteration-variable name against the scope
    /// stack only, innermost first — never the container walk.
    fn lookup_scoped(&self, name: &str) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.vars.get(name).cloned())
    }

    fn push_scope(&mut self, vars: FxHashMap<String, Type>) {
        self.scopes.push(Scope { vars });
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Walks a chain of plain (non-test-only) field selects down to its
    /// root identifier, returning the dotted path in root-to-leaf order
    /// (`["a", "b", "c"]` for `Select(Select(Ident("a"), "b"), "c")`).
    /// `None` if the chain bottoms out in anything other than a bare ident —
    /// such a node can never denote a qualified name (§4.4 rule 2, §4.7's
    /// qualified ident/select priority).
    pub(crate) fn qualified_segments(&self, id: ExprId) -> Option<Vec<String>> {
        let node = self.ast.get(id)?;
        match &node.kind {
            ExprKind::Ident(name) => Some(vec![name.clone()]),
            ExprKind::Select {
                operand,
                field,
                test_only: false,
            } => {
                let mut segments = self.qualified_segments(*operand)?;
                segments.push(field.clone());
                Some(segments)
            }
            _ => None,
        }
    }

    /// Bottom-up type assignment for one node, returning its (possibly
    /// still-open) type. Top-level callers read the closed form from
    /// `type_map` after [`Walker::record`] substitutes it.
    pub(crate) fn type_of(&mut self, id: ExprId) -> Result<Type, AbortReason> {
        self.bump_node_count()?;
        let node = self.node(id)?;
        trace!(node = id.0, "visiting node");

        let ty = match node.kind.clone() {
            ExprKind::Literal(constant) => self.type_literal(id, &constant),
            ExprKind::Ident(name) => self.type_ident(id, &name)?,
            ExprKind::Select {
                operand,
                field,
                test_only,
            } => self.type_select(id, operand, &field, test_only)?,
            ExprKind::Call {
                target,
                function,
                args,
            } => call::type_call(self, id, target, &function, &args)?,
            ExprKind::CreateList { elements } => collections::type_list(self, id, &elements)?,
            ExprKind::CreateMap { entries } => collections::type_map(self, id, &entries)?,
            ExprKind::CreateStruct {
                message_name,
                entries,
            } => collections::type_struct(self, id, &message_name, &entries)?,
            ExprKind::Comprehension(comp) => comprehension::type_comprehension(self, id, &comp)?,
        };

        Ok(self.record(id, ty))
    }

    fn type_literal(&mut self, id: ExprId, constant: &Constant) -> Type {
        let ty = match constant {
            Constant::Null => Type::Null,
            Constant::Bool(_) => Type::Primitive(Primitive::Bool),
            Constant::Int(_) => Type::Primitive(Primitive::Int),
            Constant::Uint(_) => Type::Primitive(Primitive::Uint),
            Constant::Double(_) => Type::Primitive(Primitive::Double),
            Constant::String(_) => Type::Primitive(Primitive::String),
            Constant::Bytes(_) => Type::Primitive(Primitive::Bytes),
        };
        self.reference_map.entry(id).or_insert_with(|| Reference {
            fully_qualified_name: String::new(),
            overload_ids: None,
            constant_value: Some(constant.clone()),
        });
        ty
    }

    /// Resolves an ident under the container walk first; a comprehension
    /// variable of the same bare name only shadows it when no qualified form
    /// matches (§4.4 rule 3). A name the container walk resolves to a
    /// message/enum instead of a variable denotes a type reference, yielding
    /// `TypeOf(resolved)` (§4.7, §9's "type equal to value" duality).
    fn type_ident(&mut self, id: ExprId, name: &str) -> Result<Type, AbortReason> {
        if let Some((qualified, ty)) = self.env.lookup_variable(name) {
            let qualified = qualified.to_string();
            let ty = ty.clone();
            self.reference_map.insert(id, Reference::variable(qualified));
            return Ok(ty);
        }
        if let Some(ty) = self.lookup_scoped(name) {
            self.reference_map
                .insert(id, Reference::variable(name.to_string()));
            return Ok(ty);
        }
        if let Some(resolved) = self.env.resolve_named_type(name) {
            self.reference_map
                .insert(id, Reference::variable(resolved.render()));
            return Ok(Type::TypeOf(Box::new(resolved)));
        }
        self.error_at(
            id,
            diagnostic_codes::UNDECLARED_REFERENCE,
            format_message(
                diagnostic_messages::UNDECLARED_REFERENCE,
                &[name, self.env.container()],
            ),
        );
        Ok(Type::Error)
    }

    fn type_select(
        &mut self,
        id: ExprId,
        operand: ExprId,
        field: &str,
        test_only: bool,
    ) -> Result<Type, AbortReason> {
        // `e.f` may itself be a qualified name (`pkg.Msg`, a namespaced
        // variable, or a prefix of a namespaced function call handled in
        // `call::type_call`) rather than a field access; try the joined
        // dotted name under the container walk before decomposing into an
        // ordinary select (§4.7's qualified ident/select priority).
        if !test_only {
            if let Some(mut segments) = self.qualified_segments(operand) {
                segments.push(field.to_string());
                let joined = segments.join(".");
                if let Some((qualified, ty)) = self.env.lookup_variable(&joined) {
                    let qualified = qualified.to_string();
                    let ty = ty.clone();
                    self.reference_map.insert(id, Reference::variable(qualified));
                    return Ok(ty);
                }
                if let Some(resolved) = self.env.resolve_named_type(&joined) {
                    self.reference_map
                        .insert(id, Reference::variable(resolved.render()));
                    return Ok(Type::TypeOf(Box::new(resolved)));
                }
            }
        }

        let operand_ty = self.type_of(operand)?;
        let operand_ty = operand_ty.substitute(&self.subst);

        if test_only {
            // `has(e.f)` is always legal syntactically; field existence is
            // still validated for message operands (§4.7).
            if let Type::Message(name) = &operand_ty {
                if let Some(descriptor) = self.env.schema().find_message(name) {
                    if descriptor.field(field).is_none() {
                        self.error_at(
                            id,
                            diagnostic_codes::UNDEFINED_FIELD,
                            format_message(diagnostic_messages::UNDEFINED_FIELD, &[field, name]),
                        );
                    }
                }
            }
            return Ok(Type::Primitive(Primitive::Bool));
        }

        match &operand_ty {
            Type::Error => Ok(Type::Error),
            Type::Dyn | Type::Wrapper(_) | Type::Any => Ok(Type::Dyn),
            Type::Message(name) => {
                let name = name.clone();
                match self.env.schema().find_message(&name) {
                    Some(descriptor) => match descriptor.field(field) {
                        Some(f) => Ok(f.ty.clone()),
                        None => {
                            self.error_at(
                                id,
                                diagnostic_codes::UNDEFINED_FIELD,
                                format_message(
                                    diagnostic_messages::UNDEFINED_FIELD,
                                    &[field, &name],
                                ),
                            );
                            Ok(Type::Error)
                        }
                    },
                    None => Ok(Type::Dyn),
                }
            }
            Type::Map(_, value) => Ok((**value).clone()),
            Type::Abstract(name, params) if name == "optional_type" => {
                let inner = params.first().cloned().unwrap_or(Type::Dyn);
                let field_ty = self.select_on(&inner, field);
                Ok(Type::optional_of(field_ty))
            }
            other => {
                let rendered = other.render();
                self.error_at(
                    id,
                    diagnostic_codes::NON_SELECTABLE_TYPE,
                    format_message(diagnostic_messages::NON_SELECTABLE_TYPE, &[&rendered]),
                );
                Ok(Type::Error)
            }
        }
    }

    /// Helper shared with the optional-plug-in `?.` rewrite: what selecting
    /// `field` on a (non-optional) `ty` would yield.
    fn select_on(&self, ty: &Type, field: &str) -> Type {
        match ty {
            Type::Message(name) => self
                .env
                .schema()
                .find_message(name)
                .and_then(|d| d.field(field))
                .map(|f| f.ty.clone())
                .unwrap_or(Type::Dyn),
            Type::Map(_, value) => (**value).clone(),
            Type::Dyn => Type::Dyn,
            _ => Type::Dyn,
        }
    }
}
