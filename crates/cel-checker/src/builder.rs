//! Builder (C9): fluent, single-use-per-build assembly of variables,
//! functions, libraries, and subsets into an immutable [`Environment`],
//! finalized by [`Builder::build`] per §4.9.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug_span;

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use cel_common::CheckerOptions;

use crate::ast::ParsedAst;
use crate::checker::{self, CheckOutcome};
use crate::decls::{FunctionDecl, OverloadDecl, VariableDecl};
use crate::env::Environment;
use crate::result::ValidationResult;
use crate::schema::SchemaOracle;
use crate::types::{is_well_known_type_name, Type};

/// Built-in macro `(name, arity)` pairs a function declaration must never
/// collide with (§4.9 step 3).
const MACRO_ARITIES: &[(&str, usize)] = &[
    ("has", 1),
    ("map", 3),
    ("map", 4),
    ("filter", 3),
    ("exists", 3),
    ("exists_one", 3),
    ("all", 3),
    ("optMap", 3),
    ("optFlatMap", 3),
];

/// One fault recorded during `build()` — duplicate declarations, macro
/// collisions, and unresolvable context declarations are build-time faults,
/// never deferred to the first `Check()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    DuplicateVariable(String),
    DuplicateFunction(String),
    DuplicateOverloadId { overload_id: String, function: String },
    MacroCollision { name: String, arity: usize },
    ContextDeclarationUnresolved { message_name: String, reason: String },
    ContextDeclarationNotAStruct { message_name: String },
    DuplicateLibraryId(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::DuplicateVariable(name) => {
                write!(f, "{}", format_message(diagnostic_messages::DUPLICATE_VARIABLE, &[name]))
            }
            BuildError::DuplicateFunction(name) => {
                write!(f, "{}", format_message(diagnostic_messages::DUPLICATE_FUNCTION, &[name]))
            }
            BuildError::DuplicateOverloadId { overload_id, function } => write!(
                f,
                "{}",
                format_message(diagnostic_messages::DUPLICATE_OVERLOAD_ID, &[overload_id, function])
            ),
            BuildError::MacroCollision { name, arity } => {
                write!(f, "function '{name}' declared with arity {arity} collides with a built-in macro")
            }
            BuildError::ContextDeclarationUnresolved { message_name, reason } => write!(
                f,
                "{}",
                format_message(
                    diagnostic_messages::CONTEXT_DECLARATION_UNRESOLVED,
                    &[message_name, reason]
                )
            ),
            BuildError::ContextDeclarationNotAStruct { message_name } => write!(
                f,
                "{}",
                format_message(diagnostic_messages::CONTEXT_DECLARATION_NOT_A_STRUCT, &[message_name, message_name])
            ),
            BuildError::DuplicateLibraryId(id) => write!(f, "library id '{id}' registered twice"),
        }
    }
}

impl std::error::Error for BuildError {}

/// A deferred context declaration: every non-oneof field of `message_name`
/// becomes a top-level variable once the schema is known at build time
/// (§4.2).
struct ContextDeclaration {
    message_name: String,
}

/// A library's filter on another library's declarations, applied once at
/// build time by `(function_name, overload_id) -> bool` (§4.9).
struct LibrarySubset {
    library_id: String,
    predicate: Box<dyn Fn(&str, &str) -> bool + Send + Sync>,
}

/// Fluent accumulator for an [`Environment`]. Each `add_*` call can fail
/// immediately (duplicate names) or defer validation to [`Builder::build`]
/// (context declarations, macro collisions).
pub struct Builder {
    variables: FxHashMap<String, Type>,
    functions: FxHashMap<String, FunctionDecl>,
    overload_ids: std::collections::HashSet<String>,
    /// Which library (if any) registered each overload id, populated while
    /// `add_library`'s `configure` callback runs. Lets `build()`'s
    /// subsetting pass touch only the overloads the named library actually
    /// contributed (§4.9 "subsetting purity").
    overload_libraries: FxHashMap<String, String>,
    current_library: Option<String>,
    context_decls: Vec<ContextDeclaration>,
    subsets: Vec<LibrarySubset>,
    library_ids: std::collections::HashSet<String>,
    schema: Option<Arc<dyn SchemaOracle + Send + Sync>>,
    container: String,
    expected_type: Option<Type>,
    options: CheckerOptions,
    errors: Vec<BuildError>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            variables: FxHashMap::default(),
            functions: FxHashMap::default(),
            overload_ids: std::collections::HashSet::new(),
            overload_libraries: FxHashMap::default(),
            current_library: None,
            context_decls: Vec::new(),
            subsets: Vec::new(),
            library_ids: std::collections::HashSet::new(),
            schema: None,
            container: String::new(),
            expected_type: None,
            options: CheckerOptions::default(),
            errors: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl SchemaOracle + Send + Sync + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn set_expected_type(mut self, ty: Type) -> Self {
        self.expected_type = Some(ty);
        self
    }

    pub fn max_expression_node_count(mut self, limit: Option<u32>) -> Self {
        self.options.max_expression_node_count = limit;
        self
    }

    /// Adds a variable; a second declaration under the same name is a
    /// build-time error (§4.9). Use [`Builder::add_or_replace_variable`] to
    /// overwrite intentionally.
    pub fn add_variable(mut self, decl: VariableDecl) -> Result<Self, BuildError> {
        if self.variables.contains_key(&decl.name) {
            return Err(BuildError::DuplicateVariable(decl.name));
        }
        self.variables.insert(decl.name, decl.ty);
        Ok(self)
    }

    pub fn add_or_replace_variable(mut self, decl: VariableDecl) -> Self {
        self.variables.insert(decl.name, decl.ty);
        self
    }

    /// Adds (or extends) a function declaration. Each overload id must be
    /// globally unique across every `FunctionDecl` in the environment, not
    /// just within this one (§3).
    pub fn add_function(mut self, decl: FunctionDecl) -> Result<Self, BuildError> {
        for overload in &decl.overloads {
            if !self.overload_ids.insert(overload.overload_id.clone()) {
                return Err(BuildError::DuplicateOverloadId {
                    overload_id: overload.overload_id.clone(),
                    function: decl.name.clone(),
                });
            }
            if let Some(library_id) = &self.current_library {
                self.overload_libraries
                    .insert(overload.overload_id.clone(), library_id.clone());
            }
        }
        match self.functions.get_mut(&decl.name) {
            Some(existing) => existing.overloads.extend(decl.overloads),
            None => {
                self.functions.insert(decl.name.clone(), decl);
            }
        }
        Ok(self)
    }

    pub fn add_overload(self, function_name: impl Into<String>, overload: OverloadDecl) -> Result<Self, BuildError> {
        let function_name = function_name.into();
        let decl = FunctionDecl::new(function_name).with_overload(overload);
        self.add_function(decl)
    }

    /// Defers adding every non-oneof field of `message_name` as a top-level
    /// variable until `build()`, when the schema is resolvable (§4.2).
    pub fn add_context_declaration(mut self, message_name: impl Into<String>) -> Self {
        self.context_decls.push(ContextDeclaration {
            message_name: message_name.into(),
        });
        self
    }

    /// No-op placeholder for a custom type-provider hook; the core checker
    /// consults only [`SchemaOracle`], so a type provider is equivalent to
    /// supplying a schema via [`Builder::with_schema`]. Kept as a distinct
    /// call for parity with the external interface list (§6).
    pub fn add_type_provider(self, schema: impl SchemaOracle + Send + Sync + 'static) -> Self {
        self.with_schema(schema)
    }

    /// Registers a library: `configure` receives the builder and returns the
    /// updated one. A second library sharing a non-empty `id` is a build
    /// error at `build()` time (§4.9).
    pub fn add_library(
        mut self,
        id: impl Into<String>,
        configure: impl FnOnce(Builder) -> Result<Builder, BuildError>,
    ) -> Result<Self, BuildError> {
        let id = id.into();
        if !id.is_empty() && !self.library_ids.insert(id.clone()) {
            return Err(BuildError::DuplicateLibraryId(id));
        }
        let outer_library = self.current_library.take();
        self.current_library = Some(id);
        let mut result = configure(self)?;
        result.current_library = outer_library;
        Ok(result)
    }

    /// Registers a predicate that filters `library_id`'s function
    /// declarations at build time; evaluated once, after every `add_*` call
    /// has run (§4.9).
    pub fn add_library_subset(
        mut self,
        library_id: impl Into<String>,
        predicate: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.subsets.push(LibrarySubset {
            library_id: library_id.into(),
            predicate: Box::new(predicate),
        });
        self
    }

    /// Finalizes the environment per §4.9's four steps, returning either a
    /// usable [`Checker`] or the accumulated [`BuildError`]s.
    pub fn build(mut self) -> Result<Checker, Vec<BuildError>> {
        let _span = debug_span!("build").entered();

        let schema = self
            .schema
            .take()
            .unwrap_or_else(|| Arc::new(crate::schema::MapSchema::new()));

        // Step 1: resolve deferred context-declaration variables.
        for decl in &self.context_decls {
            match schema.find_message(&decl.message_name) {
                Some(descriptor) => {
                    if is_well_known_type_name(&decl.message_name)
                        && !self.options.allow_well_known_type_context_declarations
                    {
                        self.errors.push(BuildError::ContextDeclarationNotAStruct {
                            message_name: decl.message_name.clone(),
                        });
                        continue;
                    }
                    for field in descriptor.non_oneof_fields() {
                        if self.variables.contains_key(&field.name) {
                            self.errors
                                .push(BuildError::DuplicateVariable(field.name.clone()));
                        } else {
                            self.variables.insert(field.name.clone(), field.ty.clone());
                        }
                    }
                }
                None => {
                    self.errors.push(BuildError::ContextDeclarationUnresolved {
                        message_name: decl.message_name.clone(),
                        reason: "message not found in schema".to_string(),
                    });
                }
            }
        }

        // Step 3: reject function declarations colliding with a built-in
        // macro's (name, arity).
        for (name, decl) in &self.functions {
            for overload in &decl.overloads {
                let arity = overload.arity() + usize::from(overload.is_receiver_style);
                if MACRO_ARITIES.iter().any(|(m, a)| m == name && *a == arity) {
                    self.errors.push(BuildError::MacroCollision {
                        name: name.clone(),
                        arity,
                    });
                }
            }
        }

        // Library subsetting: drop overloads `subset.library_id` contributed
        // that its predicate rejects. An overload registered by any other
        // library (or none, i.e. added directly) is untouched regardless of
        // what the predicate would say about it (§4.9 "subsetting purity").
        for subset in &self.subsets {
            let owners = &self.overload_libraries;
            for decl in self.functions.values_mut() {
                let name = decl.name.clone();
                decl.overloads.retain(|o| {
                    owners.get(&o.overload_id) != Some(&subset.library_id)
                        || (subset.predicate)(&name, &o.overload_id)
                });
            }
        }
        self.functions.retain(|_, decl| !decl.overloads.is_empty());

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let env = Environment::new(
            self.variables,
            self.functions,
            schema,
            self.container,
            self.expected_type,
            self.options,
        );
        Ok(Checker { env })
    }
}

/// An immutable, thread-safe checker built by [`Builder::build`]. Safe to
/// share across threads; each `check()` call creates fresh per-call state
/// (§5).
pub struct Checker {
    env: Environment,
}

impl Checker {
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Runs the checker over `ast` (§4.7). A node-budget overrun is a hard
    /// failure of the call itself, distinct from a completed-but-invalid
    /// [`ValidationResult`] — see [`CheckOutcome`].
    pub fn check(&self, ast: &ParsedAst) -> CheckOutcome {
        checker::check(&self.env, ast)
    }

    /// Convenience wrapper collapsing a hard abort into a single
    /// error-severity issue, for callers that only want a
    /// [`ValidationResult`] and are willing to lose the abort/issue
    /// distinction (§6's external `check(parsed_ast) → ValidationResult`
    /// surface).
    pub fn check_to_result(&self, ast: &ParsedAst) -> ValidationResult {
        match self.check(ast) {
            CheckOutcome::Completed(result) => result,
            CheckOutcome::Aborted(reason) => {
                let (code, message) = match &reason {
                    crate::checker::AbortReason::NodeBudgetExceeded { visited, limit } => (
                        diagnostic_codes::EXPRESSION_NODE_COUNT_EXCEEDED,
                        format_message(
                            diagnostic_messages::EXPRESSION_NODE_COUNT_EXCEEDED,
                            &[&visited.to_string(), &limit.to_string()],
                        ),
                    ),
                    crate::checker::AbortReason::NoDeducibleType { node } => (
                        diagnostic_codes::NO_DEDUCIBLE_TYPE,
                        format_message(diagnostic_messages::NO_DEDUCIBLE_TYPE, &[&node.0.to_string()]),
                    ),
                };
                ValidationResult::new(
                    None,
                    vec![crate::issues::Issue {
                        severity: crate::issues::Severity::Error,
                        span: cel_common::Span::dummy(),
                        code,
                        message,
                    }],
                )
            }
        }
    }
}
