//! Type-check environment (C4): declarations + schema + container +
//! expected type, frozen by the builder and shared read-only across
//! concurrent `Check()` calls.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use cel_common::CheckerOptions;

use crate::decls::FunctionDecl;
use crate::schema::SchemaOracle;
use crate::types::{AssignabilityOptions, Type};

/// Immutable snapshot produced by [`crate::builder::Builder::build`] (§3).
///
/// A single `Environment` is shared by every `Check()` call on the checker
/// that owns it; all mutable per-call state (substitution, issues, node
/// counter) lives elsewhere, never here.
pub struct Environment {
    variables: FxHashMap<String, Type>,
    functions: FxHashMap<String, FunctionDecl>,
    schema: Arc<dyn SchemaOracle + Send + Sync>,
    container: String,
    expected_type: Option<Type>,
    options: CheckerOptions,
}

impl Environment {
    pub(crate) fn new(
        variables: FxHashMap<String, Type>,
        functions: FxHashMap<String, FunctionDecl>,
        schema: Arc<dyn SchemaOracle + Send + Sync>,
        container: String,
        expected_type: Option<Type>,
        options: CheckerOptions,
    ) -> Self {
        Self {
            variables,
            functions,
            schema,
            container,
            expected_type,
            options,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn expected_type(&self) -> Option<&Type> {
        self.expected_type.as_ref()
    }

    pub fn schema(&self) -> &(dyn SchemaOracle + Send + Sync) {
        &*self.schema
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn assignability_options(&self) -> AssignabilityOptions {
        AssignabilityOptions {
            enable_cross_numeric_comparisons: self.options.enable_cross_numeric_comparisons,
            enable_legacy_null_assignment: self.options.enable_legacy_null_assignment,
        }
    }

    /// Resolves `name` under the container-aware lookup of §4.4: tries
    /// `container.name`, then each successively shorter prefix of
    /// `container`, then the bare name — first hit wins, returning the
    /// fully-qualified name actually matched alongside its declared type.
    pub fn lookup_variable(&self, name: &str) -> Option<(&str, &Type)> {
        for candidate in container_candidates(&self.container, name) {
            if let Some((key, ty)) = self.variables.get_key_value(candidate.as_str()) {
                return Some((key.as_str(), ty));
            }
        }
        None
    }

    /// Resolves a (possibly dotted) function name the same way, returning
    /// the fully-qualified name matched and its declaration (§4.7).
    pub fn lookup_function(&self, name: &str) -> Option<(&str, &FunctionDecl)> {
        for candidate in container_candidates(&self.container, name) {
            if let Some((key, decl)) = self.functions.get_key_value(candidate.as_str()) {
                return Some((key.as_str(), decl));
            }
        }
        None
    }

    /// Resolves a message or enum type name under the same container walk
    /// used for idents and functions — struct-creation and enum-constant
    /// nodes name their type this way (§4.7).
    pub fn resolve_type_name(&self, name: &str) -> Option<String> {
        for candidate in container_candidates(&self.container, name) {
            if self.schema.find_message(&candidate).is_some()
                || self.schema.find_enum(&candidate).is_some()
            {
                return Some(candidate);
            }
        }
        None
    }

    /// Like [`Environment::resolve_type_name`], but also reports which kind
    /// of schema entry matched, so a bare ident naming a type can be typed
    /// as `Message(name)` or `Enum(name)` rather than assumed to be a
    /// message (§4.7's ident-resolution type-name case).
    pub fn resolve_named_type(&self, name: &str) -> Option<Type> {
        for candidate in container_candidates(&self.container, name) {
            if self.schema.find_message(&candidate).is_some() {
                return Some(Type::Message(candidate));
            }
            if self.schema.find_enum(&candidate).is_some() {
                return Some(Type::Enum(candidate));
            }
        }
        None
    }

    pub fn all_variables(&self) -> &FxHashMap<String, Type> {
        &self.variables
    }

    pub fn all_functions(&self) -> &FxHashMap<String, FunctionDecl> {
        &self.functions
    }
}

/// Produces the longest-prefix-match candidate list for `name` resolved
/// inside `container`, most-qualified first: for container `a.b.c` and name
/// `X`, yields `a.b.c.X`, `a.b.X`, `a.X`, `X` — and for a dotted `name`
/// (`Y.Z`), the dotted form is matched as a single key at each level before
/// falling back further (§4.4 rule 2 is automatically satisfied because the
/// variable/function tables are keyed by the full dotted string, not by
/// path segments).
fn container_candidates(container: &str, name: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if container.is_empty() {
        candidates.push(name.to_string());
        return candidates;
    }
    let segments: Vec<&str> = container.split('.').collect();
    for end in (0..=segments.len()).rev() {
        if end == 0 {
            candidates.push(name.to_string());
        } else {
            candidates.push(format!("{}.{}", segments[..end].join("."), name));
        }
    }
    candidates
}
