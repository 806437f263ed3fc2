//! Substitution / unifier (C5): the per-call map from type-parameter
//! identity to its currently bound type.
//!
//! Representation is a plain [`rustc_hash::FxHashMap`] rather than a
//! union-find structure — §4.5 explicitly does not require occurs-check
//! strictness, so path compression during lookup is a lookup-time nicety,
//! never a correctness requirement.

use rustc_hash::FxHashMap;

use crate::limits::MAX_TYPE_RECURSION_DEPTH;
use crate::types::{Type, TypeParamId};

/// A substitution is cheap to fork (candidate overload resolution clones it
/// for each trial, §4.6) and is always local to one `Check()` call —
/// two concurrent checks never share one.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    bindings: FxHashMap<TypeParamId, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    /// Looks up `id`, walking any chain of parameter-to-parameter bindings.
    /// Returns `None` if `id` is still free. A chain longer than
    /// [`MAX_TYPE_RECURSION_DEPTH`] is treated as a cycle and demoted: the
    /// caller sees `Some(Type::Dyn)` rather than looping forever.
    pub fn get(&self, id: TypeParamId) -> Option<Type> {
        let mut current = id;
        let mut steps = 0;
        loop {
            match self.bindings.get(&current) {
                Some(Type::TypeParam(next)) => {
                    current = *next;
                    steps += 1;
                    if steps > MAX_TYPE_RECURSION_DEPTH {
                        return Some(Type::Dyn);
                    }
                }
                Some(other) => return Some(other.clone()),
                None => return None,
            }
        }
    }

    /// Binds `id` to `ty`, returning a new substitution (the unifier never
    /// mutates a substitution another in-flight candidate holds). A binding
    /// that would induce a cycle (e.g. `E ↦ List(E)`) is demoted to `Dyn`
    /// rather than rejected, matching legacy semantics (§4.5).
    pub fn bind(&self, id: TypeParamId, ty: Type) -> Substitution {
        let mut next = self.clone();
        if type_references_param(&ty, id, 0) {
            next.bindings.insert(id, Type::Dyn);
        } else {
            next.bindings.insert(id, ty);
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

fn type_references_param(ty: &Type, id: TypeParamId, depth: u32) -> bool {
    if depth > MAX_TYPE_RECURSION_DEPTH {
        return true;
    }
    match ty {
        Type::TypeParam(other) => *other == id,
        Type::List(elem) => type_references_param(elem, id, depth + 1),
        Type::Map(k, v) => {
            type_references_param(k, id, depth + 1) || type_references_param(v, id, depth + 1)
        }
        Type::Abstract(_, params) => params
            .iter()
            .any(|p| type_references_param(p, id, depth + 1)),
        Type::TypeOf(inner) => type_references_param(inner, id, depth + 1),
        _ => false,
    }
}
