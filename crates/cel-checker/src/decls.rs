//! Declaration model (C2): variables and functions/overloads.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::limits::{CALL_ARGS_INLINE, TYPE_PARAMS_INLINE};
use crate::types::{Type, TypeParamId};

/// `(qualified_name, Type)` (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Type,
}

impl VariableDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One overload of a function: `(overload_id, is_receiver_style,
/// params, result, type_params)` (§3).
///
/// `type_params` must equal the set of [`TypeParamId`]s that actually
/// appear in `params` or `result` — the builder validates this at
/// `add_function` time rather than trusting the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadDecl {
    pub overload_id: String,
    pub is_receiver_style: bool,
    pub params: SmallVec<[Type; CALL_ARGS_INLINE]>,
    pub result: Type,
    pub type_params: SmallVec<[TypeParamId; TYPE_PARAMS_INLINE]>,
}

impl OverloadDecl {
    pub fn new(
        overload_id: impl Into<String>,
        is_receiver_style: bool,
        params: impl IntoIterator<Item = Type>,
        result: Type,
    ) -> Self {
        let params: SmallVec<[Type; CALL_ARGS_INLINE]> = params.into_iter().collect();
        let mut type_params: SmallVec<[TypeParamId; TYPE_PARAMS_INLINE]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        for ty in params.iter().chain(std::iter::once(&result)) {
            collect_type_params(ty, &mut type_params, &mut seen);
        }
        Self {
            overload_id: overload_id.into(),
            is_receiver_style,
            params,
            result,
            type_params,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

fn collect_type_params(
    ty: &Type,
    out: &mut SmallVec<[TypeParamId; TYPE_PARAMS_INLINE]>,
    seen: &mut FxHashSet<TypeParamId>,
) {
    match ty {
        Type::TypeParam(id) => {
            if seen.insert(*id) {
                out.push(*id);
            }
        }
        Type::List(elem) => collect_type_params(elem, out, seen),
        Type::Map(k, v) => {
            collect_type_params(k, out, seen);
            collect_type_params(v, out, seen);
        }
        Type::Abstract(_, params) => {
            for p in params {
                collect_type_params(p, out, seen);
            }
        }
        Type::TypeOf(inner) => collect_type_params(inner, out, seen),
        _ => {}
    }
}

/// `(name, ordered list<OverloadDecl>)` (§3). Overload order matters: the
/// resolver (C6) walks overloads in declared order when breaking ties in
/// diagnostics, and the builder rejects duplicate ids across *any*
/// `FunctionDecl` in the environment, not just within one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub overloads: Vec<OverloadDecl>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    pub fn with_overload(mut self, overload: OverloadDecl) -> Self {
        self.overloads.push(overload);
        self
    }

    pub fn overloads_with_arity(&self, arity: usize, receiver_style: bool) -> Vec<&OverloadDecl> {
        self.overloads
            .iter()
            .filter(|o| o.arity() == arity && o.is_receiver_style == receiver_style)
            .collect()
    }
}
