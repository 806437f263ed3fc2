//! Overload resolver (C6): given a call site's argument types and
//! candidate overloads, returns the matching set, an updated substitution,
//! and a result type (§4.6).

use rustc_hash::FxHashMap;

use crate::decls::OverloadDecl;
use crate::subst::Substitution;
use crate::types::{AssignabilityOptions, Type, TypeParamId};

/// Outcome of resolving one call site.
pub enum Resolution {
    /// `|M| = 0`: no candidate unified against the argument types.
    NoMatch,
    /// `|M| = 1`: the lone match's substitution is adopted.
    Single {
        overload_id: String,
        result: Type,
        subst: Substitution,
    },
    /// `|M| > 1`: result is the LUB of all matches' result types; **no**
    /// new parameter bindings are committed to the outer substitution
    /// (§4.6 step 3), preserving soundness.
    Ambiguous {
        overload_ids: Vec<String>,
        result: Type,
    },
}

/// Attempts to resolve a call of `args` (in syntactic order) against
/// `candidates`, forking `subst` once per candidate so a failed trial never
/// pollutes the caller's state (§4.6 steps 1-2).
pub fn resolve(
    args: &[Type],
    receiver_style: bool,
    candidates: &[&OverloadDecl],
    subst: &Substitution,
    options: &AssignabilityOptions,
) -> Resolution {
    let mut matches: Vec<(String, Type, Substitution)> = Vec::new();

    for candidate in candidates {
        if candidate.arity() != args.len() || candidate.is_receiver_style != receiver_style {
            continue;
        }
        let Some((result, trial_subst)) = try_unify(candidate, args, subst, options) else {
            continue;
        };
        matches.push((candidate.overload_id.clone(), result, trial_subst));
    }

    match matches.len() {
        0 => Resolution::NoMatch,
        1 => {
            let (overload_id, result, trial_subst) = matches.into_iter().next().unwrap();
            Resolution::Single {
                overload_id,
                result: result.substitute(&trial_subst),
                subst: trial_subst,
            }
        }
        _ => {
            let mut lub = matches[0].1.substitute(&matches[0].2);
            for (_, result, trial_subst) in &matches[1..] {
                let resolved = result.substitute(trial_subst);
                lub = Type::most_specific(&lub, &resolved, subst);
            }
            Resolution::Ambiguous {
                overload_ids: matches.into_iter().map(|(id, _, _)| id).collect(),
                result: lub,
            }
        }
    }
}

/// Instantiates fresh parameters for `candidate`'s free type variables, then
/// unifies each argument against the corresponding (renamed) parameter
/// type, threading a temporary substitution forked from `subst`.
fn try_unify(
    candidate: &OverloadDecl,
    args: &[Type],
    subst: &Substitution,
    options: &AssignabilityOptions,
) -> Option<(Type, Substitution)> {
    let renames: FxHashMap<TypeParamId, TypeParamId> = candidate
        .type_params
        .iter()
        .map(|id| (*id, TypeParamId::fresh()))
        .collect();

    let mut trial = subst.clone();
    for (param, arg) in candidate.params.iter().zip(args.iter()) {
        let renamed = rename_params(param, &renames);
        trial = Type::assignable(&renamed, arg, &trial, options)?;
    }
    let renamed_result = rename_params(&candidate.result, &renames);
    Some((renamed_result, trial))
}

fn rename_params(ty: &Type, renames: &FxHashMap<TypeParamId, TypeParamId>) -> Type {
    match ty {
        Type::TypeParam(id) => Type::TypeParam(*renames.get(id).copied().as_ref().unwrap_or(id)),
        Type::List(elem) => Type::list_of(rename_params(elem, renames)),
        Type::Map(k, v) => Type::map_of(rename_params(k, renames), rename_params(v, renames)),
        Type::Abstract(name, params) => Type::Abstract(
            name.clone(),
            params.iter().map(|p| rename_params(p, renames)).collect(),
        ),
        Type::TypeOf(inner) => Type::TypeOf(Box::new(rename_params(inner, renames))),
        other => other.clone(),
    }
}
