//! Comprehension macro node handling (§4.7): the fixed 5-expression shape
//! plus the scoped iteration/accumulator variables that never participate
//! in the container walk.

use rustc_hash::FxHashMap;

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};

use crate::ast::{Comprehension, ExprId};
use crate::types::Type;

use super::{AbortReason, Walker};

/// Types `iter_range.all(iter_var, predicate)`-shaped nodes per §4.7's
/// desugared comprehension model.
pub(crate) fn type_comprehension(
    walker: &mut Walker,
    _id: ExprId,
    comp: &Comprehension,
) -> Result<Type, AbortReason> {
    let range_ty = walker.type_of(comp.iter_range)?.substitute(&walker.subst);

    let (iter_ty, iter_ty2) = match &range_ty {
        Type::List(elem) => ((**elem).clone(), None),
        Type::Map(key, value) => ((**key).clone(), Some((**value).clone())),
        Type::Dyn => (Type::Dyn, comp.iter_var2.as_ref().map(|_| Type::Dyn)),
        Type::Error => (Type::Error, comp.iter_var2.as_ref().map(|_| Type::Error)),
        other => {
            let rendered = other.render();
            walker.error_at(
                comp.iter_range,
                diagnostic_codes::UNSUPPORTED_COMPREHENSION_RANGE,
                format_message(
                    diagnostic_messages::UNSUPPORTED_COMPREHENSION_RANGE,
                    &[&rendered],
                ),
            );
            (Type::Error, comp.iter_var2.as_ref().map(|_| Type::Error))
        }
    };

    // `accu_init` types in the outer scope; the accumulator only becomes
    // visible once the inner scope below is pushed.
    let accu_ty = walker.type_of(comp.accu_init)?.substitute(&walker.subst);

    let mut vars = FxHashMap::default();
    vars.insert(comp.iter_var.clone(), iter_ty);
    if let (Some(name2), Some(ty2)) = (&comp.iter_var2, iter_ty2) {
        vars.insert(name2.clone(), ty2);
    }
    vars.insert(comp.accu_var.clone(), accu_ty);
    walker.push_scope(vars);

    // `loop_condition` is ordinarily `bool` (`all`/`exists`-style macros
    // declare it that way at the call site that expands into this node),
    // but the comprehension primitive itself doesn't constrain it — the
    // macro expansion is responsible for wiring a condition of the right
    // shape, mirroring how `cel-cpp`'s `ComprehensionStep` leaves it
    // unchecked here too.
    walker.type_of(comp.loop_condition)?;
    walker.type_of(comp.loop_step)?;
    let result_ty = walker.type_of(comp.result)?.substitute(&walker.subst);

    walker.pop_scope();

    Ok(result_ty)
}
