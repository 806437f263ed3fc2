//! Call-node handling: function resolution under the container walk,
//! argument evaluation in syntactic order, and delegation to the overload
//! resolver (C6) (§4.7).

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};

use crate::ast::ExprId;
use crate::overload::{resolve, Resolution};
use crate::result::Reference;
use crate::types::Type;

use super::{AbortReason, Walker};

/// Types one call node: `target(args)` for receiver-style, or
/// `function(args)` for global calls/operators (§4.7 step "Call").
pub(crate) fn type_call(
    walker: &mut Walker,
    id: ExprId,
    target: Option<ExprId>,
    function: &str,
    args: &[ExprId],
) -> Result<Type, AbortReason> {
    // `a.b.c(args)` parses as a receiver-style call whose target is a plain
    // field-select chain down to an ident. If the joined dotted name
    // resolves to a function under the container walk, rewrite this into a
    // non-receiver call to that qualified name instead of a receiver-style
    // call on `a.b`'s value (§4.7's qualified ident/select call rewrite).
    let mut qualified_function = None;
    if let Some(receiver) = target {
        if let Some(mut segments) = walker.qualified_segments(receiver) {
            segments.push(function.to_string());
            let joined = segments.join(".");
            if walker.env.lookup_function(&joined).is_some() {
                qualified_function = Some(joined);
            }
        }
    }
    let (target, function) = match &qualified_function {
        Some(joined) => (None, joined.as_str()),
        None => (target, function),
    };

    let receiver_style = target.is_some();

    let mut call_args = Vec::with_capacity(args.len() + usize::from(receiver_style));
    if let Some(receiver) = target {
        let ty = walker.type_of(receiver)?;
        call_args.push(ty.substitute(&walker.subst));
    }
    for &arg in args {
        let ty = walker.type_of(arg)?;
        call_args.push(ty.substitute(&walker.subst));
    }

    let Some((qualified_name, decl)) = walker.env.lookup_function(function) else {
        walker.error_at(
            id,
            diagnostic_codes::UNDECLARED_FUNCTION_REFERENCE,
            format_message(diagnostic_messages::UNDECLARED_FUNCTION_REFERENCE, &[function]),
        );
        return Ok(Type::Error);
    };
    let qualified_name = qualified_name.to_string();
    let candidates: Vec<&crate::decls::OverloadDecl> = decl.overloads.iter().collect();
    let options = walker.env.assignability_options();

    match resolve(&call_args, receiver_style, &candidates, &walker.subst, &options) {
        Resolution::NoMatch => {
            let rendered = call_args
                .iter()
                .map(Type::render)
                .collect::<Vec<_>>()
                .join(", ");
            walker.error_at(
                id,
                diagnostic_codes::NO_MATCHING_OVERLOAD,
                format_message(diagnostic_messages::NO_MATCHING_OVERLOAD, &[function, &rendered]),
            );
            Ok(Type::Error)
        }
        Resolution::Single {
            overload_id,
            result,
            subst,
        } => {
            walker.subst = subst;
            walker
                .reference_map
                .insert(id, Reference::call(qualified_name, vec![overload_id]));
            Ok(result)
        }
        Resolution::Ambiguous {
            overload_ids,
            result,
        } => {
            walker
                .reference_map
                .insert(id, Reference::call(qualified_name, overload_ids));
            Ok(result)
        }
    }
}
