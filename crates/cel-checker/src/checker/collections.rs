//! List/map literal and struct-creation node handling (§4.7).

use cel_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};

use crate::ast::{ExprId, MapEntry, StructEntry};
use crate::result::Reference;
use crate::schema::Cardinality;
use crate::types::{wrapper_for_message_name, Type, TypeParamId};

use super::{AbortReason, Walker};

/// `[e₁…]`: element type is the LUB of element types; empty list introduces
/// a fresh type parameter that collapses to `Dyn` on substitution finalize
/// (§4.7).
pub(crate) fn type_list(
    walker: &mut Walker,
    _id: ExprId,
    elements: &[ExprId],
) -> Result<Type, AbortReason> {
    if elements.is_empty() {
        return Ok(Type::list_of(Type::TypeParam(TypeParamId::fresh())));
    }
    let mut elem_ty: Option<Type> = None;
    for &elem in elements {
        let ty = walker.type_of(elem)?.substitute(&walker.subst);
        elem_ty = Some(match elem_ty {
            Some(acc) => Type::most_specific(&acc, &ty, &walker.subst),
            None => ty,
        });
    }
    Ok(Type::list_of(elem_ty.unwrap_or(Type::Dyn)))
}

/// `{k:v,…}`: key type is LUB of key types (warning if not in the
/// permitted literal-key set, §4.7); value type is LUB; empty map
/// introduces fresh key/value parameters.
pub(crate) fn type_map(
    walker: &mut Walker,
    id: ExprId,
    entries: &[MapEntry],
) -> Result<Type, AbortReason> {
    if entries.is_empty() {
        return Ok(Type::map_of(
            Type::TypeParam(TypeParamId::fresh()),
            Type::TypeParam(TypeParamId::fresh()),
        ));
    }
    let mut key_ty: Option<Type> = None;
    let mut value_ty: Option<Type> = None;
    for entry in entries {
        let k = walker.type_of(entry.key)?.substitute(&walker.subst);
        let v = walker.type_of(entry.value)?.substitute(&walker.subst);
        key_ty = Some(match key_ty {
            Some(acc) => Type::most_specific(&acc, &k, &walker.subst),
            None => k,
        });
        value_ty = Some(match value_ty {
            Some(acc) => Type::most_specific(&acc, &v, &walker.subst),
            None => v,
        });
    }
    let key_ty = key_ty.unwrap_or(Type::Dyn);
    let value_ty = value_ty.unwrap_or(Type::Dyn);

    let key_ty = if key_ty.is_permitted_literal_map_key() {
        key_ty
    } else {
        let rendered = key_ty.render();
        walker.warning_at(
            id,
            diagnostic_codes::UNSUPPORTED_MAP_KEY_TYPE,
            format_message(diagnostic_messages::UNSUPPORTED_MAP_KEY_TYPE, &[&rendered]),
        );
        Type::Dyn
    };

    Ok(Type::map_of(key_ty, value_ty))
}

/// `M{f:v,…}`: resolves `M` via the container walk, then unifies each
/// field's provided type against the schema's declared field type (§4.7).
pub(crate) fn type_struct(
    walker: &mut Walker,
    id: ExprId,
    message_name: &str,
    entries: &[StructEntry],
) -> Result<Type, AbortReason> {
    let Some(qualified) = walker.env.resolve_type_name(message_name) else {
        walker.error_at(
            id,
            diagnostic_codes::UNDECLARED_REFERENCE,
            format_message(
                diagnostic_messages::UNDECLARED_REFERENCE,
                &[message_name, walker.env.container()],
            ),
        );
        return Ok(Type::Error);
    };

    if wrapper_for_message_name(&qualified).is_some()
        || matches!(
            qualified.as_str(),
            "google.protobuf.Any" | "google.protobuf.Duration" | "google.protobuf.Timestamp"
        )
    {
        // Well-known types are constructible as struct literals regardless
        // of `allow_well_known_type_context_declarations` (that flag only
        // gates context declarations, §4.2); the schema oracle doesn't
        // model their fields, so every field value is typed but unchecked.
        for entry in entries {
            walker.type_of(entry.value)?;
        }
        if walker.env.options().update_struct_type_names {
            walker
                .reference_map
                .insert(id, Reference::variable(qualified.clone()));
        }
        return Ok(Type::Message(qualified));
    }

    let descriptor = walker.env.schema().find_message(&qualified).cloned();
    let Some(descriptor) = descriptor else {
        for entry in entries {
            walker.type_of(entry.value)?;
        }
        if walker.env.schema().find_enum(&qualified).is_some() {
            walker.error_at(
                id,
                diagnostic_codes::NOT_A_MESSAGE_TYPE,
                format_message(diagnostic_messages::NOT_A_MESSAGE_TYPE, &[&qualified]),
            );
            return Ok(Type::Error);
        }
        return Ok(Type::Message(qualified));
    };

    for entry in entries {
        let provided = walker.type_of(entry.value)?.substitute(&walker.subst);
        match descriptor.field(&entry.field) {
            Some(field) => {
                // A repeated field's descriptor stores its element type;
                // the value a literal initializer provides is the whole
                // `List` (proto map fields are modeled as `Map` fields
                // directly, not as `Cardinality::Repeated`).
                let declared_ty = match field.cardinality {
                    Cardinality::Repeated => Type::list_of(field.ty.clone()),
                    Cardinality::Optional | Cardinality::Oneof => field.ty.clone(),
                };
                // `?field: v` expects `v: Optional(F)` rather than `F`
                // itself (§4.11).
                let field_ty = if entry.optional {
                    Type::optional_of(declared_ty.clone())
                } else {
                    declared_ty.clone()
                };
                let options = walker.env.assignability_options();
                match Type::assignable(&field_ty, &provided, &walker.subst, &options) {
                    Some(subst) => walker.subst = subst,
                    None => {
                        let rendered_field = declared_ty.render();
                        let rendered_provided = provided.render();
                        walker.error_at(
                            entry.value,
                            diagnostic_codes::FIELD_TYPE_MISMATCH,
                            format_message(
                                diagnostic_messages::FIELD_TYPE_MISMATCH,
                                &[&entry.field, &rendered_field, &rendered_provided],
                            ),
                        );
                    }
                }
            }
            None => {
                walker.error_at(
                    entry.value,
                    diagnostic_codes::UNDEFINED_FIELD,
                    format_message(
                        diagnostic_messages::UNDEFINED_FIELD,
                        &[&entry.field, &qualified],
                    ),
                );
            }
        }
    }

    if walker.env.options().update_struct_type_names {
        walker
            .reference_map
            .insert(id, Reference::variable(qualified.clone()));
    }
    Ok(Type::Message(qualified))
}
