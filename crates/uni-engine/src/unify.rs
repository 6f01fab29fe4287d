//! Provider payload -> [`UnifiedObject`].

use serde_json::Value;
use uni_core::{
    AssociatedObjects, Diagnostic, DiagnosticKind, FieldValue, Transformed, UnifiedObject, UnifyError,
};

use crate::coerce::coerce;
use crate::context::ResolvedContext;
use crate::flatten::{flatten, unwrap_envelope};
use crate::path::get_path;

/// Map one raw provider record onto the canonical shape.
///
/// Every standard field of the object type appears in the result; fields the
/// provider did not send (or sent in an unusable form) are `None`. Values of
/// tenant custom-field mappings land in `additional` under their canonical
/// names, and account-defined custom fields the tenant has not mapped are
/// copied through unchanged. `associations` are attached as given.
///
/// A record still inside its provider's write envelope (a one-element
/// `data` array) is read from inside it.
///
/// # Errors
///
/// Returns [`UnifyError::InvalidPayload`] if `raw` is not a JSON object.
pub fn unify_object(
    raw: &Value,
    ctx: &ResolvedContext,
    associations: Vec<AssociatedObjects>,
) -> Result<Transformed<UnifiedObject>, UnifyError> {
    let flat = flatten(unwrap_envelope(raw, ctx.layout.envelope)).ok_or_else(|| {
        UnifyError::InvalidPayload(format!("{} {} record is not an object", ctx.provider, ctx.object_type))
    })?;
    let mut diagnostics = Vec::new();

    let mut unified = UnifiedObject::new(ctx.object_type);

    for field in &ctx.schema.fields {
        let value = ctx
            .source_key(field.canonical_name)
            .and_then(|key| get_path(&flat, key))
            .and_then(|raw_value| match coerce(raw_value, field.value_type, field.allowed) {
                Ok(value) => value,
                Err(reason) => {
                    tracing::debug!(field = field.canonical_name, %reason, "standard field did not coerce");
                    diagnostics.push(Diagnostic::for_field(
                        DiagnosticKind::CoercionFailed,
                        field.canonical_name,
                        reason,
                    ));
                    None
                }
            });
        unified.fields.insert(field.canonical_name.to_string(), value);
    }

    for mapping in &ctx.mapping.custom_field_mappings {
        let Some(raw_value) = get_path(&flat, &mapping.provider_field_key) else {
            continue;
        };
        match coerce(raw_value, mapping.value_type, &[]) {
            Ok(value) => {
                unified
                    .additional
                    .insert(mapping.canonical_field_name.clone(), value.unwrap_or(FieldValue::Null));
            }
            Err(reason) => diagnostics.push(Diagnostic::for_field(
                DiagnosticKind::CoercionFailed,
                &mapping.canonical_field_name,
                reason,
            )),
        }
    }

    for definition in ctx.account_config.custom_fields(ctx.object_type) {
        if ctx.mapping.maps_provider_key(&definition.name)
            || unified.additional.contains_key(&definition.name)
        {
            continue;
        }
        if let Some(raw_value) = flat.get(&definition.name) {
            unified
                .additional
                .insert(definition.name.clone(), FieldValue::from_json(raw_value));
        }
    }

    unified.associations = associations;
    Ok(Transformed::new(unified, diagnostics))
}
