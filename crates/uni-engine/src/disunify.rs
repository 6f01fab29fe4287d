//! [`UnifiedObject`] -> provider write payload.

use serde_json::{Map, Value};
use uni_core::{Diagnostic, DiagnosticKind, FieldValue, Transformed, UnifiedObject, UnifyError, ValueType};
use uni_schema::WriteEnvelope;

use crate::coerce::{coerce, render};
use crate::context::ResolvedContext;
use crate::flatten::{DATA_KEY, PROPERTIES_KEY};
use crate::path::set_path;

/// Build the provider payload for a create/update call.
///
/// Read-only fields (ids, audit timestamps) and absent values are omitted.
/// `additional` entries go to their mapped provider key, or are passed
/// through under their own name. Associations are not written.
///
/// # Errors
///
/// Returns [`UnifyError::RequiredFieldMissing`] if a required standard field
/// is absent or null.
pub fn disunify_object(unified: &UnifiedObject, ctx: &ResolvedContext) -> Result<Transformed<Value>, UnifyError> {
    let mut diagnostics = Vec::new();
    let mut payload = Map::new();

    for field in &ctx.schema.fields {
        let value = unified.field(field.canonical_name).filter(|v| !v.is_null());
        let Some(value) = value else {
            if field.required {
                return Err(UnifyError::RequiredFieldMissing {
                    object_type: ctx.object_type.to_string(),
                    field: field.canonical_name.to_string(),
                });
            }
            continue;
        };
        if field.read_only {
            continue;
        }
        let Some(key) = ctx.source_key(field.canonical_name) else {
            tracing::debug!(
                provider = %ctx.provider,
                field = field.canonical_name,
                "no provider key for standard field; skipped"
            );
            continue;
        };
        match prepare(value, field.value_type, field.allowed, ctx) {
            Ok(Some(json)) => set_path(&mut payload, key, json),
            Ok(None) => {}
            Err(reason) => diagnostics.push(Diagnostic::for_field(
                DiagnosticKind::CoercionFailed,
                field.canonical_name,
                reason,
            )),
        }
    }

    for (name, value) in &unified.additional {
        match ctx.mapping.custom_by_canonical(name) {
            Some(mapping) => match prepare(value, mapping.value_type, &[], ctx) {
                Ok(json) => set_path(
                    &mut payload,
                    &mapping.provider_field_key,
                    json.unwrap_or(Value::Null),
                ),
                Err(reason) => diagnostics.push(Diagnostic::for_field(DiagnosticKind::CoercionFailed, name, reason)),
            },
            None => {
                payload.insert(name.clone(), value.to_json());
            }
        }
    }

    Ok(Transformed::new(wrap(payload, ctx.layout.envelope), diagnostics))
}

fn prepare(
    value: &FieldValue,
    value_type: ValueType,
    allowed: &[&str],
    ctx: &ResolvedContext,
) -> Result<Option<Value>, String> {
    let coerced = coerce(&value.to_json(), value_type, allowed)?;
    Ok(coerced.map(|v| render(&v, ctx.layout.timestamps)))
}

fn wrap(payload: Map<String, Value>, envelope: WriteEnvelope) -> Value {
    let (key, inner) = match envelope {
        WriteEnvelope::Flat => return Value::Object(payload),
        WriteEnvelope::Properties => (PROPERTIES_KEY, Value::Object(payload)),
        WriteEnvelope::DataArray => (DATA_KEY, Value::Array(vec![Value::Object(payload)])),
    };
    let mut wrapper = Map::new();
    wrapper.insert(key.to_string(), inner);
    Value::Object(wrapper)
}
