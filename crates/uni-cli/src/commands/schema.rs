use anyhow::Context;
use serde::Serialize;
use uni_core::{ObjectType, ProviderId, UnifyError, ValueType};
use uni_schema::{CanonicalRegistry, MappingSchemas};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SchemaCommands;
use crate::output::output;

/// Handle `unify schema`.
pub fn handle(action: &SchemaCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SchemaCommands::Fields { object, provider } => {
            let registry = CanonicalRegistry::builtin();
            let report = fields_report(&registry, *object, *provider)?;
            output(&report, flags.format)
        }
        SchemaCommands::Mapping { name, list } => {
            let schemas = MappingSchemas::new();
            if *list {
                return output(&schemas.list(), flags.format);
            }
            let schema = schemas.get(name).with_context(|| {
                format!("unknown schema '{name}'; available: {}", schemas.list().join(", "))
            })?;
            output(schema, flags.format)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldRow {
    name: &'static str,
    value_type: ValueType,
    required: bool,
    read_only: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_key: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldsReport {
    object_type: ObjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<ProviderId>,
    fields: Vec<FieldRow>,
    associations: Vec<&'static str>,
    /// Providers with a built-in key table for this object type.
    providers: Vec<ProviderId>,
}

fn fields_report(
    registry: &CanonicalRegistry,
    object_type: ObjectType,
    provider: Option<ProviderId>,
) -> Result<FieldsReport, UnifyError> {
    let schema = registry.schema(object_type)?;
    let layout = provider.map(|p| registry.layout(p, object_type)).transpose()?;

    let fields = schema
        .fields
        .iter()
        .map(|field| FieldRow {
            name: field.canonical_name,
            value_type: field.value_type,
            required: field.required,
            read_only: field.read_only,
            allowed: field.allowed.to_vec(),
            provider_key: layout.and_then(|l| l.default_key(field.canonical_name)),
        })
        .collect();

    Ok(FieldsReport {
        object_type,
        provider,
        fields,
        associations: schema.associations.clone(),
        providers: registry.providers_for(object_type),
    })
}
