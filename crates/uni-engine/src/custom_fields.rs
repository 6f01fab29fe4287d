//! Custom Field Resolver: opaque provider field IDs -> catalog labels.
//!
//! Providers such as Pipedrive key custom values by a generated hash
//! (`"9dc8...": "Gold"`) and publish a separate field-definition list. Tenant
//! mappings are written against the human-readable label, so the raw record is
//! rewritten before unify runs.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uni_core::{Diagnostic, DiagnosticKind, Transformed, UnifyError};

/// One custom field definition from a provider catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogField {
    pub label: String,
    pub field_type: Option<String>,
    /// Option id -> option label, for single/multi-select fields.
    pub options: HashMap<String, String>,
}

/// Opaque field ID -> definition, for one (provider, object type).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFieldCatalog {
    fields: HashMap<String, CatalogField>,
}

impl ProviderFieldCatalog {
    /// Parse a provider field-definition list.
    ///
    /// Accepts `[{"key", "name", "field_type", "options"}]` (Pipedrive's
    /// `personFields` / `dealFields` shape, `id`/`label`/`type` also accepted),
    /// optionally wrapped as `{"data": [...]}`. Entries flagged
    /// `"edit_flag": false` are built-in provider fields and are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::InvalidFieldCatalog`] if the document is not a
    /// list of objects or an entry has no key or label.
    pub fn parse(raw: &Value) -> Result<Self, UnifyError> {
        let entries = match raw {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(UnifyError::InvalidFieldCatalog("expected a list of field definitions".into())),
            },
            other => {
                return Err(UnifyError::InvalidFieldCatalog(format!(
                    "expected a list of field definitions, got {other}"
                )));
            }
        };

        let mut fields = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let Value::Object(entry) = entry else {
                return Err(UnifyError::InvalidFieldCatalog(format!("entry {position} is not an object")));
            };
            if entry.get("edit_flag") == Some(&Value::Bool(false)) {
                continue;
            }
            let key = first_string(entry, &["key", "id"])
                .ok_or_else(|| UnifyError::InvalidFieldCatalog(format!("entry {position} has no key")))?;
            let label = first_string(entry, &["name", "label"])
                .ok_or_else(|| UnifyError::InvalidFieldCatalog(format!("entry {position} ({key}) has no name")))?;
            let field_type = first_string(entry, &["field_type", "type"]);
            fields.insert(
                key,
                CatalogField {
                    label,
                    field_type,
                    options: parse_options(entry.get("options")),
                },
            );
        }
        Ok(Self { fields })
    }

    /// Insert a definition directly.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.fields.insert(
            key.into(),
            CatalogField {
                label: label.into(),
                field_type: None,
                options: HashMap::new(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CatalogField> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn first_string(entry: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match entry.get(*name) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn parse_options(raw: Option<&Value>) -> HashMap<String, String> {
    let Some(Value::Array(options)) = raw else {
        return HashMap::new();
    };
    options
        .iter()
        .filter_map(|option| {
            let Value::Object(option) = option else {
                return None;
            };
            Some((first_string(option, &["id"])?, first_string(option, &["label", "name"])?))
        })
        .collect()
}

/// Rewrite catalog-keyed values in `raw` to their labels.
///
/// Keys the catalog does not know pass through unchanged. A label that would
/// overwrite a key already present in the record is not applied. Select
/// values that reference catalog option ids are replaced by option labels.
#[must_use]
pub fn resolve_custom_fields(raw: &Value, catalog: &ProviderFieldCatalog) -> Value {
    let Value::Object(record) = raw else {
        return raw.clone();
    };

    let mut resolved = Map::with_capacity(record.len());
    for (key, value) in record {
        match catalog.get(key) {
            Some(field) if !record.contains_key(&field.label) => {
                resolved.insert(field.label.clone(), resolve_options(value, field));
            }
            _ => {
                resolved.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(resolved)
}

fn resolve_options(value: &Value, field: &CatalogField) -> Value {
    if field.options.is_empty() {
        return value.clone();
    }
    let lookup = |id: &str| field.options.get(id.trim()).cloned();
    match value {
        Value::Number(n) => lookup(&n.to_string()).map_or_else(|| value.clone(), Value::String),
        Value::String(s) if field.field_type.as_deref() == Some("set") => {
            let labels: Option<Vec<String>> = s.split(',').map(lookup).collect();
            labels.map_or_else(|| value.clone(), |labels| Value::String(labels.join(",")))
        }
        Value::String(s) => lookup(s).map_or_else(|| value.clone(), Value::String),
        _ => value.clone(),
    }
}

/// Parse `raw_catalog` and resolve `raw` against it.
///
/// A malformed catalog leaves `raw` untouched and yields an
/// [`DiagnosticKind::InvalidFieldCatalog`] diagnostic.
#[must_use]
pub fn resolve_with_raw_catalog(raw: &Value, raw_catalog: &Value) -> Transformed<Value> {
    match ProviderFieldCatalog::parse(raw_catalog) {
        Ok(catalog) => Transformed::clean(resolve_custom_fields(raw, &catalog)),
        Err(error) => {
            tracing::warn!(%error, "field catalog unusable; custom fields left unresolved");
            Transformed::new(
                raw.clone(),
                vec![Diagnostic::new(DiagnosticKind::InvalidFieldCatalog, error.to_string())],
            )
        }
    }
}
