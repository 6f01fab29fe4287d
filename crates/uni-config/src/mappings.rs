//! Tenant mapping documents on disk.
//!
//! Each `<tenant_mapping_id>.toml` file in the mapping directory holds one
//! [`MappingDocument`]: tables keyed by provider, then object type.
//!
//! ```toml
//! [hubspot.contact.standard_field_overrides]
//! email = "work_email"
//!
//! [[hubspot.contact.custom_field_mappings]]
//! provider_field_key = "favorite_color"
//! canonical_field_name = "favoriteColor"
//! value_type = "string"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uni_core::{FieldMappingConfig, FieldMappingStore, MappingKey, UnifyError};
use uni_schema::{MappingDocument, MappingSchemas};

use crate::error::ConfigError;

fn default_dir() -> String {
    ".unify/mappings".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingsConfig {
    /// Directory holding one TOML document per tenant mapping id.
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

impl MappingsConfig {
    #[must_use]
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }
}

/// [`FieldMappingStore`] over a directory of TOML mapping documents.
///
/// Documents are read and validated once, when the store is opened.
#[derive(Debug, Default)]
pub struct TomlMappingStore {
    documents: HashMap<String, MappingDocument>,
}

impl TomlMappingStore {
    /// Load every `*.toml` file in `dir`. A missing directory yields an empty
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file cannot be read, is not valid TOML,
    /// fails schema validation, or repeats a custom-field key.
    pub fn open(dir: &Path) -> Result<Self, ConfigError> {
        let mut store = Self::default();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "mapping directory absent; using provider defaults only");
            return Ok(store);
        }

        let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let schemas = MappingSchemas::new();

        for entry in entries {
            let path = entry
                .map_err(|source| ConfigError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(tenant_mapping_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let tenant_mapping_id = tenant_mapping_id.to_string();
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let document = parse_document(&path, &contents, &schemas)?;
            tracing::debug!(tenant_mapping_id, providers = document.len(), "loaded mapping document");
            store.documents.insert(tenant_mapping_id, document);
        }

        Ok(store)
    }

    /// Insert a document directly, bypassing the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMapping`] if any section repeats a
    /// custom-field key.
    pub fn insert(&mut self, tenant_mapping_id: impl Into<String>, document: MappingDocument) -> Result<(), ConfigError> {
        let tenant_mapping_id = tenant_mapping_id.into();
        check_invariants(Path::new(&tenant_mapping_id), &document)?;
        self.documents.insert(tenant_mapping_id, document);
        Ok(())
    }

    /// Tenant mapping ids with a loaded document, sorted.
    #[must_use]
    pub fn tenant_mapping_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl FieldMappingStore for TomlMappingStore {
    async fn load_mapping(&self, key: &MappingKey) -> Result<FieldMappingConfig, UnifyError> {
        self.documents
            .get(&key.tenant_mapping_id)
            .and_then(|doc| doc.get(&key.provider))
            .and_then(|objects| objects.get(&key.object_type))
            .cloned()
            .ok_or_else(|| key.not_found())
    }
}

fn parse_document(path: &Path, contents: &str, schemas: &MappingSchemas) -> Result<MappingDocument, ConfigError> {
    let raw: toml::Value = toml::from_str(contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    let json = serde_json::to_value(&raw).map_err(|e| invalid(path, e.to_string()))?;
    schemas
        .validate("mapping_document", &json)
        .map_err(|e| invalid(path, e.to_string()))?;
    let document: MappingDocument =
        serde_json::from_value(json).map_err(|e| invalid(path, e.to_string()))?;
    check_invariants(path, &document)?;
    Ok(document)
}

fn check_invariants(path: &Path, document: &MappingDocument) -> Result<(), ConfigError> {
    for (provider, objects) in document {
        for (object_type, config) in objects {
            config
                .validate()
                .map_err(|e| invalid(path, format!("{provider}.{object_type}: {e}")))?;
        }
    }
    Ok(())
}

fn invalid(path: &Path, reason: String) -> ConfigError {
    ConfigError::InvalidMapping {
        path: path.to_path_buf(),
        reason,
    }
}
