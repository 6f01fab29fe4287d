//! # uni-core
//!
//! Core types and error types for the object unification engine.
//!
//! This crate provides the foundational types shared across all unification crates:
//! - Object type, provider, and value-type enums
//! - The canonical `UnifiedObject` and its closed `FieldValue` variant
//! - Tenant field mappings, the account custom-field catalog, and the
//!   `FieldMappingStore` boundary
//! - Non-fatal diagnostics and the cross-cutting `UnifyError`

pub mod diagnostics;
pub mod enums;
pub mod errors;
pub mod mapping;
pub mod unified;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, Transformed};
pub use enums::{ObjectType, ProviderId, ValueType};
pub use errors::UnifyError;
pub use mapping::{
    AccountFieldMappingConfig, CustomFieldDefinition, CustomFieldMapping, FieldMappingConfig,
    FieldMappingStore, InMemoryMappingStore, MappingKey,
};
pub use unified::{AssociatedObjects, UnifiedObject};
pub use value::FieldValue;
