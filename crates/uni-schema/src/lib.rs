//! # uni-schema
//!
//! Canonical Schema Registry and JSON Schema validation for the unification engine.
//!
//! This crate provides:
//! - `CanonicalRegistry`: standard fields per object type, with the static
//!   per-provider default-key tables, write envelopes, and association whitelists
//! - `MappingSchemas`: JSON Schemas for mapping documents and unified objects,
//!   used to validate raw configuration before it is deserialized
//!
//! ## Architecture
//!
//! Configuration and record types are defined in `uni-core` with `#[derive(JsonSchema)]`.
//! This crate layers the registry and validation on top; `uni-engine` consults
//! the registry for every transform.

pub mod builtin;
mod error;
pub mod field;
mod registry;
mod validation;

pub use error::SchemaError;
pub use field::{ObjectSchema, ProviderLayout, StandardField, TimestampFormat, WriteEnvelope};
pub use registry::CanonicalRegistry;
pub use validation::{MappingDocument, MappingSchemas};
