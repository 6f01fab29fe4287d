//! Cross-cutting error types for the unification engine.
//!
//! Only failures that leave the *shape* of a transform undefined are raised
//! as errors. Data-quality problems (a value that does not coerce, an unknown
//! association type, a catalog key that cannot be resolved) are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use thiserror::Error;

/// Errors that can be raised by any unification crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// The object type has no canonical schema registered.
    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    /// The provider is not known, or has no field table for the object type.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The field mapping store has no entry for this key. The engine degrades
    /// to provider defaults when it sees this.
    #[error("Field mapping not found: {tenant_mapping_id} {provider} {object_type}")]
    MappingNotFound {
        tenant_mapping_id: String,
        provider: String,
        object_type: String,
    },

    /// The provider record is not a JSON object.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A field the canonical schema marks required for writes is absent.
    #[error("Required field missing: {object_type}.{field}")]
    RequiredFieldMissing { object_type: String, field: String },

    /// The provider field catalog could not be interpreted.
    #[error("Invalid field catalog: {0}")]
    InvalidFieldCatalog(String),

    /// A mapping document violates its invariants.
    #[error("Invalid field mapping: {0}")]
    InvalidMapping(String),

    /// A provider adapter failed to fetch or decode a record.
    #[error("Adapter error ({provider}): {message}")]
    Adapter { provider: String, message: String },

    /// The caller's deadline elapsed before the operation finished.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl UnifyError {
    /// Whether this error makes the transform shape undefined and must be
    /// surfaced to the caller.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MappingNotFound { .. } | Self::InvalidFieldCatalog(_)
        )
    }
}
