//! Mapping schema errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema is registered under this name.
    #[error("Unknown mapping schema '{0}'")]
    NotFound(String),

    /// A document does not conform to its schema. Each entry names the
    /// offending instance path.
    #[error("{schema} does not match its schema: {}", errors.join("; "))]
    ValidationFailed { schema: String, errors: Vec<String> },

    /// The generated schema could not be compiled into a validator.
    #[error("Cannot compile schema '{schema}': {reason}")]
    Compile { schema: String, reason: String },
}
