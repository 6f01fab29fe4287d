//! Non-fatal warnings returned alongside transform results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal data-quality problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A value could not be coerced to its declared type and was dropped.
    CoercionFailed,
    /// No tenant mapping exists; provider defaults were used.
    MappingNotFound,
    /// The provider field catalog was malformed; keys passed through unresolved.
    InvalidFieldCatalog,
    /// A requested association type is not valid for the object type.
    InvalidAssociationType,
    /// Fetching or unifying a related record failed.
    AssociationFetchFailed,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoercionFailed => "coercion_failed",
            Self::MappingNotFound => "mapping_not_found",
            Self::InvalidFieldCatalog => "invalid_field_catalog",
            Self::InvalidAssociationType => "invalid_association_type",
            Self::AssociationFetchFailed => "association_fetch_failed",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single warning, optionally tied to a field or association type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn for_field(kind: DiagnosticKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {field}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// A transform result paired with the diagnostics produced while building it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformed<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Transformed<T> {
    #[must_use]
    pub const fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    #[must_use]
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Transform the value, keeping diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Transformed<U> {
        Transformed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}
