//! Object types, provider identities, and semantic value types.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and parse from the same string form through [`FromStr`], so the tags used in
//! mapping documents, CLI flags, and JSON payloads stay identical.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnifyError;

// ---------------------------------------------------------------------------
// ObjectType
// ---------------------------------------------------------------------------

/// Kind of business record being unified.
///
/// Selects the canonical schema and the provider default-key table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Contact,
    Company,
    Deal,
    Lead,
    Note,
    Task,
    Event,
    Message,
}

impl ObjectType {
    /// Every object type, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Contact,
        Self::Company,
        Self::Deal,
        Self::Lead,
        Self::Note,
        Self::Task,
        Self::Event,
        Self::Message,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Company => "company",
            Self::Deal => "deal",
            Self::Lead => "lead",
            Self::Note => "note",
            Self::Task => "task",
            Self::Event => "event",
            Self::Message => "message",
        }
    }

    /// Plural form, as used by providers that key association lists by
    /// collection name (`deals`, `companies`).
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Contact => "contacts",
            Self::Company => "companies",
            Self::Deal => "deals",
            Self::Lead => "leads",
            Self::Note => "notes",
            Self::Task => "tasks",
            Self::Event => "events",
            Self::Message => "messages",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = UnifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.plural() == s)
            .ok_or_else(|| UnifyError::UnknownObjectType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ProviderId
// ---------------------------------------------------------------------------

/// Third-party system a connection talks to.
///
/// Immutable once a connection exists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Hubspot,
    Zohocrm,
    Sfdc,
    Pipedrive,
    Closecrm,
    #[serde(rename = "ms_dynamics_365_sales")]
    MsDynamics365Sales,
    Slack,
    Discord,
}

impl ProviderId {
    pub const ALL: [Self; 8] = [
        Self::Hubspot,
        Self::Zohocrm,
        Self::Sfdc,
        Self::Pipedrive,
        Self::Closecrm,
        Self::MsDynamics365Sales,
        Self::Slack,
        Self::Discord,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hubspot => "hubspot",
            Self::Zohocrm => "zohocrm",
            Self::Sfdc => "sfdc",
            Self::Pipedrive => "pipedrive",
            Self::Closecrm => "closecrm",
            Self::MsDynamics365Sales => "ms_dynamics_365_sales",
            Self::Slack => "slack",
            Self::Discord => "discord",
        }
    }

    /// Whether the provider returns custom-field values keyed by opaque IDs
    /// that must be resolved against a field catalog before unify.
    #[must_use]
    pub const fn externalizes_custom_fields(self) -> bool {
        matches!(self, Self::Pipedrive)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = UnifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnifyError::UnknownProvider(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ValueType
// ---------------------------------------------------------------------------

/// Semantic type a field value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Timestamp,
    Enum,
    Object,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Enum => "enum",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
