//! Declarative building blocks of the canonical schema.

use uni_core::{ObjectType, ProviderId, ValueType};

/// One standard field of a canonical object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardField {
    pub canonical_name: &'static str,
    pub value_type: ValueType,
    /// Must be present when writing to a provider.
    pub required: bool,
    /// Populated on reads only (provider IDs, audit timestamps).
    pub read_only: bool,
    /// Accepted values for [`ValueType::Enum`] fields.
    pub allowed: &'static [&'static str],
}

impl StandardField {
    #[must_use]
    pub const fn new(canonical_name: &'static str, value_type: ValueType) -> Self {
        Self {
            canonical_name,
            value_type,
            required: false,
            read_only: false,
            allowed: &[],
        }
    }

    #[must_use]
    pub const fn string(canonical_name: &'static str) -> Self {
        Self::new(canonical_name, ValueType::String)
    }

    #[must_use]
    pub const fn number(canonical_name: &'static str) -> Self {
        Self::new(canonical_name, ValueType::Number)
    }

    #[must_use]
    pub const fn boolean(canonical_name: &'static str) -> Self {
        Self::new(canonical_name, ValueType::Boolean)
    }

    #[must_use]
    pub const fn timestamp(canonical_name: &'static str) -> Self {
        Self::new(canonical_name, ValueType::Timestamp)
    }

    #[must_use]
    pub const fn object(canonical_name: &'static str) -> Self {
        Self::new(canonical_name, ValueType::Object)
    }

    #[must_use]
    pub const fn enumeration(canonical_name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self {
            allowed,
            ..Self::new(canonical_name, ValueType::Enum)
        }
    }

    #[must_use]
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    #[must_use]
    pub const fn read_only(self) -> Self {
        Self {
            read_only: true,
            ..self
        }
    }
}

/// Canonical shape of one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    pub object_type: ObjectType,
    pub fields: Vec<StandardField>,
    /// Association types a caller may request for this object type.
    pub associations: Vec<&'static str>,
}

impl ObjectSchema {
    #[must_use]
    pub fn field(&self, canonical_name: &str) -> Option<&StandardField> {
        self.fields.iter().find(|f| f.canonical_name == canonical_name)
    }
}

/// How a provider's write API expects the payload to be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEnvelope {
    /// Fields at the top level.
    Flat,
    /// Fields under a `properties` object.
    Properties,
    /// A single record inside a `data` array.
    DataArray,
}

/// Representation a provider expects for timestamps on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    Rfc3339,
    EpochMillis,
    /// Seconds with a fractional part, rendered as a string.
    EpochSeconds,
}

/// Where a provider keeps each canonical field for one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLayout {
    pub provider: ProviderId,
    pub object_type: ObjectType,
    pub envelope: WriteEnvelope,
    pub timestamps: TimestampFormat,
    /// Canonical name -> provider key path (dot-separated for nested values).
    pub keys: &'static [(&'static str, &'static str)],
}

impl ProviderLayout {
    /// Built-in provider key for a canonical field.
    #[must_use]
    pub fn default_key(&self, canonical_name: &str) -> Option<&'static str> {
        self.keys
            .iter()
            .find(|(canonical, _)| *canonical == canonical_name)
            .map(|(_, key)| *key)
    }
}
