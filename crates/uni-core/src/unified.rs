//! The canonical, provider-agnostic record shape.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ObjectType;
use crate::value::FieldValue;

/// A record in canonical form.
///
/// Standard fields are flattened to the top level of the serialized object and
/// are always present; an absent value renders as `null`. Tenant or provider
/// custom fields live in `additional` under stable canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedObject {
    pub object_type: ObjectType,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Option<FieldValue>>,
    #[serde(default)]
    pub additional: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<AssociatedObjects>,
}

/// Related records of one association type, in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedObjects {
    pub association_type: String,
    pub objects: Vec<UnifiedObject>,
}

impl UnifiedObject {
    /// An object with no fields set.
    #[must_use]
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            fields: BTreeMap::new(),
            additional: BTreeMap::new(),
            associations: Vec::new(),
        }
    }

    /// Value of a standard field, `None` when absent or not declared.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Set a standard field, replacing any previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), Some(value.into()));
    }

    /// Builder-style variant of [`set_field`](Self::set_field).
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Builder-style insert into the additional-fields bag.
    #[must_use]
    pub fn with_additional(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.additional.insert(name.into(), value.into());
        self
    }

    /// Related records for one association type, if resolved.
    #[must_use]
    pub fn associated(&self, association_type: &str) -> Option<&[UnifiedObject]> {
        self.associations
            .iter()
            .find(|a| a.association_type == association_type)
            .map(|a| a.objects.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn standard_fields_flatten_and_absent_renders_null() {
        let mut contact = UnifiedObject::new(ObjectType::Contact).with_field("firstName", "Ada");
        contact.fields.insert("email".into(), None);

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            json!({
                "objectType": "contact",
                "firstName": "Ada",
                "email": null,
                "additional": {}
            })
        );
    }

    #[test]
    fn serde_roundtrip_keeps_associations() {
        let deal = UnifiedObject::new(ObjectType::Deal).with_field("name", "Renewal");
        let mut contact = UnifiedObject::new(ObjectType::Contact)
            .with_field("lastName", "Lovelace")
            .with_additional("favoriteColor", "teal");
        contact.associations.push(AssociatedObjects {
            association_type: "deal".into(),
            objects: vec![deal],
        });

        let json = serde_json::to_string(&contact).unwrap();
        let back: UnifiedObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contact);
        assert_eq!(back.associated("deal").map(<[_]>::len), Some(1));
        assert!(back.associated("company").is_none());
    }
}
