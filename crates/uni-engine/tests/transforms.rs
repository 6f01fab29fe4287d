//! End-to-end unify/disunify through the `Engine` facade.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::MockAdapter;
use pretty_assertions::assert_eq;
use serde_json::json;
use uni_core::{
    AccountFieldMappingConfig, CustomFieldMapping, DiagnosticKind, FieldMappingConfig, FieldValue,
    InMemoryMappingStore, MappingKey, ObjectType, ProviderId, UnifiedObject, UnifyError, ValueType,
};
use uni_engine::{Engine, ResolvedContext, TransformContext, disunify_object, unify_object};
use uni_schema::CanonicalRegistry;
use uni_schema::builtin::KEY_TABLES;

fn engine_with_mapping(key: MappingKey, mapping: FieldMappingConfig) -> Engine {
    let mut store = InMemoryMappingStore::new();
    store.insert(key, mapping).unwrap();
    Engine::builder().mapping_store(Arc::new(store)).build()
}

#[tokio::test]
async fn acme_company_from_hubspot() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Company);
    let out = engine
        .unify(
            json!({"id": "1", "properties": {"name": "Acme", "industry": "Tech"}}),
            &ctx,
        )
        .await
        .unwrap();

    assert!(out.diagnostics.is_empty());
    assert_eq!(out.value.field("name"), Some(&FieldValue::String("Acme".into())));
    assert_eq!(out.value.field("industry"), Some(&FieldValue::String("Tech".into())));
    assert_eq!(out.value.field("remoteId"), Some(&FieldValue::String("1".into())));
    assert!(out.value.additional.is_empty());
}

#[tokio::test]
async fn disunify_then_unify_preserves_writable_fields() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Deal);
    let close: DateTime<Utc> = "2024-09-30T00:00:00Z".parse().unwrap();
    let deal = UnifiedObject::new(ObjectType::Deal)
        .with_field("name", "Renewal")
        .with_field("amount", 1200.5)
        .with_field("priority", "high")
        .with_field("stage", "closedwon")
        .with_field("probability", 0.9)
        .with_field("expectedCloseDate", close)
        .with_field("isWon", true);

    let payload = engine.disunify(&deal, &ctx).await.unwrap();
    assert_eq!(payload.value["properties"]["closedate"], json!(close.timestamp_millis()));

    let back = engine.unify(payload.value, &ctx).await.unwrap();
    assert!(back.diagnostics.is_empty(), "{:?}", back.diagnostics);
    for (name, value) in &deal.fields {
        assert_eq!(back.value.fields.get(name), Some(value), "field {name}");
    }
}

fn sample_value(value_type: ValueType, allowed: &[&str]) -> FieldValue {
    match value_type {
        ValueType::String => FieldValue::String("v".into()),
        ValueType::Number => FieldValue::Number(3.0),
        ValueType::Boolean => FieldValue::Bool(true),
        ValueType::Timestamp => FieldValue::Timestamp("2024-01-05T10:00:00Z".parse().unwrap()),
        ValueType::Enum => FieldValue::String(allowed.first().copied().unwrap_or("v").into()),
        ValueType::Object => FieldValue::Json(json!({"line1": "1 Main St"})),
    }
}

#[test]
fn every_layout_round_trips_writable_fields() {
    let registry = CanonicalRegistry::builtin();
    for (provider, object_type, keys) in KEY_TABLES {
        let ctx = ResolvedContext::with_defaults(&registry, *provider, *object_type).unwrap();
        let mut unified = UnifiedObject::new(*object_type);
        for field in ctx.schema.fields.iter().filter(|f| !f.read_only) {
            unified
                .fields
                .insert(field.canonical_name.to_string(), Some(sample_value(field.value_type, field.allowed)));
        }

        let payload = disunify_object(&unified, &ctx).unwrap();
        let back = unify_object(&payload.value, &ctx, Vec::new()).unwrap();

        for (canonical, _) in *keys {
            let Some(written) = unified.fields.get(*canonical) else {
                continue;
            };
            assert_eq!(
                back.value.fields.get(*canonical),
                Some(written),
                "{provider}/{object_type}.{canonical}"
            );
        }
    }
}

#[tokio::test]
async fn zoho_payload_reads_back_through_data_envelope() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Zohocrm, ObjectType::Deal);
    let deal = UnifiedObject::new(ObjectType::Deal)
        .with_field("name", "Renewal")
        .with_field("amount", 1200.0);

    let payload = engine.disunify(&deal, &ctx).await.unwrap();
    assert_eq!(payload.value["data"][0]["Deal_Name"], json!("Renewal"));

    let back = engine.unify(payload.value, &ctx).await.unwrap();
    assert_eq!(back.value.field("name"), Some(&FieldValue::String("Renewal".into())));
    assert_eq!(back.value.field("amount"), Some(&FieldValue::Number(1200.0)));
}

#[tokio::test]
async fn tenant_override_wins_over_default_key() {
    let mapping = FieldMappingConfig {
        standard_field_overrides: BTreeMap::from([("email".to_string(), "work_email".to_string())]),
        custom_field_mappings: Vec::new(),
    };
    let engine = engine_with_mapping(
        MappingKey::new("tenant-1", ProviderId::Hubspot, ObjectType::Contact),
        mapping,
    );
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_tenant_mapping("tenant-1");
    let raw = json!({"properties": {"email": "home@example.com", "work_email": "ada@acme.test"}});

    let out = engine.unify(raw, &ctx).await.unwrap();
    assert_eq!(out.value.field("email"), Some(&FieldValue::String("ada@acme.test".into())));

    let payload = engine.disunify(&out.value, &ctx).await.unwrap();
    assert_eq!(payload.value["properties"]["work_email"], json!("ada@acme.test"));
    assert!(payload.value["properties"].get("email").is_none());
}

#[tokio::test]
async fn fetch_requests_overridden_keys_from_the_adapter() {
    let mapping = FieldMappingConfig {
        standard_field_overrides: BTreeMap::from([("email".to_string(), "work_email".to_string())]),
        custom_field_mappings: Vec::new(),
    };
    let mut store = InMemoryMappingStore::new();
    store
        .insert(MappingKey::new("tenant-1", ProviderId::Hubspot, ObjectType::Contact), mapping)
        .unwrap();
    let adapter = Arc::new(MockAdapter::new(ProviderId::Hubspot).with_record(
        ObjectType::Contact,
        "7",
        json!({"id": "7", "properties": {"work_email": "ada@acme.test"}}),
    ));
    let engine = Engine::builder()
        .mapping_store(Arc::new(store))
        .adapter(adapter.clone())
        .build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_tenant_mapping("tenant-1");

    let out = engine.fetch("7", &ctx).await.unwrap();
    assert_eq!(out.value.field("email"), Some(&FieldValue::String("ada@acme.test".into())));
    let fields = adapter.last_requested_fields();
    assert!(fields.contains(&"work_email".to_string()), "{fields:?}");
    assert!(!fields.contains(&"email".to_string()), "{fields:?}");
}

#[tokio::test]
async fn fetch_without_adapter_is_an_adapter_error() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact);
    let err = engine.fetch("7", &ctx).await.unwrap_err();
    assert!(matches!(err, UnifyError::Adapter { .. }), "{err:?}");
}

#[tokio::test]
async fn unmapped_account_fields_are_auto_discovered() {
    let account = AccountFieldMappingConfig::default().with_field(ObjectType::Contact, "favorite_color", ValueType::String);
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_account_config(account);

    let out = engine
        .unify(json!({"properties": {"firstname": "Ada", "favorite_color": "teal"}}), &ctx)
        .await
        .unwrap();
    assert_eq!(
        out.value.additional,
        BTreeMap::from([("favorite_color".to_string(), FieldValue::String("teal".into()))])
    );
}

#[tokio::test]
async fn missing_tenant_mapping_degrades_to_defaults() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Sfdc, ObjectType::Contact).with_tenant_mapping("nobody");
    let out = engine.unify(json!({"FirstName": "Ada"}), &ctx).await.unwrap();
    assert_eq!(out.value.field("firstName"), Some(&FieldValue::String("Ada".into())));
    assert!(out.has(DiagnosticKind::MappingNotFound));
}

#[tokio::test]
async fn provider_without_layout_is_fatal() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Slack, ObjectType::Deal);
    let err = engine.unify(json!({}), &ctx).await.unwrap_err();
    assert!(matches!(err, UnifyError::UnknownProvider(_)));
}

#[tokio::test]
async fn zoho_write_is_wrapped_in_data_array() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Zohocrm, ObjectType::Company);
    let company = UnifiedObject::new(ObjectType::Company).with_field("name", "Acme");
    let payload = engine.disunify(&company, &ctx).await.unwrap();
    assert_eq!(payload.value, json!({"data": [{"Account_Name": "Acme"}]}));
}

#[tokio::test]
async fn pipedrive_custom_fields_resolve_through_catalog() {
    let mapping = FieldMappingConfig {
        standard_field_overrides: BTreeMap::new(),
        custom_field_mappings: vec![CustomFieldMapping {
            provider_field_key: "Region".into(),
            canonical_field_name: "region".into(),
            value_type: ValueType::String,
        }],
    };
    let mut store = InMemoryMappingStore::new();
    store
        .insert(MappingKey::new("t1", ProviderId::Pipedrive, ObjectType::Deal), mapping)
        .unwrap();
    let adapter = Arc::new(
        MockAdapter::new(ProviderId::Pipedrive)
            .with_catalog(json!([{"key": "a1b2c3", "name": "Region", "field_type": "varchar"}])),
    );
    let engine = Engine::builder()
        .mapping_store(Arc::new(store))
        .adapter(adapter.clone())
        .build();
    let ctx = TransformContext::new(ProviderId::Pipedrive, ObjectType::Deal).with_tenant_mapping("t1");

    for _ in 0..2 {
        let out = engine
            .unify(json!({"id": 5, "title": "Renewal", "a1b2c3": "EMEA"}), &ctx)
            .await
            .unwrap();
        assert_eq!(out.value.additional.get("region"), Some(&FieldValue::String("EMEA".into())));
        assert_eq!(out.value.field("name"), Some(&FieldValue::String("Renewal".into())));
    }
    assert_eq!(adapter.catalog_fetch_count(), 1);
}

#[tokio::test]
async fn malformed_catalog_passes_ids_through() {
    let adapter = Arc::new(MockAdapter::new(ProviderId::Pipedrive).with_catalog(json!({"oops": true})));
    let engine = Engine::builder().adapter(adapter).build();
    let account = AccountFieldMappingConfig::default().with_field(ObjectType::Deal, "a1b2c3", ValueType::String);
    let ctx = TransformContext::new(ProviderId::Pipedrive, ObjectType::Deal).with_account_config(account);

    let out = engine
        .unify(json!({"title": "Renewal", "a1b2c3": "EMEA"}), &ctx)
        .await
        .unwrap();
    assert!(out.has(DiagnosticKind::InvalidFieldCatalog));
    assert_eq!(out.value.additional.get("a1b2c3"), Some(&FieldValue::String("EMEA".into())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batch_fetches_catalog_once() {
    let adapter = Arc::new(
        MockAdapter::new(ProviderId::Pipedrive)
            .with_catalog(json!([{"key": "a1b2c3", "name": "Region", "field_type": "varchar"}])),
    );
    let engine = Engine::builder().adapter(adapter.clone()).build();
    let ctx = TransformContext::new(ProviderId::Pipedrive, ObjectType::Deal);
    let raws = (0..16).map(|i| json!({"id": i, "title": format!("Deal {i}"), "a1b2c3": "EMEA"})).collect();

    let items = engine.unify_all(raws, &ctx).await.unwrap();
    assert_eq!(items.len(), 16);
    assert!(items.iter().all(|item| item.is_ok()));
    assert_eq!(adapter.catalog_fetch_count(), 1);
}
