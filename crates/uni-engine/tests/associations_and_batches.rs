//! Association resolution and batch ordering through the `Engine` facade.

mod common;

use std::sync::Arc;

use common::MockAdapter;
use pretty_assertions::assert_eq;
use serde_json::json;
use uni_core::{DiagnosticKind, FieldValue, ObjectType, ProviderId, UnifiedObject, UnifyError};
use uni_engine::{BatchItem, Engine, ItemFailure, ResolvedContext, TransformContext};
use uni_schema::CanonicalRegistry;

fn hubspot_adapter() -> MockAdapter {
    MockAdapter::new(ProviderId::Hubspot)
        .with_record(
            ObjectType::Deal,
            "11",
            json!({"id": "11", "properties": {"dealname": "Renewal", "amount": "500"}}),
        )
        .with_record(
            ObjectType::Deal,
            "12",
            json!({"id": "12", "properties": {"dealname": "Upsell"}}),
        )
        .with_record(
            ObjectType::Company,
            "21",
            json!({"id": "21", "properties": {"name": "Acme"}}),
        )
}

fn contact_with_refs() -> serde_json::Value {
    json!({
        "id": "1",
        "properties": {"firstname": "Ada"},
        "associations": {
            "deals": {"results": [{"id": "12"}, {"id": "11"}]},
            "companies": {"results": [{"id": "21"}]}
        }
    })
}

#[tokio::test]
async fn filter_reports_invalid_and_drops_sentinels() {
    let mut registry = CanonicalRegistry::builtin();
    let mut contact = registry.schema(ObjectType::Contact).unwrap().clone();
    contact.associations = vec!["deal", "lead"];
    registry.register_schema(contact);

    let engine = Engine::builder()
        .registry(registry)
        .adapter(Arc::new(hubspot_adapter()))
        .build();
    let ctx = ResolvedContext::with_defaults(engine.registry(), ProviderId::Hubspot, ObjectType::Contact).unwrap();
    let requested: Vec<String> = ["deal", "bogus", "null"].map(String::from).to_vec();

    let resolution = engine
        .resolve_associations(&contact_with_refs()["associations"], &requested, &ctx)
        .await;

    let keys: Vec<_> = resolution
        .valid_results
        .iter()
        .map(|a| a.association_type.as_str())
        .collect();
    assert_eq!(keys, vec!["deal"]);
    assert_eq!(resolution.invalid_types, vec!["bogus"]);
    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].kind, DiagnosticKind::InvalidAssociationType);
}

#[tokio::test]
async fn associations_follow_request_order_and_ref_order() {
    let engine = Engine::builder().adapter(Arc::new(hubspot_adapter())).build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_associations(["company", "deal"]);

    let out = engine.unify(contact_with_refs(), &ctx).await.unwrap();
    let types: Vec<_> = out
        .value
        .associations
        .iter()
        .map(|a| a.association_type.as_str())
        .collect();
    assert_eq!(types, vec!["company", "deal"]);

    let deals = out.value.associated("deal").unwrap();
    let names: Vec<_> = deals.iter().map(|d| d.field("name").cloned()).collect();
    assert_eq!(
        names,
        vec![
            Some(FieldValue::String("Upsell".into())),
            Some(FieldValue::String("Renewal".into()))
        ]
    );
    assert_eq!(deals[1].field("amount"), Some(&FieldValue::Number(500.0)));
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
}

#[tokio::test]
async fn failed_fetch_yields_empty_set_with_diagnostic() {
    let engine = Engine::builder()
        .adapter(Arc::new(MockAdapter::new(ProviderId::Hubspot)))
        .build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_associations(["deal"]);

    let out = engine.unify(contact_with_refs(), &ctx).await.unwrap();
    assert_eq!(out.value.associated("deal"), Some(&[][..]));
    assert!(out.has(DiagnosticKind::AssociationFetchFailed));
    assert_eq!(out.value.field("firstName"), Some(&FieldValue::String("Ada".into())));
}

#[tokio::test]
async fn one_missing_related_record_keeps_its_siblings() {
    let engine = Engine::builder().adapter(Arc::new(hubspot_adapter())).build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_associations(["deal"]);
    let raw = json!({
        "properties": {"firstname": "Ada"},
        "associations": {"deals": {"results": [{"id": "12"}, {"id": "99"}]}}
    });

    let out = engine.unify(raw, &ctx).await.unwrap();
    let deals = out.value.associated("deal").unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].field("name"), Some(&FieldValue::String("Upsell".into())));

    let failed: Vec<_> = out
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::AssociationFetchFailed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].field.as_deref(), Some("deal"));
    assert!(failed[0].message.contains("99"), "{}", failed[0].message);
}

#[tokio::test]
async fn related_records_are_fetched_with_their_provider_keys() {
    let adapter = Arc::new(hubspot_adapter());
    let engine = Engine::builder().adapter(adapter.clone()).build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact).with_associations(["company"]);

    engine.unify(contact_with_refs(), &ctx).await.unwrap();
    let fields = adapter.last_requested_fields();
    assert!(fields.contains(&"name".to_string()), "{fields:?}");
    assert!(fields.contains(&"numberofemployees".to_string()), "{fields:?}");
}

#[tokio::test]
async fn no_requested_associations_means_no_fetches() {
    let adapter = Arc::new(hubspot_adapter());
    let engine = Engine::builder().adapter(adapter.clone()).build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact);

    let out = engine.unify(contact_with_refs(), &ctx).await.unwrap();
    assert!(out.value.associations.is_empty());
    assert_eq!(adapter.object_fetches.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_keeps_failed_item_in_place() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Company);
    let raws = vec![
        json!({"properties": {"name": "A"}}),
        json!("not a record"),
        json!({"properties": {"name": "C"}}),
    ];

    let results = engine.unify_all(raws, &ctx).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].value().and_then(|c| c.field("name")),
        Some(&FieldValue::String("A".into()))
    );
    assert!(matches!(
        &results[1],
        BatchItem::Failed(ItemFailure { index: 1, error: UnifyError::InvalidPayload(_) })
    ));
    assert_eq!(
        results[2].value().and_then(|c| c.field("name")),
        Some(&FieldValue::String("C".into()))
    );
}

#[tokio::test]
async fn large_batch_preserves_order_under_bounded_concurrency() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Sfdc, ObjectType::Contact);
    let raws: Vec<_> = (0..50).map(|i| json!({"Id": format!("c{i}")})).collect();

    let results = engine.unify_all(raws, &ctx).await.unwrap();
    for (i, item) in results.iter().enumerate() {
        assert_eq!(
            item.value().and_then(|c| c.field("id")),
            Some(&FieldValue::String(format!("c{i}")))
        );
    }
}

#[tokio::test]
async fn disunify_batch_isolates_missing_required_field() {
    let engine = Engine::builder().build();
    let ctx = TransformContext::new(ProviderId::Sfdc, ObjectType::Company);
    let objects = vec![
        UnifiedObject::new(ObjectType::Company).with_field("name", "Acme"),
        UnifiedObject::new(ObjectType::Company).with_field("industry", "Tech"),
    ];

    let results = engine.disunify_all(&objects, &ctx).await.unwrap();
    assert_eq!(results[0].value(), Some(&json!({"Name": "Acme"})));
    assert!(matches!(
        &results[1],
        BatchItem::Failed(ItemFailure { index: 1, error: UnifyError::RequiredFieldMissing { .. } })
    ));
}

#[tokio::test]
async fn unknown_object_type_fails_the_whole_batch() {
    let engine = Engine::builder().registry(CanonicalRegistry::empty()).build();
    let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Contact);
    let err = engine.unify_all(vec![json!({})], &ctx).await.unwrap_err();
    assert!(matches!(err, UnifyError::UnknownObjectType(_)));
}
