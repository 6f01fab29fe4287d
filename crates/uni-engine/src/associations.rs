//! Association Resolver.
//!
//! Requested association types are checked against the object type's
//! whitelist, then each referenced record is fetched through the provider
//! adapter and unified. Resolution is best-effort: nothing here fails the
//! parent transform.

use std::sync::Arc;

use serde_json::Value;
use uni_core::{AssociatedObjects, Diagnostic, DiagnosticKind, ObjectType, Transformed, UnifiedObject};

use crate::context::ResolvedContext;
use crate::engine::Engine;

/// Values absent client input turns into; dropped without a diagnostic.
pub const IGNORED_SENTINELS: [&str; 2] = ["null", "undefined"];

/// Requested types split against a whitelist, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationPlan {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

/// Outcome of [`Engine::resolve_associations`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationResolution {
    /// One entry per valid requested type, in request order.
    pub valid_results: Vec<AssociatedObjects>,
    pub invalid_types: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Partition `requested` against `whitelist`. Duplicates collapse to their
/// first occurrence.
#[must_use]
pub fn partition_requested(requested: &[String], whitelist: &[&str]) -> AssociationPlan {
    let mut plan = AssociationPlan::default();
    for raw in requested {
        let name = raw.trim();
        if name.is_empty() || IGNORED_SENTINELS.contains(&name) {
            continue;
        }
        if plan.valid.iter().chain(&plan.invalid).any(|seen| seen == name) {
            continue;
        }
        if whitelist.contains(&name) {
            plan.valid.push(name.to_string());
        } else {
            plan.invalid.push(name.to_string());
        }
    }
    plan
}

/// IDs referenced for `association_type` in a record's association block.
///
/// Both the singular (`deal`) and plural (`deals`) key are looked up. Values
/// may be HubSpot-shaped (`{"results": [{"id": ..}]}`), an array of ids, an
/// array of objects with `id`, or a single id.
#[must_use]
pub fn referenced_ids(refs: &Value, association_type: &str) -> Vec<String> {
    let Value::Object(refs) = refs else {
        return Vec::new();
    };
    let plural = association_type.parse::<ObjectType>().ok().map(ObjectType::plural);
    let Some(entry) = refs
        .get(association_type)
        .or_else(|| plural.and_then(|p| refs.get(p)))
    else {
        return Vec::new();
    };

    let mut ids = Vec::new();
    collect_ids(entry, &mut ids);
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    ids
}

fn collect_ids(value: &Value, ids: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => ids.push(s.clone()),
        Value::Number(n) => ids.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|item| collect_ids(item, ids)),
        Value::Object(map) => {
            if let Some(results) = map.get("results") {
                collect_ids(results, ids);
            } else if let Some(id) = map.get("id").or_else(|| map.get("toObjectId")) {
                collect_ids(id, ids);
            }
        }
        _ => {}
    }
}

impl Engine {
    /// Resolve `requested` association types for a record of `ctx`'s type.
    ///
    /// Related records are unified with the same tenant mapping and account
    /// config as the parent; their own associations are not followed.
    ///
    /// Invalid types are reported, never fetched. A related record that
    /// cannot be fetched or unified is left out with an
    /// [`DiagnosticKind::AssociationFetchFailed`] diagnostic; its siblings
    /// are kept. A type that cannot be fetched at all yields an empty set.
    pub async fn resolve_associations(
        &self,
        refs: &Value,
        requested: &[String],
        ctx: &ResolvedContext,
    ) -> AssociationResolution {
        let plan = partition_requested(requested, self.registry().association_whitelist(ctx.object_type));
        let mut resolution = AssociationResolution::default();

        for invalid in &plan.invalid {
            tracing::debug!(object_type = %ctx.object_type, association = %invalid, "association type not valid here");
            resolution.diagnostics.push(Diagnostic::for_field(
                DiagnosticKind::InvalidAssociationType,
                invalid,
                format!("not a valid association for {}", ctx.object_type),
            ));
        }
        resolution.invalid_types = plan.invalid;

        for association_type in plan.valid {
            let objects = match self.fetch_associated(refs, &association_type, ctx).await {
                Ok(fetched) => {
                    let mut objects = Vec::with_capacity(fetched.len());
                    for result in fetched {
                        match result {
                            Ok(item) => {
                                for diagnostic in &item.diagnostics {
                                    resolution.diagnostics.push(Diagnostic {
                                        field: Some(match &diagnostic.field {
                                            Some(field) => format!("{association_type}.{field}"),
                                            None => association_type.clone(),
                                        }),
                                        ..diagnostic.clone()
                                    });
                                }
                                objects.push(item.value);
                            }
                            Err(message) => {
                                tracing::warn!(
                                    provider = %ctx.provider,
                                    association = %association_type,
                                    %message,
                                    "related record skipped"
                                );
                                resolution.diagnostics.push(Diagnostic::for_field(
                                    DiagnosticKind::AssociationFetchFailed,
                                    &association_type,
                                    message,
                                ));
                            }
                        }
                    }
                    objects
                }
                Err(message) => {
                    tracing::warn!(
                        provider = %ctx.provider,
                        object_type = %ctx.object_type,
                        association = %association_type,
                        %message,
                        "association fetch failed; returning empty set"
                    );
                    resolution.diagnostics.push(Diagnostic::for_field(
                        DiagnosticKind::AssociationFetchFailed,
                        &association_type,
                        message,
                    ));
                    Vec::new()
                }
            };
            resolution.valid_results.push(AssociatedObjects {
                association_type,
                objects,
            });
        }

        resolution
    }

    /// Fetch and unify every referenced record of one association type.
    ///
    /// The outer error means nothing could be fetched (no adapter, unknown
    /// related type). Inner results are per referenced id, in reference
    /// order.
    async fn fetch_associated(
        &self,
        refs: &Value,
        association_type: &str,
        parent: &ResolvedContext,
    ) -> Result<Vec<Result<Transformed<UnifiedObject>, String>>, String> {
        let ids = referenced_ids(refs, association_type);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let related_type: ObjectType = association_type.parse().map_err(|e| format!("{e}"))?;
        let adapter = self
            .adapters()
            .get(parent.provider)
            .ok_or_else(|| format!("no adapter registered for {}", parent.provider))?;
        let related = Arc::new(
            self.resolve_parts(
                parent.provider,
                related_type,
                parent.tenant_mapping_id.as_deref(),
                Arc::clone(&parent.account_config),
            )
            .await
            .map_err(|e| e.to_string())?,
        );
        let fields: Arc<[String]> = related.provider_keys().into();

        let count = ids.len();
        let mut set = tokio::task::JoinSet::new();
        for (idx, id) in ids.into_iter().enumerate() {
            let adapter = Arc::clone(&adapter);
            let related = Arc::clone(&related);
            let fields = Arc::clone(&fields);
            let engine = self.clone();
            set.spawn(async move {
                let result = match adapter.fetch_object(related.object_type, &id, &fields).await {
                    Ok(raw) => engine
                        .unify_leaf(raw, &related)
                        .await
                        .map_err(|error| format!("{id}: {error}")),
                    Err(error) => Err(format!("{id}: {error}")),
                };
                (idx, result)
            });
        }

        let mut slots: Vec<Option<Result<Transformed<UnifiedObject>, String>>> = (0..count).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            let (idx, result) = joined.map_err(|e| e.to_string())?;
            slots[idx] = Some(result);
        }
        Ok(slots.into_iter().flatten().collect())
    }
}
