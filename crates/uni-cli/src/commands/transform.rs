use anyhow::Context;
use serde_json::Value;
use uni_core::{ObjectType, UnifiedObject};
use uni_engine::{BatchItem, Engine, TransformContext, parse_association_param};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{FetchArgs, TargetArgs, TransformArgs};
use crate::input::{self, Records};
use crate::output::output;

/// Handle `unify unify`.
pub async fn handle_unify(args: &TransformArgs, engine: &Engine, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = context_for(&args.target)?;
    let records = Records::from_value(input::read_json(&args.input)?);
    let rendered = unify_records(engine, records, &ctx).await?;
    output(&rendered, flags.format)
}

/// Handle `unify disunify`.
pub async fn handle_disunify(args: &TransformArgs, engine: &Engine, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = context_for(&args.target)?;
    let records = Records::from_value(input::read_json(&args.input)?);
    let rendered = disunify_records(engine, records, &ctx).await?;
    output(&rendered, flags.format)
}

/// Handle `unify fetch`.
pub async fn handle_fetch(args: &FetchArgs, engine: &Engine, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = context_for(&args.target)?;
    let provider = ctx.provider;
    if engine.adapters().get(provider).is_none() {
        anyhow::bail!(
            "no adapter configured for {provider}; set UNIFY_PROVIDERS__{}_TOKEN",
            provider.as_str().to_uppercase()
        );
    }
    let unified = engine.fetch(&args.id, &ctx).await?;
    output(&unified, flags.format)
}

fn context_for(target: &TargetArgs) -> anyhow::Result<TransformContext> {
    let mut ctx = TransformContext::new(target.provider, target.object);
    if let Some(mapping_id) = &target.mapping_id {
        ctx = ctx.with_tenant_mapping(mapping_id.clone());
    }
    if let Some(path) = &target.account {
        ctx = ctx.with_account_config(input::read_account_config(path)?);
    }
    if let Some(raw) = &target.associations {
        ctx = ctx.with_associations(parse_association_param(raw));
    }
    Ok(ctx)
}

async fn unify_records(engine: &Engine, records: Records, ctx: &TransformContext) -> anyhow::Result<Value> {
    match records {
        Records::One(raw) => {
            let unified = engine.unify(raw, ctx).await?;
            Ok(serde_json::to_value(unified)?)
        }
        Records::Many(raws) => {
            let items = engine.unify_all(raws, ctx).await?;
            log_failures(&items);
            Ok(serde_json::to_value(items)?)
        }
    }
}

async fn disunify_records(engine: &Engine, records: Records, ctx: &TransformContext) -> anyhow::Result<Value> {
    match records {
        Records::One(raw) => {
            let unified = parse_unified(raw, ctx.object_type).context("input is not a unified object")?;
            let payload = engine.disunify(&unified, ctx).await?;
            Ok(serde_json::to_value(payload)?)
        }
        Records::Many(raws) => {
            let objects = raws
                .into_iter()
                .enumerate()
                .map(|(index, raw)| {
                    parse_unified(raw, ctx.object_type)
                        .with_context(|| format!("item {index} is not a unified object"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let items = engine.disunify_all(&objects, ctx).await?;
            log_failures(&items);
            Ok(serde_json::to_value(items)?)
        }
    }
}

/// Deserialize a unified object, taking its type from the command line when
/// the document does not name one.
fn parse_unified(mut raw: Value, object_type: ObjectType) -> anyhow::Result<UnifiedObject> {
    if let Some(map) = raw.as_object_mut() {
        map.entry("objectType")
            .or_insert_with(|| Value::String(object_type.as_str().to_string()));
    }
    Ok(serde_json::from_value(raw)?)
}

fn log_failures<T>(items: &[BatchItem<T>]) {
    let failed = items.iter().filter(|item| !item.is_ok()).count();
    if failed > 0 {
        tracing::warn!(failed, total = items.len(), "some records could not be transformed");
    }
}
