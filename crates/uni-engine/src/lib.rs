//! # uni-engine
//!
//! Bidirectional transforms between provider-native records and the canonical
//! [`UnifiedObject`](uni_core::UnifiedObject).
//!
//! The pure pieces (`unify_object`, `disunify_object`,
//! `resolve_custom_fields`, association partitioning) work on a
//! [`ResolvedContext`] and never touch the network. [`Engine`] wraps them
//! with mapping-store lookups, provider field catalogs, association fetches
//! through a [`ProviderAdapter`], and order-preserving batch fan-out.
//!
//! ```no_run
//! # async fn demo() -> Result<(), uni_core::UnifyError> {
//! use uni_core::{ObjectType, ProviderId};
//! use uni_engine::{Engine, TransformContext};
//!
//! let engine = Engine::builder().build();
//! let ctx = TransformContext::new(ProviderId::Hubspot, ObjectType::Company);
//! let raw = serde_json::json!({"id": "1", "properties": {"name": "Acme"}});
//! let company = engine.unify(raw, &ctx).await?;
//! assert!(company.diagnostics.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod associations;
pub mod batch;
mod catalog_cache;
pub mod coerce;
pub mod context;
pub mod custom_fields;
pub mod disunify;
mod engine;
pub mod flatten;
pub mod path;
pub mod unify;

pub use adapter::{AdapterError, AdapterSet, ProviderAdapter};
pub use associations::{AssociationPlan, AssociationResolution, partition_requested, referenced_ids};
pub use batch::{BatchItem, ItemFailure};
pub use catalog_cache::CatalogCache;
pub use context::{ResolvedContext, TransformContext, parse_association_param};
pub use custom_fields::{CatalogField, ProviderFieldCatalog, resolve_custom_fields};
pub use disunify::disunify_object;
pub use engine::{ASSOCIATIONS_KEY, Engine, EngineBuilder};
pub use unify::unify_object;
