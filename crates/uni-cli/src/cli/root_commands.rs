use std::path::PathBuf;

use clap::{Args, Subcommand};
use uni_core::{ObjectType, ProviderId};

use crate::cli::subcommands::SchemaCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Convert provider records from a JSON file into canonical objects.
    Unify(TransformArgs),
    /// Convert canonical objects from a JSON file into provider write payloads.
    Disunify(TransformArgs),
    /// Fetch one record from the provider API and unify it.
    Fetch(FetchArgs),
    /// Inspect canonical schemas and mapping document schemas.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
}

/// Which provider object a transform targets, and under which tenant mapping.
#[derive(Clone, Debug, Args)]
pub struct TargetArgs {
    #[arg(long, value_parser = parse_provider)]
    pub provider: ProviderId,
    #[arg(long, value_parser = parse_object_type)]
    pub object: ObjectType,
    /// Tenant mapping id (a document in the mappings directory).
    #[arg(long)]
    pub mapping_id: Option<String>,
    /// JSON file with the account's custom field catalog.
    #[arg(long)]
    pub account: Option<PathBuf>,
    /// Comma-separated association types to resolve, e.g. `deal,company`.
    #[arg(long)]
    pub associations: Option<String>,
}

/// Arguments for `unify unify` and `unify disunify`.
#[derive(Clone, Debug, Args)]
pub struct TransformArgs {
    /// JSON file holding one object or an array of objects; `-` reads stdin.
    pub input: PathBuf,
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for `unify fetch`.
#[derive(Clone, Debug, Args)]
pub struct FetchArgs {
    /// Provider record id.
    pub id: String,
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn parse_provider(raw: &str) -> Result<ProviderId, String> {
    raw.parse().map_err(|error| format!("{error}"))
}

pub fn parse_object_type(raw: &str) -> Result<ObjectType, String> {
    raw.parse().map_err(|error| format!("{error}"))
}
