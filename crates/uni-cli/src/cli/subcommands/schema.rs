use clap::Subcommand;
use uni_core::{ObjectType, ProviderId};

use crate::cli::root_commands::{parse_object_type, parse_provider};

/// Canonical schema and mapping document inspection.
#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// Standard fields of an object type, with provider keys when a provider is given.
    Fields {
        #[arg(long, value_parser = parse_object_type)]
        object: ObjectType,
        #[arg(long, value_parser = parse_provider)]
        provider: Option<ProviderId>,
    },
    /// JSON Schema of a mapping document type.
    Mapping {
        /// Schema name (see `--list`).
        #[arg(default_value = "mapping_document")]
        name: String,
        /// List the available schema names instead.
        #[arg(long)]
        list: bool,
    },
}
