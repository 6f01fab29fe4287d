use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `unify` binary.
#[derive(Debug, Parser)]
#[command(
    name = "unify",
    version,
    about = "Map CRM records between provider payloads and canonical objects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: pretty, compact
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};
    use uni_core::{ObjectType, ProviderId};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::SchemaCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unify_parses_target_flags() {
        let cli = Cli::try_parse_from([
            "unify",
            "unify",
            "records.json",
            "--provider",
            "hubspot",
            "--object",
            "companies",
            "--mapping-id",
            "tenant-1",
            "--associations",
            "deal,contact",
        ])
        .expect("cli should parse");

        let Commands::Unify(args) = cli.command else {
            panic!("expected unify command");
        };
        assert_eq!(args.input, Path::new("records.json"));
        assert_eq!(args.target.provider, ProviderId::Hubspot);
        assert_eq!(args.target.object, ObjectType::Company);
        assert_eq!(args.target.mapping_id.as_deref(), Some("tenant-1"));
        assert_eq!(args.target.associations.as_deref(), Some("deal,contact"));
        assert!(args.target.account.is_none());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "unify",
            "disunify",
            "-",
            "--provider",
            "zohocrm",
            "--object",
            "deal",
            "--format",
            "compact",
            "--quiet",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Compact);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Disunify(_)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let parsed = Cli::try_parse_from([
            "unify", "unify", "a.json", "--provider", "myspace", "--object", "contact",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["unify", "--format", "xml", "schema", "mapping"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn schema_mapping_defaults_to_document_schema() {
        let cli = Cli::try_parse_from(["unify", "schema", "mapping"]).expect("cli should parse");
        let Commands::Schema {
            action: SchemaCommands::Mapping { name, list },
        } = cli.command
        else {
            panic!("expected schema mapping");
        };
        assert_eq!(name, "mapping_document");
        assert!(!list);
    }

    #[test]
    fn fetch_takes_record_id() {
        let cli = Cli::try_parse_from([
            "unify",
            "fetch",
            "901",
            "--provider",
            "pipedrive",
            "--object",
            "person",
        ]);
        // `person` is not a canonical object type name.
        assert!(cli.is_err());

        let cli = Cli::try_parse_from([
            "unify",
            "fetch",
            "901",
            "--provider",
            "pipedrive",
            "--object",
            "contact",
        ])
        .expect("cli should parse");
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(args.id, "901");
        assert_eq!(args.target.provider, ProviderId::Pipedrive);
    }
}
