pub mod schema;
pub mod transform;

use uni_engine::Engine;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, engine: &Engine, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Unify(args) => transform::handle_unify(&args, engine, flags).await,
        Commands::Disunify(args) => transform::handle_disunify(&args, engine, flags).await,
        Commands::Fetch(args) => transform::handle_fetch(&args, engine, flags).await,
        Commands::Schema { action } => schema::handle(&action, flags),
    }
}
