//! Command execution implementations

use super::Commands;
use super::{catalog, install, patch};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List { path, limit } => catalog::list(path, *limit),
            Commands::Get { path, id } => catalog::get(path, id),
            Commands::Verify { paths } => catalog::verify(paths),
            Commands::Patch {
                config,
                catalog,
                no_hash_table,
                dry_run,
                quiet,
            } => patch::execute(config, catalog.as_deref(), *no_hash_table, *dry_run, *quiet),
            Commands::Install {
                config,
                source_root,
                game_root,
                policy,
                quiet,
            } => install::execute(config, source_root, game_root, *policy, *quiet),
        }
    }
}
