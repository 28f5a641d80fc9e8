use clap::Subcommand;
use std::path::PathBuf;

use crate::install::OverwritePolicy;

pub mod catalog;
pub mod execute;
pub mod install;
pub mod patch;

#[derive(Subcommand)]
pub enum Commands {
    /// List entries in a catalog
    List {
        /// Catalog (.mo) file to read
        path: PathBuf,

        /// Maximum entries to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the translation of one message id
    Get {
        /// Catalog (.mo) file to read
        path: PathBuf,

        /// Message id (e.g. IDS_PJSB999_YAMATO)
        id: String,
    },

    /// Check sort order, uniqueness and hash table of a catalog
    Verify {
        /// Catalog (.mo) file(s) to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Apply the rules of a patch plan to a catalog
    Patch {
        /// Patch plan (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Catalog to patch (overrides the plan's `catalog`)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Write the catalog without a lookup hash table
        #[arg(long)]
        no_hash_table: bool,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Copy the assets listed in a patch plan
    Install {
        /// Patch plan (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory asset sources are relative to
        #[arg(long)]
        source_root: PathBuf,

        /// Game directory asset destinations are relative to
        #[arg(long)]
        game_root: PathBuf,

        /// What to do with existing files: overwrite, skip, abort
        #[arg(long, default_value = "overwrite")]
        policy: OverwritePolicy,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}
