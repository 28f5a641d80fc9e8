//! # MoPatch
//!
//! A pure-Rust patch engine for compiled gettext localization catalogs
//! (`.mo`), as used by game clients for item names and descriptions.
//!
//! ## Pipeline
//!
//! - **Read** - parse little- or big-endian catalogs with full bounds checks
//! - **Override** - apply keyed, individually enabled text transforms
//! - **Write** - re-encode with a sorted id table and a lookup hash table
//! - **Replace** - swap the new file in through a temporary sibling, so a
//!   failed write never leaves a broken catalog behind
//!
//! ## Quick Start
//!
//! ```no_run
//! use mopatch::patch::{patch_catalog, OverrideRule};
//!
//! let rules = vec![
//!     OverrideRule::prepend("IDS_PJSB999_YAMATO", "(ARP Yamato)\n"),
//!     OverrideRule::replace("IDS_PJSB999_YAMATO_DESCR", "Fog fleet flagship.").with_enabled(false),
//! ];
//! let report = patch_catalog("texts/en/LC_MESSAGES/global.mo", &rules)?;
//! println!("Patched {} entries", report.patched.len());
//! # Ok::<(), mopatch::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use mopatch::prelude::*;
//!
//! let catalog = Catalog::from_pairs([("", "Content-Type: text/plain; charset=UTF-8\n")]);
//! assert_eq!(catalog.charset().as_deref(), Some("UTF-8"));
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `mopatch` command-line binary

pub mod config;
pub mod error;
pub mod formats;
pub mod install;
pub mod patch;
pub mod transaction;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{PatchPlan, RuleConfig};
    pub use crate::error::{Error, Result};
    pub use crate::formats::mo::{
        Catalog, CatalogCheck, CatalogEntry, SerializedCatalog, WriteOptions, parse_catalog_bytes,
        read_catalog, serialize_catalog, verify_catalog_bytes, write_catalog,
    };
    pub use crate::install::{AssetCopy, InstallReport, OverwritePolicy, install_assets};
    pub use crate::patch::{
        Notice, OverrideRule, PatchOptions, PatchReport, TextTransform, patch_catalog,
        patch_catalog_with_options,
    };
    pub use crate::transaction::replace_file;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
