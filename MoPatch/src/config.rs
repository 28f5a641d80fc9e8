//! Patch plan configuration
//!
//! A patch plan is a TOML file listing override rules and asset copies:
//!
//! ```toml
//! catalog = "texts/en/LC_MESSAGES/global.mo"
//! hash_table = true
//!
//! [[rule]]
//! id = "IDS_PJSB999_YAMATO"
//! transform = { prepend = "(ARP Yamato)\n" }
//!
//! [[asset]]
//! source = "icons/yamato.png"
//! destination = "res_mods/gui/ship_icons/PJSB999.png"
//! ```

use crate::error::{Error, Result};
use crate::install::{AssetCopy, is_contained};
use crate::patch::{OverrideRule, PatchOptions, TextTransform};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

/// One rule as written in a patch plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Target message id
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub transform: TextTransform,
}

impl RuleConfig {
    #[must_use]
    pub fn to_rule(&self) -> OverrideRule {
        OverrideRule::from_transform(self.id.clone(), self.transform.clone())
            .with_enabled(self.enabled)
    }
}

/// A parsed patch plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchPlan {
    /// Default catalog to patch
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Emit the lookup hash table when rewriting
    #[serde(default = "default_true")]
    pub hash_table: bool,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetCopy>,
}

impl Default for PatchPlan {
    fn default() -> Self {
        Self {
            catalog: None,
            hash_table: true,
            rules: Vec::new(),
            assets: Vec::new(),
        }
    }
}

impl PatchPlan {
    /// Parse and validate a plan from TOML text
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`], [`Error::InvalidRule`] or [`Error::InvalidAsset`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let plan: Self = toml::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load and validate a plan from a TOML file
    ///
    /// # Errors
    /// Returns an IO error if the file cannot be read, or any error from
    /// [`PatchPlan::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading patch plan {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check rules and assets for values the engine cannot use
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.id.is_empty() {
                return Err(Error::InvalidRule {
                    index,
                    reason: "id must not be empty, the header cannot be overridden".to_string(),
                });
            }
        }
        for (index, asset) in self.assets.iter().enumerate() {
            if !is_contained(&asset.source) || !is_contained(&asset.destination) {
                return Err(Error::InvalidAsset {
                    index,
                    reason: "paths must be relative and must not contain '..'".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build engine rules, preserving plan order
    #[must_use]
    pub fn override_rules(&self) -> Vec<OverrideRule> {
        self.rules.iter().map(RuleConfig::to_rule).collect()
    }

    /// Catalog to patch: `explicit` if given, else the plan's own
    ///
    /// # Errors
    /// Returns [`Error::MissingCatalogPath`] if neither is set.
    pub fn catalog_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.catalog.clone())
            .ok_or(Error::MissingCatalogPath)
    }

    #[must_use]
    pub fn patch_options(&self) -> PatchOptions {
        PatchOptions {
            hash_table: self.hash_table,
            ..PatchOptions::default()
        }
    }
}
