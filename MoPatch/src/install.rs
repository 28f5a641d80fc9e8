//! Data-driven asset installation
//!
//! A table of `(source, destination)` pairs, both relative to caller-supplied
//! roots, copied by one function under an explicit [`OverwritePolicy`].
//! Conflicts are values, never prompts.

use crate::error::{Error, Result};
use crate::transaction::replace_file_with;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// One file to copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetCopy {
    /// Path relative to the source root
    pub source: PathBuf,
    /// Path relative to the game root
    pub destination: PathBuf,
}

impl AssetCopy {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// What to do when a destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    #[default]
    Overwrite,
    Skip,
    /// Stop with [`Error::AssetConflict`]
    Abort,
}

impl FromStr for OverwritePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(OverwritePolicy::Overwrite),
            "skip" => Ok(OverwritePolicy::Skip),
            "abort" => Ok(OverwritePolicy::Abort),
            _ => Err(format!(
                "Invalid overwrite policy '{s}'. Valid values: overwrite, skip, abort"
            )),
        }
    }
}

/// Outcome of a single copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Overwritten,
    Skipped,
}

/// Summary of [`install_assets`]
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub copied: Vec<PathBuf>,
    pub overwritten: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl InstallReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.copied.len() + self.overwritten.len() + self.skipped.len()
    }
}

/// Progress callback: `(current, total, asset)`, 1-indexed
pub type InstallProgressCallback<'a> = &'a (dyn Fn(usize, usize, &AssetCopy) + Sync + Send);

/// Whether `path` is relative and stays below its root
#[must_use]
pub fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Copy one asset under `policy`
///
/// Parent directories of the destination are created as needed. The copy goes
/// through a temporary sibling file, so an interrupted copy never leaves a
/// truncated asset behind.
///
/// # Errors
/// Returns [`Error::AssetSourceMissing`], [`Error::AssetConflict`] (only under
/// [`OverwritePolicy::Abort`]), or an IO error.
pub fn copy_asset(
    source_root: &Path,
    game_root: &Path,
    asset: &AssetCopy,
    policy: OverwritePolicy,
) -> Result<CopyOutcome> {
    let source = source_root.join(&asset.source);
    let destination = game_root.join(&asset.destination);

    if !source.is_file() {
        return Err(Error::AssetSourceMissing { path: source });
    }

    let exists = destination.exists();
    if exists {
        match policy {
            OverwritePolicy::Skip => {
                tracing::debug!("Skipping existing {}", destination.display());
                return Ok(CopyOutcome::Skipped);
            }
            OverwritePolicy::Abort => return Err(Error::AssetConflict { destination }),
            OverwritePolicy::Overwrite => {}
        }
    }

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    replace_file_with(&destination, |file| {
        let mut input = File::open(&source)?;
        io::copy(&mut input, file).map(|_| ())
    })?;

    tracing::debug!("Copied {} -> {}", source.display(), destination.display());
    Ok(if exists {
        CopyOutcome::Overwritten
    } else {
        CopyOutcome::Copied
    })
}

/// Copy every asset in `assets`, in order
///
/// Under [`OverwritePolicy::Abort`] the first conflict stops the run; assets
/// copied before it stay in place.
///
/// # Errors
/// Returns the first error from [`copy_asset`], or [`Error::InvalidAsset`] for
/// a path that escapes its root.
pub fn install_assets(
    source_root: &Path,
    game_root: &Path,
    assets: &[AssetCopy],
    policy: OverwritePolicy,
    progress: InstallProgressCallback,
) -> Result<InstallReport> {
    for (index, asset) in assets.iter().enumerate() {
        if !is_contained(&asset.source) || !is_contained(&asset.destination) {
            return Err(Error::InvalidAsset {
                index,
                reason: "paths must be relative and must not contain '..'".to_string(),
            });
        }
    }

    tracing::info!(
        "Installing {} assets into {}",
        assets.len(),
        game_root.display()
    );
    let mut report = InstallReport::default();
    for (i, asset) in assets.iter().enumerate() {
        progress(i + 1, assets.len(), asset);
        let bucket = match copy_asset(source_root, game_root, asset, policy)? {
            CopyOutcome::Copied => &mut report.copied,
            CopyOutcome::Overwritten => &mut report.overwritten,
            CopyOutcome::Skipped => &mut report.skipped,
        };
        bucket.push(asset.destination.clone());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Roots {
        _dir: TempDir,
        source: PathBuf,
        game: PathBuf,
    }

    fn roots() -> Roots {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("mod");
        let game = dir.path().join("game");
        fs::create_dir_all(source.join("icons")).unwrap();
        fs::create_dir_all(&game).unwrap();
        fs::write(source.join("icons/yamato.png"), b"new icon").unwrap();
        Roots {
            _dir: dir,
            source,
            game,
        }
    }

    fn install(r: &Roots, assets: &[AssetCopy], policy: OverwritePolicy) -> Result<InstallReport> {
        install_assets(&r.source, &r.game, assets, policy, &|_, _, _| {})
    }

    fn icon() -> AssetCopy {
        AssetCopy::new("icons/yamato.png", "res_mods/gui/ship_icons/PJSB999.png")
    }

    #[test]
    fn test_copy_creates_parents() {
        let r = roots();
        let outcome = copy_asset(&r.source, &r.game, &icon(), OverwritePolicy::Abort).unwrap();
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(
            fs::read(r.game.join("res_mods/gui/ship_icons/PJSB999.png")).unwrap(),
            b"new icon"
        );
    }

    #[test]
    fn test_overwrite_policies() {
        let r = roots();
        let dest = r.game.join(&icon().destination);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"old icon").unwrap();

        let skipped = copy_asset(&r.source, &r.game, &icon(), OverwritePolicy::Skip).unwrap();
        assert_eq!(skipped, CopyOutcome::Skipped);
        assert_eq!(fs::read(&dest).unwrap(), b"old icon");

        let conflict = copy_asset(&r.source, &r.game, &icon(), OverwritePolicy::Abort);
        assert!(matches!(
            conflict,
            Err(Error::AssetConflict { destination }) if destination == dest
        ));
        assert_eq!(fs::read(&dest).unwrap(), b"old icon");

        let overwritten =
            copy_asset(&r.source, &r.game, &icon(), OverwritePolicy::Overwrite).unwrap();
        assert_eq!(overwritten, CopyOutcome::Overwritten);
        assert_eq!(fs::read(&dest).unwrap(), b"new icon");
    }

    #[test]
    fn test_missing_source() {
        let r = roots();
        let asset = AssetCopy::new("icons/missing.png", "x.png");
        let result = copy_asset(&r.source, &r.game, &asset, OverwritePolicy::Overwrite);
        assert!(matches!(result, Err(Error::AssetSourceMissing { .. })));
        assert!(!r.game.join("x.png").exists());
    }

    #[test]
    fn test_install_report() {
        let r = roots();
        fs::write(r.source.join("icons/musashi.png"), b"musashi").unwrap();
        let musashi = AssetCopy::new("icons/musashi.png", "res_mods/gui/ship_icons/PJSB018.png");
        let assets = vec![icon(), musashi];

        let report = install(&r, &assets, OverwritePolicy::Skip).unwrap();
        assert_eq!(report.copied.len(), 2);

        let again = install(&r, &assets, OverwritePolicy::Skip).unwrap();
        assert_eq!(again.skipped.len(), 2);
        assert_eq!(again.total(), 2);
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let r = roots();
        let assets = vec![AssetCopy::new("icons/yamato.png", "../outside.png")];
        let result = install(&r, &assets, OverwritePolicy::Overwrite);
        assert!(matches!(result, Err(Error::InvalidAsset { index: 0, .. })));
        assert!(!is_contained(Path::new("/abs/path.png")));
        assert!(is_contained(Path::new("./gui/icon.png")));
    }

    #[test]
    fn test_policy_from_str() {
        let policy: OverwritePolicy = "SKIP".parse().unwrap();
        assert_eq!(policy, OverwritePolicy::Skip);
        assert!("prompt".parse::<OverwritePolicy>().is_err());
    }
}
