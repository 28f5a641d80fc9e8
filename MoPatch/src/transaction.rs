//! Transactional file replacement
//!
//! New content is written to a sibling temporary file, flushed and synced,
//! and only then swapped into place. A failure while writing leaves the
//! target untouched and removes the temporary file.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the target's file name for the temporary sibling
pub const TEMP_SUFFIX: &str = ".mopatch-tmp";

/// Temporary sibling path used while replacing `target`
#[must_use]
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

/// Atomically replace the file at `target` with `bytes`
///
/// # Errors
///
/// Returns [`Error::TempWriteFailed`] if the temporary file cannot be written
/// (the target is untouched), or [`Error::SwapFailed`] if it cannot be moved
/// into place.
///
/// [`Error::TempWriteFailed`]: crate::Error::TempWriteFailed
/// [`Error::SwapFailed`]: crate::Error::SwapFailed
pub fn replace_file<P: AsRef<Path>>(target: P, bytes: &[u8]) -> Result<()> {
    replace_file_with(target, |file| file.write_all(bytes))
}

/// Atomically replace the file at `target` with whatever `write` produces
///
/// `write` receives the open temporary file. It is flushed and synced after
/// `write` returns successfully.
///
/// # Errors
///
/// Same as [`replace_file`]; an error returned by `write` is reported as
/// [`Error::TempWriteFailed`].
///
/// [`Error::TempWriteFailed`]: crate::Error::TempWriteFailed
pub fn replace_file_with<P, F>(target: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let target = target.as_ref();
    let temp = temp_path_for(target);

    if let Err(source) = write_temp(&temp, write) {
        // The partial file may or may not exist, nothing else to do about it
        let _ = fs::remove_file(&temp);
        return Err(Error::TempWriteFailed { path: temp, source });
    }
    tracing::debug!("Wrote temporary file {}", temp.display());

    swap_into_place(target, &temp)
}

fn write_temp<F>(temp: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    // A stale temp from an interrupted run is simply overwritten
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(temp)?;
    write(&mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn swap_into_place(target: &Path, temp: &Path) -> Result<()> {
    let rename_err = match fs::rename(temp, target) {
        Ok(()) => {
            tracing::debug!("Replaced {}", target.display());
            return Ok(());
        }
        Err(e) => e,
    };

    if !target.exists() {
        let _ = fs::remove_file(temp);
        return Err(Error::SwapFailed {
            target: target.to_path_buf(),
            temp: temp.to_path_buf(),
            kept_temp: false,
            source: rename_err,
        });
    }

    // Some platforms refuse to rename over a file held by another process;
    // fall back to delete-then-rename.
    tracing::warn!(
        "Rename over {} failed ({rename_err}), retrying as delete then rename",
        target.display()
    );
    if let Err(source) = fs::remove_file(target) {
        let _ = fs::remove_file(temp);
        return Err(Error::SwapFailed {
            target: target.to_path_buf(),
            temp: temp.to_path_buf(),
            kept_temp: false,
            source,
        });
    }

    // The target is gone now, so the temp file is the only complete copy and must stay
    fs::rename(temp, target).map_err(|source| Error::SwapFailed {
        target: target.to_path_buf(),
        temp: temp.to_path_buf(),
        kept_temp: true,
        source,
    })
}
