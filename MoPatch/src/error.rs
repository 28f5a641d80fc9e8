//! Error types for `MoPatch`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `MoPatch` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the temporary sibling file failed. The target was not touched.
    #[error("failed to write temporary file {path}: {source}")]
    TempWriteFailed {
        /// The temporary file that was being written.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Swapping the temporary file into place failed.
    #[error("failed to replace {target} with {temp}: {source}")]
    SwapFailed {
        /// The catalog path being replaced.
        target: PathBuf,
        /// The temporary file holding the new content.
        temp: PathBuf,
        /// Whether the temporary file was left on disk (it is then the only complete copy).
        kept_temp: bool,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Catalog Format Errors ====================
    /// The buffer does not start with a known MO magic number.
    #[error("invalid catalog magic: 0x{0:08X}")]
    InvalidCatalogMagic(u32),

    /// A header, table, or string points outside the buffer.
    #[error(
        "catalog truncated: {section} at offset {offset} (length {length}) exceeds {size} bytes"
    )]
    CatalogTruncated {
        /// Which part of the catalog was being read.
        section: &'static str,
        /// Start offset of the region.
        offset: u64,
        /// Length of the region in bytes.
        length: u64,
        /// Total buffer size.
        size: usize,
    },

    /// A string is not followed by a NUL byte at `offset + length`.
    #[error("missing NUL terminator for {table} string {index}")]
    MissingNulTerminator {
        /// `originals` or `translations`.
        table: &'static str,
        /// Index within the table.
        index: usize,
    },

    /// A string is not valid UTF-8.
    #[error("invalid UTF-8 in {table} string {index}")]
    InvalidCatalogUtf8 {
        /// `originals` or `translations`.
        table: &'static str,
        /// Index within the table.
        index: usize,
    },

    /// A computed offset or length does not fit in 32 bits.
    #[error("catalog too large: {what} exceeds u32::MAX")]
    CatalogTooLarge {
        /// The quantity that overflowed.
        what: &'static str,
    },

    // ==================== Configuration Errors ====================
    /// TOML parse error in a patch plan.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A rule in the patch plan is not usable.
    #[error("invalid rule #{index}: {reason}")]
    InvalidRule {
        /// Zero-based position of the rule in the plan.
        index: usize,
        /// Why the rule was rejected.
        reason: String,
    },

    /// Neither the plan nor the caller named a catalog to patch.
    #[error("no catalog path given in config or arguments")]
    MissingCatalogPath,

    // ==================== Asset Install Errors ====================
    /// The source file of an asset copy does not exist.
    #[error("asset source not found: {path}")]
    AssetSourceMissing {
        /// The missing source path.
        path: PathBuf,
    },

    /// An asset entry in the patch plan is not usable.
    #[error("invalid asset #{index}: {reason}")]
    InvalidAsset {
        /// Zero-based position of the asset in the plan.
        index: usize,
        /// Why the asset was rejected.
        reason: String,
    },

    /// The destination already exists and the policy is `Abort`.
    #[error("asset destination already exists: {destination}")]
    AssetConflict {
        /// The existing destination path.
        destination: PathBuf,
    },
}

impl Error {
    /// Whether this error describes malformed or unrepresentable catalog bytes.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCatalogMagic(_)
                | Error::CatalogTruncated { .. }
                | Error::MissingNulTerminator { .. }
                | Error::InvalidCatalogUtf8 { .. }
                | Error::CatalogTooLarge { .. }
        )
    }
}

/// A specialized Result type for `MoPatch` operations.
pub type Result<T> = std::result::Result<T, Error>;
