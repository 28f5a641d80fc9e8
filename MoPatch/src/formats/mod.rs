//! File format handlers
//!
//! Only the compiled gettext catalog (`.mo`) is handled here; image assets are
//! copied byte-for-byte by [`crate::install`] and never parsed.

pub mod mo;

pub use mo::{
    Catalog, CatalogEntry, SerializedCatalog, WriteOptions, parse_catalog_bytes, read_catalog,
    serialize_catalog, verify_catalog_bytes,
};
