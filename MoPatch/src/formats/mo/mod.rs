//! `.mo` compiled gettext catalog format
//!
//! Binary translation catalog read by the game client. The layout is a
//! 28-byte header, two parallel `(length, offset)` tables for message ids and
//! translations, an optional hash table, and the NUL-terminated string pools.

mod hash;
mod layout;
mod reader;
mod verify;
mod writer;

pub use hash::{HashTable, hash_table_size, hashpjw, lookup_key};
pub use layout::{CatalogLayout, StringDescriptor};
pub use reader::{parse_catalog_bytes, parse_layout, read_catalog};
pub use verify::{CatalogCheck, HashTableCheck, verify_catalog_bytes};
pub use writer::{SerializedCatalog, WriteOptions, serialize_catalog, write_catalog};

/// Magic number as read from a little-endian catalog
pub const MO_MAGIC: u32 = 0x950412DE;

/// Magic number as read (little-endian) from a big-endian catalog
pub const MO_MAGIC_SWAPPED: u32 = 0xDE120495;

/// Size of the fixed header (7 x u32)
pub const HEADER_SIZE: usize = 28;

/// Size of one `(length, offset)` descriptor
pub const DESCRIPTOR_SIZE: usize = 8;

/// Byte order a catalog was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// A single message id and its translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Message id, the lookup key. Empty for the header entry.
    pub original: String,
    /// Translated text
    pub translated: String,
}

impl CatalogEntry {
    pub fn new(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
        }
    }

    /// Whether this is the metadata header entry
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.original.is_empty()
    }
}

/// An ordered collection of catalog entries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    /// Byte order of the file this catalog was parsed from
    pub source_endianness: Endianness,
    /// Format revision of the source file
    pub revision: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(original, translated)` pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| CatalogEntry::new(k, v))
                .collect(),
            ..Self::default()
        }
    }

    /// First entry with the given message id
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.original == original)
    }

    /// The header entry, if present
    #[must_use]
    pub fn header(&self) -> Option<&CatalogEntry> {
        self.get("")
    }

    /// Header metadata as `(key, value)` pairs, in file order
    #[must_use]
    pub fn metadata(&self) -> Vec<(String, String)> {
        let Some(header) = self.header() else {
            return Vec::new();
        };
        header
            .translated
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect()
    }

    /// Charset declared in the header's `Content-Type`, if any
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        self.metadata()
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("Content-Type"))
            .and_then(|(_, v)| {
                v.split(';')
                    .filter_map(|part| part.trim().split_once('='))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
                    .map(|(_, cs)| cs.trim().to_string())
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Project-Id-Version: 13.9\n\
                          Content-Type: text/plain; charset=UTF-8\n\
                          Content-Transfer-Encoding: 8bit\n";

    #[test]
    fn test_header_metadata() {
        let catalog = Catalog::from_pairs([("", HEADER), ("IDS_A", "A")]);
        let meta = catalog.metadata();
        assert_eq!(meta.len(), 3);
        assert_eq!(
            meta[0],
            ("Project-Id-Version".to_string(), "13.9".to_string())
        );
        assert_eq!(catalog.charset().as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_no_header() {
        let catalog = Catalog::from_pairs([("IDS_A", "A")]);
        assert!(catalog.header().is_none());
        assert!(catalog.metadata().is_empty());
        assert!(catalog.charset().is_none());
    }

    #[test]
    fn test_get_returns_first_occurrence() {
        let catalog = Catalog::from_pairs([("IDS_A", "first"), ("IDS_A", "second")]);
        assert_eq!(catalog.get("IDS_A").unwrap().translated, "first");
        assert!(!catalog.entries[0].is_header());
    }
}
