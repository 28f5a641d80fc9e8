//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! `.mo` catalog writing

use super::hash::HashTable;
use super::layout::checked_u32;
use super::{Catalog, CatalogEntry, DESCRIPTOR_SIZE, HEADER_SIZE, MO_MAGIC};
use crate::error::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::path::Path;

/// Options controlling catalog serialization
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Emit a gettext lookup hash table. When `false`, hash size and offset are written as 0.
    pub hash_table: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { hash_table: true }
    }
}

/// Output of [`serialize_catalog`]
#[derive(Debug, Clone)]
pub struct SerializedCatalog {
    /// The encoded catalog
    pub bytes: Vec<u8>,
    /// Number of entries written
    pub entries: usize,
    /// Message ids whose later duplicates were dropped
    pub dropped_duplicates: Vec<String>,
}

/// Serialize a catalog into little-endian `.mo` bytes
///
/// Entries are stably sorted by the byte value of their message id. If two
/// entries share an id, the first in sorted order is kept.
///
/// # Errors
///
/// Returns [`Error::CatalogTooLarge`] if any offset or length overflows u32.
///
/// [`Error::CatalogTooLarge`]: crate::Error::CatalogTooLarge
pub fn serialize_catalog(catalog: &Catalog, options: &WriteOptions) -> Result<SerializedCatalog> {
    let mut sorted: Vec<&CatalogEntry> = catalog.entries.iter().collect();
    // `str` ordering is byte-wise, which is what runtime binary search expects
    sorted.sort_by(|a, b| a.original.cmp(&b.original));

    let mut dropped_duplicates = Vec::new();
    sorted.dedup_by(|later, first| {
        let duplicate = later.original == first.original;
        if duplicate {
            dropped_duplicates.push(later.original.clone());
        }
        duplicate
    });
    for id in &dropped_duplicates {
        tracing::warn!("Dropping duplicate catalog entry {id:?}, keeping the first");
    }

    let count = checked_u32(sorted.len(), "string count")?;
    let table_bytes = sorted.len() * DESCRIPTOR_SIZE;
    let originals_offset = HEADER_SIZE;
    let translations_offset = originals_offset + table_bytes;
    let hash_offset = translations_offset + table_bytes;

    let originals = sorted.iter().map(|e| e.original.as_str());
    let hash_table = if options.hash_table {
        Some(HashTable::build(originals, sorted.len()))
    } else {
        None
    };
    let hash_len = hash_table.as_ref().map_or(0, HashTable::len);
    let pool_start = hash_offset + hash_len * 4;

    // Originals pool first, then translations pool, both in sorted order
    let mut descriptors = Vec::with_capacity(sorted.len() * 2);
    let mut cursor = pool_start;
    for text in sorted
        .iter()
        .map(|e| e.original.as_str())
        .chain(sorted.iter().map(|e| e.translated.as_str()))
    {
        let length = checked_u32(text.len(), "string length")?;
        let offset = checked_u32(cursor, "string offset")?;
        descriptors.push((length, offset));
        cursor += text.len() + 1;
    }
    // The final terminator must also be addressable by a u32 offset
    checked_u32(cursor, "catalog size")?;

    let mut out = Vec::with_capacity(cursor);
    out.write_u32::<LittleEndian>(MO_MAGIC)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(count)?;
    out.write_u32::<LittleEndian>(checked_u32(originals_offset, "originals offset")?)?;
    out.write_u32::<LittleEndian>(checked_u32(translations_offset, "translations offset")?)?;
    match &hash_table {
        Some(table) => {
            out.write_u32::<LittleEndian>(checked_u32(table.len(), "hash table size")?)?;
            out.write_u32::<LittleEndian>(checked_u32(hash_offset, "hash table offset")?)?;
        }
        None => {
            out.write_u32::<LittleEndian>(0)?;
            out.write_u32::<LittleEndian>(0)?;
        }
    }

    for (length, offset) in &descriptors {
        out.write_u32::<LittleEndian>(*length)?;
        out.write_u32::<LittleEndian>(*offset)?;
    }

    if let Some(table) = &hash_table {
        for &slot in table.slots() {
            out.write_u32::<LittleEndian>(slot)?;
        }
    }

    for text in sorted
        .iter()
        .map(|e| e.original.as_str())
        .chain(sorted.iter().map(|e| e.translated.as_str()))
    {
        out.extend_from_slice(text.as_bytes());
        out.push(0);
    }

    debug_assert_eq!(out.len(), cursor);
    tracing::debug!(
        "Serialized catalog: {} entries, {} bytes, hash table {}",
        sorted.len(),
        out.len(),
        hash_len
    );

    Ok(SerializedCatalog {
        bytes: out,
        entries: sorted.len(),
        dropped_duplicates,
    })
}

/// Serialize a catalog and atomically replace the file at `path`
///
/// # Errors
/// Returns an error if serialization or the file replacement fails.
pub fn write_catalog<P: AsRef<Path>>(
    path: P,
    catalog: &Catalog,
    options: &WriteOptions,
) -> Result<SerializedCatalog> {
    let serialized = serialize_catalog(catalog, options)?;
    crate::transaction::replace_file(path, &serialized.bytes)?;
    Ok(serialized)
}
