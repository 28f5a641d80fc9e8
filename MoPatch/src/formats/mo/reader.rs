//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! `.mo` catalog reading and parsing

use super::layout::{CatalogLayout, StringDescriptor, ensure_within};
use super::{
    Catalog, CatalogEntry, DESCRIPTOR_SIZE, Endianness, HEADER_SIZE, MO_MAGIC, MO_MAGIC_SWAPPED,
};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use std::io::Cursor;
use std::path::Path;

/// Read a `.mo` catalog from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any catalog format
/// error raised by [`parse_catalog_bytes`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let data = std::fs::read(path)?;
    parse_catalog_bytes(&data)
}

/// Parse a `.mo` catalog from bytes, keeping table order
///
/// # Errors
///
/// Returns [`Error::InvalidCatalogMagic`] for an unknown magic number, and
/// [`Error::CatalogTruncated`], [`Error::MissingNulTerminator`] or
/// [`Error::InvalidCatalogUtf8`] for inconsistent tables or strings.
///
/// [`Error::InvalidCatalogMagic`]: crate::Error::InvalidCatalogMagic
/// [`Error::CatalogTruncated`]: crate::Error::CatalogTruncated
/// [`Error::MissingNulTerminator`]: crate::Error::MissingNulTerminator
/// [`Error::InvalidCatalogUtf8`]: crate::Error::InvalidCatalogUtf8
pub fn parse_catalog_bytes(data: &[u8]) -> Result<Catalog> {
    let layout = parse_layout(data)?;

    let mut entries = Vec::with_capacity(layout.len());
    let descriptors = layout.originals.iter().zip(&layout.translations);
    for (index, (orig, trans)) in descriptors.enumerate() {
        let original = orig.resolve(data, "originals", index)?;
        let translated = trans.resolve(data, "translations", index)?;
        entries.push(CatalogEntry::new(original, translated));
    }

    tracing::debug!(
        "Parsed catalog: {} entries, revision {}, {:?} endian",
        entries.len(),
        layout.revision,
        layout.endianness
    );

    Ok(Catalog {
        entries,
        source_endianness: layout.endianness,
        revision: layout.revision,
    })
}

/// Parse the header and both descriptor tables without decoding strings
///
/// # Errors
///
/// Returns [`Error::InvalidCatalogMagic`] or [`Error::CatalogTruncated`].
///
/// [`Error::InvalidCatalogMagic`]: crate::Error::InvalidCatalogMagic
/// [`Error::CatalogTruncated`]: crate::Error::CatalogTruncated
pub fn parse_layout(data: &[u8]) -> Result<CatalogLayout> {
    ensure_within("magic", 0, 4, data.len())?;
    match LittleEndian::read_u32(&data[..4]) {
        MO_MAGIC => parse_layout_as::<LittleEndian>(data, Endianness::Little),
        MO_MAGIC_SWAPPED => parse_layout_as::<BigEndian>(data, Endianness::Big),
        other => Err(Error::InvalidCatalogMagic(other)),
    }
}

fn parse_layout_as<B: ByteOrder>(data: &[u8], endianness: Endianness) -> Result<CatalogLayout> {
    ensure_within("header", 0, HEADER_SIZE as u64, data.len())?;

    // Magic was already checked; bounds too, so reads below cannot hit EOF
    let mut cursor = Cursor::new(&data[4..HEADER_SIZE]);
    let revision = cursor.read_u32::<B>()?;
    let count = cursor.read_u32::<B>()?;
    let originals_offset = cursor.read_u32::<B>()?;
    let translations_offset = cursor.read_u32::<B>()?;
    let hash_size = cursor.read_u32::<B>()?;
    let hash_offset = cursor.read_u32::<B>()?;

    if revision >> 16 > 0 {
        tracing::debug!(
            "Catalog revision {revision:#x} is newer than 0, reading base layout only"
        );
    }

    let originals = read_descriptors::<B>(data, "originals table", originals_offset, count)?;
    let translations =
        read_descriptors::<B>(data, "translations table", translations_offset, count)?;

    Ok(CatalogLayout {
        endianness,
        revision,
        originals_offset,
        translations_offset,
        hash_size,
        hash_offset,
        originals,
        translations,
    })
}

fn read_descriptors<B: ByteOrder>(
    data: &[u8],
    section: &'static str,
    offset: u32,
    count: u32,
) -> Result<Vec<StringDescriptor>> {
    let table_len = u64::from(count) * DESCRIPTOR_SIZE as u64;
    ensure_within(section, u64::from(offset), table_len, data.len())?;

    let start = offset as usize;
    let mut cursor = Cursor::new(&data[start..start + table_len as usize]);
    let mut descriptors = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let length = cursor.read_u32::<B>()?;
        let offset = cursor.read_u32::<B>()?;
        descriptors.push(StringDescriptor { length, offset });
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    /// Hand-assemble a catalog in either byte order.
    fn build<B: ByteOrder>(magic: u32, pairs: &[(&str, &str)]) -> Vec<u8> {
        let n = pairs.len() as u32;
        let orig_table = HEADER_SIZE as u32;
        let trans_table = orig_table + 8 * n;
        let mut pool_offset = trans_table + 8 * n;

        let mut tables = Vec::new();
        let mut pool = Vec::new();
        let strings = pairs.iter().map(|p| p.0).chain(pairs.iter().map(|p| p.1));
        for s in strings {
            tables.write_u32::<B>(s.len() as u32).unwrap();
            tables.write_u32::<B>(pool_offset).unwrap();
            pool.extend_from_slice(s.as_bytes());
            pool.push(0);
            pool_offset += s.len() as u32 + 1;
        }

        let mut out = Vec::new();
        out.write_u32::<B>(magic).unwrap();
        for field in [0, n, orig_table, trans_table, 0, 0] {
            out.write_u32::<B>(field).unwrap();
        }
        out.extend_from_slice(&tables);
        out.extend_from_slice(&pool);
        out
    }

    #[test]
    fn test_parse_little_endian() {
        let pairs = [("", "meta"), ("IDS_B", "Bee"), ("IDS_A", "Ay")];
        let data = build::<LittleEndian>(MO_MAGIC, &pairs);
        let catalog = parse_catalog_bytes(&data).unwrap();
        assert_eq!(catalog.source_endianness, Endianness::Little);
        assert_eq!(catalog.len(), 3);
        // Table order is kept as-is
        assert_eq!(catalog.entries[1], CatalogEntry::new("IDS_B", "Bee"));
        assert_eq!(catalog.entries[2], CatalogEntry::new("IDS_A", "Ay"));
    }

    #[test]
    fn test_parse_big_endian() {
        let data = build::<BigEndian>(MO_MAGIC, &[("", "meta"), ("IDS_A", "Ay")]);
        assert_eq!(&data[..4], &[0x95, 0x04, 0x12, 0xDE]);
        let catalog = parse_catalog_bytes(&data).unwrap();
        assert_eq!(catalog.source_endianness, Endianness::Big);
        assert_eq!(catalog.get("IDS_A").unwrap().translated, "Ay");
    }

    #[test]
    fn test_parse_empty_catalog() {
        let data = build::<LittleEndian>(MO_MAGIC, &[]);
        assert_eq!(data.len(), HEADER_SIZE);
        assert!(parse_catalog_bytes(&data).unwrap().is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let mut data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        data[0] ^= 0xFF;
        assert!(matches!(
            parse_catalog_bytes(&data),
            Err(Error::InvalidCatalogMagic(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        assert!(matches!(
            parse_catalog_bytes(&data[..2]),
            Err(Error::CatalogTruncated { .. })
        ));
        assert!(matches!(
            parse_catalog_bytes(&data[..20]),
            Err(Error::CatalogTruncated { .. })
        ));
    }

    #[test]
    fn test_table_out_of_bounds() {
        let mut data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        // Claim far more strings than the buffer holds
        data[8..12].copy_from_slice(&1000u32.to_le_bytes());
        let err = parse_catalog_bytes(&data).unwrap_err();
        assert!(err.is_format_error());
        assert!(matches!(err, Error::CatalogTruncated { .. }));
    }

    #[test]
    fn test_string_out_of_bounds() {
        let mut data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        // First original descriptor: bump its length past the end
        let at = HEADER_SIZE;
        data[at..at + 4].copy_from_slice(&500u32.to_le_bytes());
        assert!(matches!(
            parse_catalog_bytes(&data),
            Err(Error::CatalogTruncated { .. })
        ));
    }

    #[test]
    fn test_missing_nul() {
        let mut data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        // Shorten the declared id length so the byte after it is not NUL
        let at = HEADER_SIZE;
        data[at..at + 4].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            parse_catalog_bytes(&data),
            Err(Error::MissingNulTerminator {
                table: "originals",
                index: 0
            })
        ));
    }

    #[test]
    fn test_higher_revision_uses_base_layout() {
        let mut data = build::<LittleEndian>(MO_MAGIC, &[("IDS_A", "Ay")]);
        data[4..8].copy_from_slice(&0x0001_0001u32.to_le_bytes());
        let layout = parse_layout(&data).unwrap();
        assert_eq!(layout.major_revision(), 1);
        let catalog = parse_catalog_bytes(&data).unwrap();
        assert_eq!(catalog.revision, 0x0001_0001);
        assert_eq!(catalog.get("IDS_A").unwrap().translated, "Ay");
    }
}
