//! Binary layout helpers shared by the reader, writer and verifier

use super::Endianness;
use crate::error::{Error, Result};

/// A `(length, offset)` pair locating one string in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDescriptor {
    /// Content length in bytes, excluding the NUL terminator
    pub length: u32,
    /// Absolute offset from the start of the buffer
    pub offset: u32,
}

impl StringDescriptor {
    /// Resolve this descriptor against `data`.
    ///
    /// The declared length is authoritative for content; the byte right after
    /// it must be a NUL terminator.
    pub fn resolve<'a>(
        &self,
        data: &'a [u8],
        table: &'static str,
        index: usize,
    ) -> Result<&'a str> {
        // +1 for the terminator, which must be addressable too
        ensure_within(
            table,
            u64::from(self.offset),
            u64::from(self.length) + 1,
            data.len(),
        )?;
        let start = self.offset as usize;
        let end = start + self.length as usize;
        if data[end] != 0 {
            return Err(Error::MissingNulTerminator { table, index });
        }
        std::str::from_utf8(&data[start..end])
            .map_err(|_| Error::InvalidCatalogUtf8 { table, index })
    }
}

/// Header fields and descriptor tables of a parsed catalog
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    pub endianness: Endianness,
    pub revision: u32,
    pub originals_offset: u32,
    pub translations_offset: u32,
    pub hash_size: u32,
    pub hash_offset: u32,
    pub originals: Vec<StringDescriptor>,
    pub translations: Vec<StringDescriptor>,
}

impl CatalogLayout {
    /// Number of strings in each table
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Major revision (high 16 bits)
    #[must_use]
    pub fn major_revision(&self) -> u32 {
        self.revision >> 16
    }
}

/// Check that `offset..offset + length` lies inside a buffer of `size` bytes
pub(crate) fn ensure_within(
    section: &'static str,
    offset: u64,
    length: u64,
    size: usize,
) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= size as u64 => Ok(()),
        _ => Err(Error::CatalogTruncated {
            section,
            offset,
            length,
            size,
        }),
    }
}

/// Narrow a byte count or offset to the on-disk u32 width
pub(crate) fn checked_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::CatalogTooLarge { what })
}
