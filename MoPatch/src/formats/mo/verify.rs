//! Structural checks on catalog bytes
//!
//! Parsing proves the tables are addressable; this goes further and checks
//! what runtime consumers rely on: sorted unique ids and a usable hash table.

use super::Endianness;
use super::hash::HashTable;
use super::layout::{CatalogLayout, ensure_within};
use super::reader::parse_layout;
use crate::error::Result;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// State of the optional lookup hash table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashTableCheck {
    /// Size and offset are zero
    Absent,
    /// Every id is found through the table
    Valid { size: u32 },
    /// The table lies outside the buffer
    OutOfBounds,
    /// Some ids cannot be found through the table
    Inconsistent { unreachable: Vec<String> },
}

/// Result of [`verify_catalog_bytes`]
#[derive(Debug, Clone)]
pub struct CatalogCheck {
    pub entries: usize,
    pub endianness: Endianness,
    pub revision: u32,
    /// Message ids that are not strictly greater than their predecessor
    pub out_of_order: Vec<String>,
    /// Message ids appearing more than once
    pub duplicates: Vec<String>,
    pub hash_table: HashTableCheck,
}

impl CatalogCheck {
    /// Whether consumers can binary-search and hash-look-up this catalog
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.out_of_order.is_empty()
            && self.duplicates.is_empty()
            && matches!(
                self.hash_table,
                HashTableCheck::Absent | HashTableCheck::Valid { .. }
            )
    }
}

/// Verify sort order, uniqueness and hash table consistency of catalog bytes
///
/// # Errors
///
/// Returns any format error the reader raises; a catalog that parses but
/// violates consumer invariants is reported through [`CatalogCheck`].
pub fn verify_catalog_bytes(data: &[u8]) -> Result<CatalogCheck> {
    let layout = parse_layout(data)?;

    let mut originals = Vec::with_capacity(layout.len());
    for (index, desc) in layout.originals.iter().enumerate() {
        originals.push(desc.resolve(data, "originals", index)?);
    }
    for (index, desc) in layout.translations.iter().enumerate() {
        desc.resolve(data, "translations", index)?;
    }

    let mut out_of_order = Vec::new();
    let mut duplicates = Vec::new();
    for pair in originals.windows(2) {
        if pair[1] == pair[0] {
            duplicates.push(pair[1].to_string());
        } else if pair[1] < pair[0] {
            out_of_order.push(pair[1].to_string());
        }
    }

    Ok(CatalogCheck {
        entries: layout.len(),
        endianness: layout.endianness,
        revision: layout.revision,
        out_of_order,
        duplicates,
        hash_table: check_hash_table(data, &layout, &originals),
    })
}

/// Look every id up the way a runtime does and collect the ones it would miss
fn check_hash_table(data: &[u8], layout: &CatalogLayout, originals: &[&str]) -> HashTableCheck {
    if layout.hash_size == 0 {
        return HashTableCheck::Absent;
    }

    let (offset, size) = (layout.hash_offset, layout.hash_size);
    let slots = match layout.endianness {
        Endianness::Little => read_slots::<LittleEndian>(data, offset, size),
        Endianness::Big => read_slots::<BigEndian>(data, offset, size),
    };
    let Some(slots) = slots else {
        return HashTableCheck::OutOfBounds;
    };

    let table = HashTable::from_slots(slots);
    // An id shadowed by another with the same singular part is a miss too
    let unreachable: Vec<String> = originals
        .iter()
        .enumerate()
        .filter(|(index, id)| {
            table.lookup(id, |i| originals.get(i).copied()) != Some(*index)
        })
        .map(|(_, id)| (*id).to_string())
        .collect();

    if unreachable.is_empty() {
        HashTableCheck::Valid { size }
    } else {
        HashTableCheck::Inconsistent { unreachable }
    }
}

fn read_slots<B: ByteOrder>(data: &[u8], offset: u32, size: u32) -> Option<Vec<u32>> {
    let length = u64::from(size) * 4;
    ensure_within("hash table", u64::from(offset), length, data.len()).ok()?;
    let start = offset as usize;
    let bytes = &data[start..start + length as usize];
    Some(bytes.chunks_exact(4).map(B::read_u32).collect())
}
