//! GNU gettext lookup hash table
//!
//! Open addressing over `hashpjw` with double hashing. Slots hold the
//! 1-based index of a string in the originals table; 0 marks an empty slot.
//!
//! Runtimes hash and compare message ids as C strings, so a plural id
//! (`singular\0plural`) is keyed by its singular part only.

/// The `hashpjw` string hash used by gettext runtimes
#[must_use]
pub fn hashpjw(key: &str) -> u32 {
    let mut hval: u32 = 0;
    for &byte in key.as_bytes() {
        hval = (hval << 4).wrapping_add(u32::from(byte));
        let g = hval & 0xF000_0000;
        if g != 0 {
            hval ^= g >> 24;
            hval ^= g;
        }
    }
    hval
}

/// The part of a message id a runtime sees: everything before the first NUL
#[must_use]
pub fn lookup_key(id: &str) -> &str {
    id.find('\0').map_or(id, |end| &id[..end])
}

/// Table size used for `count` strings: smallest odd prime >= `count * 4 / 3`, at least 3
#[must_use]
pub fn hash_table_size(count: usize) -> usize {
    next_prime((count * 4) / 3).max(3)
}

fn next_prime(seed: usize) -> usize {
    let mut candidate = seed | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// A built or parsed hash table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTable {
    slots: Vec<u32>,
}

impl HashTable {
    /// Build a table for `keys`, which are the originals in table order
    #[must_use]
    pub fn build<'a, I>(keys: I, count: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let size = hash_table_size(count);
        let mut slots = vec![0u32; size];
        for (index, key) in keys.into_iter().enumerate() {
            let mut probe = Probe::new(key, size);
            while slots[probe.slot] != 0 {
                probe.advance();
            }
            // count is bounded by the u32 string count already checked by the writer
            slots[probe.slot] = index as u32 + 1;
        }
        Self { slots }
    }

    /// Wrap slots read from a catalog
    #[must_use]
    pub fn from_slots(slots: Vec<u32>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Find the originals-table index of `key` the way a runtime would.
    ///
    /// `original_at` maps a 0-based table index to its stored message id.
    /// Both sides are compared up to their first NUL.
    pub fn lookup<'a, F>(&self, key: &str, original_at: F) -> Option<usize>
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let size = self.slots.len();
        if size < 3 {
            return None;
        }
        let key = lookup_key(key);
        let mut probe = Probe::new(key, size);
        // Every slot is visited at most once since size is prime
        for _ in 0..size {
            let slot = self.slots[probe.slot];
            if slot == 0 {
                return None;
            }
            let index = slot as usize - 1;
            if original_at(index).map(lookup_key) == Some(key) {
                return Some(index);
            }
            probe.advance();
        }
        None
    }
}

/// Double-hashing probe sequence
struct Probe {
    slot: usize,
    step: usize,
    size: usize,
}

impl Probe {
    fn new(key: &str, size: usize) -> Self {
        let hval = hashpjw(lookup_key(key)) as usize;
        Self {
            slot: hval % size,
            step: 1 + hval % (size - 2),
            size,
        }
    }

    fn advance(&mut self) {
        if self.slot >= self.size - self.step {
            self.slot -= self.size - self.step;
        } else {
            self.slot += self.step;
        }
    }
}
