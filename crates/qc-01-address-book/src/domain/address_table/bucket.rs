//! Address bucket implementation.

use std::collections::BTreeMap;

use crate::domain::{PeerAddress, PeerEntry};

/// A bounded collection of entries keyed by address.
///
/// Entries are kept in address order so that index-based (random) selection
/// is reproducible for a given random source.
#[derive(Debug, Clone)]
pub struct AddressBucket {
    entries: BTreeMap<PeerAddress, PeerEntry>,
    capacity: usize,
}

impl AddressBucket {
    /// Create an empty bucket holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
        }
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether an insertion would need an eviction first.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Check if the bucket holds `address`.
    pub fn contains(&self, address: &PeerAddress) -> bool {
        self.entries.contains_key(address)
    }

    /// Look up an entry.
    pub fn get(&self, address: &PeerAddress) -> Option<&PeerEntry> {
        self.entries.get(address)
    }

    pub(crate) fn get_mut(&mut self, address: &PeerAddress) -> Option<&mut PeerEntry> {
        self.entries.get_mut(address)
    }

    /// Insert an entry. The caller makes room first; an entry already stored
    /// under the same address is replaced and returned.
    pub(crate) fn insert(&mut self, entry: PeerEntry) -> Option<PeerEntry> {
        debug_assert!(self.contains(&entry.address) || !self.is_full());
        self.entries.insert(entry.address, entry)
    }

    /// Remove an entry by address.
    pub fn remove(&mut self, address: &PeerAddress) -> Option<PeerEntry> {
        self.entries.remove(address)
    }

    /// Iterate over entries in address order.
    pub fn entries(&self) -> impl Iterator<Item = &PeerEntry> {
        self.entries.values()
    }

    /// Entry at position `index` in address order.
    pub fn entry_at(&self, index: usize) -> Option<&PeerEntry> {
        self.entries.values().nth(index)
    }

    /// The entry that has been in the bucket longest.
    pub fn oldest(&self) -> Option<&PeerEntry> {
        self.entries
            .values()
            .min_by_key(|e| e.internal_state.date_added)
    }

    /// Remove every entry matching `predicate`.
    pub(crate) fn drain_matching<F>(&mut self, mut predicate: F) -> Vec<PeerEntry>
    where
        F: FnMut(&PeerEntry) -> bool,
    {
        let keys: Vec<PeerAddress> = self
            .entries
            .values()
            .filter(|e| predicate(e))
            .map(|e| e.address)
            .collect();
        keys.iter().filter_map(|k| self.entries.remove(k)).collect()
    }
}
