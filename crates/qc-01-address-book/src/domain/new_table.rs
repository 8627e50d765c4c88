//! # New Table
//!
//! Addresses heard about but never successfully connected to.
//!
//! - Full bucket: evict the oldest occupant once it has outlived the
//!   eviction threshold, otherwise a random occupant.
//! - Failed connection: one strike, the entry is dropped.

use std::time::Duration;

use super::address_table::{random_occupant, AddressBucket, AddressTable, TablePolicy};
use crate::domain::{PeerAddress, PeerEntry, TableKind, Timestamp};
use crate::ports::RandomSource;

/// Table of unverified addresses.
pub type NewTable = AddressTable<NewPolicy>;

/// Eviction and failure rules of the New table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPolicy {
    eviction_threshold: Duration,
}

impl NewPolicy {
    /// Entries older than `eviction_threshold` are evicted first.
    pub fn new(eviction_threshold: Duration) -> Self {
        Self { eviction_threshold }
    }

    /// Age beyond which an entry is considered stale.
    pub fn eviction_threshold(&self) -> Duration {
        self.eviction_threshold
    }
}

impl TablePolicy for NewPolicy {
    const KIND: TableKind = TableKind::New;

    fn select_victim(
        &self,
        bucket: &AddressBucket,
        now: Timestamp,
        random: &dyn RandomSource,
    ) -> Option<PeerAddress> {
        let oldest = bucket.oldest()?;
        if oldest.age_secs(now) > self.eviction_threshold.as_secs() {
            return Some(oldest.address);
        }
        random_occupant(bucket, random)
    }

    fn record_failure(&self, _entry: &mut PeerEntry) -> bool {
        true
    }
}
