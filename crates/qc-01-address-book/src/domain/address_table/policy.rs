//! Table policy seam.
//!
//! The generic [`AddressTable`](super::AddressTable) handles bucket layout,
//! lookup and insertion; a policy decides what makes the table "new" or
//! "tried": its bucket-addressing kind, whom to evict from a full bucket,
//! and when a failed connection drops an entry.

use std::fmt;

use super::bucket::AddressBucket;
use crate::domain::{PeerAddress, PeerEntry, TableKind, Timestamp};
use crate::ports::RandomSource;

/// Behavior that differs between the New and Tried tables.
pub trait TablePolicy: fmt::Debug + Send + Sync {
    /// Bucket-addressing kind for this table.
    const KIND: TableKind;

    /// Choose the occupant of a full `bucket` to evict.
    ///
    /// Returns `None` only for an empty bucket.
    fn select_victim(
        &self,
        bucket: &AddressBucket,
        now: Timestamp,
        random: &dyn RandomSource,
    ) -> Option<PeerAddress>;

    /// Record a failed connection on `entry`. Returns `true` when the entry
    /// must leave the table.
    fn record_failure(&self, entry: &mut PeerEntry) -> bool;
}

/// Uniformly random occupant of `bucket`.
pub(crate) fn random_occupant(
    bucket: &AddressBucket,
    random: &dyn RandomSource,
) -> Option<PeerAddress> {
    if bucket.is_empty() {
        return None;
    }
    let index = random.random_usize(bucket.len());
    bucket.entry_at(index).map(|e| e.address)
}
