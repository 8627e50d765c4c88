//! Address book type definitions.

use crate::domain::PeerEntry;

/// Result of offering a peer to the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPeerOutcome {
    /// Stored in the New table. `evicted` is the occupant that made room,
    /// if the bucket was full.
    Inserted {
        /// Entry evicted from the New table.
        evicted: Option<PeerEntry>,
    },
    /// The IP is blacklisted or banned; nothing was stored.
    Blocked,
}

impl AddPeerOutcome {
    /// Whether the peer was stored.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Statistics about the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBookStats {
    /// Number of addresses in the New table.
    pub new_count: usize,
    /// Number of addresses in the Tried table.
    pub tried_count: usize,
    /// Number of timed bans.
    pub banned_count: usize,
    /// Number of permanently blacklisted IPs.
    pub blacklisted_count: usize,
    /// Number of buckets in the New table.
    pub new_bucket_count: usize,
    /// Number of buckets in the Tried table.
    pub tried_bucket_count: usize,
}
