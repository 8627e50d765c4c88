//! # Tried Table
//!
//! Addresses we have successfully connected to at least once.
//!
//! - Full bucket: evict a random occupant.
//! - Failed connection: count it; the entry is dropped once it reaches
//!   `max_reconnect_tries` consecutive failures.

use super::address_table::{random_occupant, AddressBucket, AddressTable, TablePolicy};
use crate::domain::{PeerAddress, PeerEntry, TableKind, Timestamp};
use crate::ports::RandomSource;

/// Table of previously-connected addresses.
pub type TriedTable = AddressTable<TriedPolicy>;

/// Eviction and failure rules of the Tried table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriedPolicy {
    max_reconnect_tries: u32,
}

impl TriedPolicy {
    /// Drop an entry after `max_reconnect_tries` consecutive failures.
    pub fn new(max_reconnect_tries: u32) -> Self {
        Self {
            max_reconnect_tries,
        }
    }

    /// Consecutive failures tolerated before removal.
    pub fn max_reconnect_tries(&self) -> u32 {
        self.max_reconnect_tries
    }
}

impl TablePolicy for TriedPolicy {
    const KIND: TableKind = TableKind::Tried;

    fn select_victim(
        &self,
        bucket: &AddressBucket,
        _now: Timestamp,
        random: &dyn RandomSource,
    ) -> Option<PeerAddress> {
        random_occupant(bucket, random)
    }

    fn record_failure(&self, entry: &mut PeerEntry) -> bool {
        let failures = &mut entry.internal_state.consecutive_failures;
        *failures = failures.saturating_add(1);
        *failures >= self.max_reconnect_tries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedRandomSource;
    use crate::domain::{PeerInfo, PeerKind, Secret, TableConfig};

    fn table(bucket_count: usize, bucket_size: usize, max_tries: u32) -> TriedTable {
        TriedTable::new(
            TableConfig::new(bucket_count, bucket_size),
            Secret::from(3u64),
            TriedPolicy::new(max_tries),
            Box::new(FixedRandomSource::new(0)),
        )
        .unwrap()
    }

    fn entry(last: u8) -> PeerEntry {
        PeerEntry::new(
            PeerInfo::new(PeerAddress::v4(30, 1, 2, last, 5000)),
            PeerKind::None,
            Timestamp::new(100),
        )
    }

    #[test]
    fn test_failures_accumulate_until_limit() {
        let mut table = table(8, 8, 3);
        let peer = entry(1);
        let address = peer.address;
        table.add_peer(peer, Timestamp::new(100)).unwrap();

        assert!(!table.failed_connection_action(&address));
        assert!(!table.failed_connection_action(&address));
        assert_eq!(
            table.get_peer(&address).unwrap().internal_state.consecutive_failures,
            2
        );

        assert!(table.failed_connection_action(&address));
        assert!(!table.contains(&address));
    }

    #[test]
    fn test_failed_connection_on_unknown_address() {
        let mut table = table(8, 8, 3);
        assert!(!table.failed_connection_action(&PeerAddress::v4(1, 2, 3, 4, 5)));
    }

    #[test]
    fn test_single_try_limit_removes_immediately() {
        let mut table = table(8, 8, 1);
        let peer = entry(9);
        let address = peer.address;
        table.add_peer(peer, Timestamp::new(100)).unwrap();
        assert!(table.failed_connection_action(&address));
    }

    #[test]
    fn test_full_bucket_evicts_random_occupant() {
        let mut table = table(1, 2, 3);
        let now = Timestamp::new(100);
        table.add_peer(entry(1), now).unwrap();
        table.add_peer(entry(2), now).unwrap();

        // FixedRandomSource(0) selects the lowest address.
        let evicted = table.add_peer(entry(3), now).unwrap().unwrap();
        assert_eq!(evicted.address, PeerAddress::v4(30, 1, 2, 1, 5000));
        assert_eq!(table.len(), 2);
    }
}
