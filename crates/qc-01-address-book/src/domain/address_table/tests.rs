//! Tests for the generic Address Table
//!
//! Reference: Bitcoin Core's `addrman.h` - bounded bucket tests

use std::time::Duration;

use super::*;
use crate::adapters::{FixedRandomSource, SeededRandomSource};
use crate::domain::{
    AddressBookError, NewPolicy, NewTable, PeerAddress, PeerEntry, PeerInfo, PeerKind, Secret,
    SharedState, TriedPolicy, TriedTable, Timestamp,
};

fn now() -> Timestamp {
    Timestamp::new(1_000)
}

fn new_table(bucket_count: usize, bucket_size: usize) -> NewTable {
    NewTable::new(
        TableConfig::new(bucket_count, bucket_size),
        Secret::from(11u64),
        NewPolicy::new(Duration::from_secs(86_400)),
        Box::new(SeededRandomSource::new(5)),
    )
    .unwrap()
}

fn entry(c: u8, d: u8) -> PeerEntry {
    PeerEntry::new(
        PeerInfo::new(PeerAddress::v4(50, 60, c, d, 7000)),
        PeerKind::None,
        now(),
    )
}

fn complete_state() -> SharedState {
    SharedState {
        version: Some("3.0.1".into()),
        protocol_version: Some("3.1".into()),
        network_id: Some("mainnet".into()),
        ..Default::default()
    }
}

// =============================================================================
// TEST GROUP 1: Construction
// =============================================================================

#[test]
fn test_zero_bucket_count_rejected() {
    let result = NewTable::new(
        TableConfig::new(0, 32),
        Secret::from(1u64),
        NewPolicy::new(Duration::from_secs(1)),
        Box::new(FixedRandomSource::new(0)),
    );
    assert!(result.is_err());
}

#[test]
fn test_zero_bucket_size_rejected() {
    let result = TriedTable::new(
        TableConfig::new(16, 0),
        Secret::from(1u64),
        TriedPolicy::new(3),
        Box::new(FixedRandomSource::new(0)),
    );
    assert!(result.is_err());
}

#[test]
fn test_new_table_shape() {
    let table = new_table(16, 4);
    assert_eq!(table.kind(), crate::domain::TableKind::New);
    assert_eq!(table.bucket_count(), 16);
    assert_eq!(table.bucket_size(), 4);
    assert_eq!(table.buckets().len(), 16);
    assert!(table.is_empty());
}

// =============================================================================
// TEST GROUP 2: Add / Lookup / Remove
// =============================================================================

#[test]
fn test_add_then_get() {
    let mut table = new_table(16, 4);
    let peer = entry(1, 1);
    let address = peer.address;

    assert_eq!(table.add_peer(peer.clone(), now()).unwrap(), None);
    assert_eq!(table.get_peer(&address), Some(&peer));
    assert!(table.contains(&address));
    assert_eq!(table.len(), 1);

    let index = table.bucket_index(&address).unwrap();
    assert!(table.buckets()[index].contains(&address));
}

#[test]
fn test_duplicate_add_is_existing_peer() {
    let mut table = new_table(16, 4);
    let peer = entry(1, 1);
    table.add_peer(peer.clone(), now()).unwrap();

    let err = table.add_peer(peer.clone(), now()).unwrap_err();
    assert!(matches!(err, AddressBookError::ExistingPeer(_)));
    assert_eq!(err.entry().address, peer.address);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_remove_peer() {
    let mut table = new_table(16, 4);
    let peer = entry(1, 1);
    let address = peer.address;
    table.add_peer(peer, now()).unwrap();

    assert_eq!(table.remove_peer(&address).map(|e| e.address), Some(address));
    assert!(table.remove_peer(&address).is_none());
    assert!(table.is_empty());
}

#[test]
fn test_update_peer_merges_shared_state() {
    let mut table = new_table(16, 4);
    let peer = entry(1, 1);
    let address = peer.address;
    table.add_peer(peer, now()).unwrap();

    assert!(table.update_peer(&address, complete_state()));
    assert!(table.update_peer(
        &address,
        SharedState {
            height: Some(77),
            ..Default::default()
        }
    ));

    let stored = table.get_peer(&address).unwrap().shared_state.clone().unwrap();
    assert_eq!(stored.version.as_deref(), Some("3.0.1"));
    assert_eq!(stored.height, Some(77));
    assert!(!table.update_peer(&PeerAddress::v4(1, 1, 1, 1, 1), complete_state()));
}

// =============================================================================
// TEST GROUP 3: Bounded Buckets
// =============================================================================

#[test]
fn test_overfull_bucket_evicts_exactly_one() {
    let mut table = new_table(1, 8);
    let mut evictions = 0;
    for d in 0..=8u8 {
        if table.add_peer(entry(0, d), now()).unwrap().is_some() {
            evictions += 1;
        }
    }
    assert_eq!(evictions, 1);
    assert_eq!(table.len(), 8);
    assert_eq!(table.buckets()[0].len(), 8);
}

#[test]
fn test_three_adds_into_two_slot_bucket() {
    let mut table = new_table(1, 2);
    let added = [entry(9, 1), entry(9, 2), entry(9, 3)];

    let victims: Vec<PeerEntry> = added
        .iter()
        .cloned()
        .filter_map(|e| table.add_peer(e, now()).unwrap())
        .collect();

    assert_eq!(table.len(), 2);
    assert_eq!(victims.len(), 1);
    assert!(!table.contains(&victims[0].address));
    assert!(added[..2].iter().any(|e| e.address == victims[0].address));
}

#[test]
fn test_make_space_on_bucket_with_room() {
    let mut table = new_table(1, 2);
    table.add_peer(entry(0, 1), now()).unwrap();
    assert!(table.make_space(&entry(0, 2).address, now()).is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_buckets_never_exceed_capacity() {
    let mut table = new_table(4, 3);
    for c in 0..20u8 {
        for d in 0..10u8 {
            let _ = table.add_peer(entry(c, d), now());
        }
    }
    assert!(table.buckets().iter().all(|b| b.len() <= b.capacity()));
    assert!(table.len() <= 12);
}

// =============================================================================
// TEST GROUP 4: Listing
// =============================================================================

#[test]
fn test_advertised_peers_skip_incomplete_entries() {
    let mut table = new_table(16, 4);
    let bare = entry(1, 1);
    let partial = PeerEntry::new(
        PeerInfo::new(PeerAddress::v4(70, 1, 1, 1, 7000)).with_shared_state(SharedState {
            version: Some("3.0.1".into()),
            ..Default::default()
        }),
        PeerKind::None,
        now(),
    );
    let full = PeerEntry::new(
        PeerInfo::new(PeerAddress::v4(80, 1, 1, 1, 7000)).with_shared_state(complete_state()),
        PeerKind::None,
        now(),
    );
    for e in [bare, partial, full.clone()] {
        table.add_peer(e, now()).unwrap();
    }

    assert_eq!(table.all_peers().len(), 3);
    let advertised = table.advertised_peers();
    assert_eq!(advertised.len(), 1);
    assert_eq!(advertised[0].address, full.address);
}

#[test]
fn test_remove_where_drains_matching_entries() {
    let mut table = new_table(16, 8);
    for d in 0..5u8 {
        table.add_peer(entry(1, d), now()).unwrap();
    }
    let removed = table.remove_where(|e| e.address.ip == entry(1, 3).address.ip);
    assert_eq!(removed.len(), 1);
    assert_eq!(table.len(), 4);
}
