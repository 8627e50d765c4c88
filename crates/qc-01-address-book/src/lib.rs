//! # Peer Address Book Subsystem
//!
//! **Subsystem ID:** 1
//!
//! This crate decides which remote node addresses a Quantum-Chain node
//! remembers, which ones it offers to other nodes during discovery, and
//! when it forgets or bans an address, while staying bounded in memory.
//!
//! ## Anti-Eclipse Design
//!
//! - **New table:** addresses heard about but never connected to, bucketed
//!   by address group so one subnet cannot flood the book
//! - **Tried table:** addresses we have connected to, bucketed by full IP
//! - Bucket placement is keyed by a per-node secret (SipHash-2-4)
//! - Fixed and whitelisted peers cannot be banned; trusted peers are never
//!   downgraded
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** bucket addressing, address tables, the address book
//! - **Ports Layer:** `AddressBookApi` (inbound), `TimeSource`,
//!   `RandomSource` and `ConfigProvider` (outbound)
//! - **Service Layer:** lock boundary, unban task and event channel
//! - **Adapters Layer:** system clock, seeded RNG, static/TOML config
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use qc_01_address_book::{
//!     AddressBook, AddressBookConfig, PeerAddress, PeerInfo, PeerLists, TableKind,
//! };
//! use qc_01_address_book::adapters::{SeededRandomSource, SystemTimeSource};
//!
//! let mut book = AddressBook::new(
//!     AddressBookConfig::default(),
//!     PeerLists::default(),
//!     Arc::new(SystemTimeSource::new()),
//!     Arc::new(SeededRandomSource::new(7)),
//! )
//! .unwrap();
//!
//! // A peer sighted via gossip lands in the New table...
//! let address: PeerAddress = "203.0.113.5:4000".parse().unwrap();
//! book.add_peer(PeerInfo::new(address)).unwrap();
//! assert_eq!(book.table_of(&address), Some(TableKind::New));
//!
//! // ...and moves to Tried once a connection succeeds.
//! assert!(book.upgrade_peer(&address));
//! assert_eq!(book.table_of(&address), Some(TableKind::Tried));
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (FixedTimeSource, ManualTimeSource)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

// Domain
pub use domain::{
    bucket_id, AddPeerOutcome, AddressBook, AddressBookConfig, AddressBookError,
    AddressBookEvent, AddressBookStats, AddressGroup, AdvertisedPeer, ConfigError, NewTable,
    PeerAddress, PeerEntry, PeerInfo, PeerKind, PeerLists, Secret, SharedState, TableKind,
    Timestamp, TriedTable,
};

// Port traits
pub use ports::{AddressBookApi, ConfigProvider, RandomSource, TimeSource};

// Service
pub use service::AddressBookService;

// Adapters
pub use adapters::{FixedRandomSource, SeededRandomSource, StaticConfigProvider, SystemTimeSource};

#[cfg(feature = "toml-config")]
pub use adapters::TomlConfigProvider;

#[cfg(feature = "test-utils")]
pub use test_utils::{FixedTimeSource, ManualTimeSource};
