//! # Address Book - New/Tried Tables, Reference Peers and Bans
//!
//! Composes the two address tables with the operator's reference lists and
//! a timed ban set.
//!
//! ## Lifecycle
//!
//! ```text
//! unknown --add_peer--> New --upgrade_peer--> Tried
//!                        ^                      |
//!                        +---downgrade_peer-----+  (after max_reconnect_tries)
//! New --downgrade_peer--> deleted
//! any --ban / eviction / remove_peer--> deleted
//! ```
//!
//! Reference: Bitcoin Core's `addrman.h`, `banman.h`

mod banned;
mod book;
mod config;
mod events;
mod sampling;
mod types;

pub use banned::BannedAddresses;
pub use book::{AddressBook, MAX_BAN_TIME, MAX_PENDING_EVENTS};
pub use config::{AddressBookConfig, PeerLists};
pub use events::AddressBookEvent;
pub use types::{AddPeerOutcome, AddressBookStats};
