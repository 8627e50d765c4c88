//! # Address Book Service
//!
//! Concurrency boundary around the domain `AddressBook`, implementing the
//! `AddressBookApi` port.
//!
//! - One `parking_lot::RwLock`: reads run concurrently, mutations are
//!   serialized
//! - One tokio task lifts timed bans as their deadlines pass
//! - Side-effect events are published on a `tokio::sync::broadcast` channel

mod api;
mod core;
mod unban;

pub use self::core::{AddressBookService, DEFAULT_EVENT_CAPACITY};
