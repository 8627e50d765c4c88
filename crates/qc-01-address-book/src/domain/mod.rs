//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the core address book logic including:
//! - Peer addresses, advertised metadata and table entries
//! - Keyed bucket addressing (anti-eclipse placement)
//! - Bounded New/Tried address tables
//! - The address book: promotion, demotion, reference peers and bans

pub mod address_book;
pub mod address_table;
pub mod bucket_addressing;
pub mod new_table;
pub mod tried_table;
/// Core domain types (entities, values, errors)
pub mod types;

pub use address_book::*;
pub use address_table::{AddressBucket, AddressTable, TableConfig, TablePolicy};
pub use bucket_addressing::{bucket_id, canonical_ip, AddressGroup};
pub use new_table::{NewPolicy, NewTable};
pub use tried_table::{TriedPolicy, TriedTable};
pub use types::*;
