//! # Address Table - Bounded Bucketed Peer Storage
//!
//! The shared half of the New/Tried design: a fixed number of buckets, each
//! holding at most `bucket_size` entries, with placement decided by
//! [`bucket_id`](crate::domain::bucket_id).
//!
//! What differs between the two tables (addressing kind, eviction choice,
//! failed-connection handling) is supplied by a [`TablePolicy`].
//!
//! Reference: Bitcoin Core's `addrman.h` (`vvNew` / `vvTried`)

mod bucket;
mod config;
mod policy;
mod table;

pub use bucket::AddressBucket;
pub use config::TableConfig;
pub(crate) use policy::random_occupant;
pub use policy::TablePolicy;
pub use table::AddressTable;

#[cfg(test)]
mod tests;
