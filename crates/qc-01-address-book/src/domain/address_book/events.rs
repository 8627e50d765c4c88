//! Address book events.

use std::net::IpAddr;
use std::time::Instant;

use crate::domain::{PeerEntry, TableKind};

/// Something that happened to the book as a side effect of a mutation.
///
/// Explicit removals by the caller are not reported; the caller already
/// knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressBookEvent {
    /// A full bucket pushed `entry` out of `table`.
    PeerEvicted {
        /// The evicted entry.
        entry: PeerEntry,
        /// Table it was evicted from.
        table: TableKind,
    },
    /// The entry left the book after failed connections or a ban.
    PeerRemoved(PeerEntry),
    /// `ip` was banned until `until`.
    PeerBanned {
        /// The banned IP.
        ip: IpAddr,
        /// When the ban lifts.
        until: Instant,
    },
    /// The ban on `ip` expired.
    PeerUnbanned(IpAddr),
}
