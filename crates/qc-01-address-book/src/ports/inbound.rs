//! # Driving Ports (Inbound API)
//!
//! The API the address book exposes to the node: the connection manager
//! reports outcomes, discovery asks for candidates.

use std::net::IpAddr;
use std::time::Duration;

use crate::domain::{
    AddPeerOutcome, AddressBookError, AddressBookStats, AdvertisedPeer, PeerAddress, PeerEntry,
    PeerInfo,
};

/// Primary API for interacting with the address book.
///
/// All methods take `&self`; implementations serialize mutations
/// internally so the API can be shared across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use qc_01_address_book::ports::AddressBookApi;
///
/// fn on_connected<T: AddressBookApi>(book: &T, info: PeerInfo) {
///     let _ = book.add_peer(info.clone());
///     book.upgrade_peer(&info.address);
/// }
/// ```
pub trait AddressBookApi: Send + Sync {
    /// Offer a newly sighted peer.
    ///
    /// # Returns
    ///
    /// - `Ok(Inserted { evicted })` if stored in the New table
    /// - `Ok(Blocked)` if the IP is blacklisted or banned
    /// - `Err(ExistingPeer)` if the address is already known
    fn add_peer(&self, info: PeerInfo) -> Result<AddPeerOutcome, AddressBookError>;

    /// A connection to `address` succeeded. Returns `true` if the peer is
    /// now in the Tried table.
    fn upgrade_peer(&self, address: &PeerAddress) -> bool;

    /// A connection to `address` failed. Returns `true` if the peer moved
    /// from Tried to New or was deleted from New.
    fn downgrade_peer(&self, address: &PeerAddress) -> bool;

    /// Merge fresh advertised metadata. Returns `false` for unknown peers.
    fn update_peer(&self, info: PeerInfo) -> bool;

    /// Forget a peer. Returns `false` if it was unknown.
    fn remove_peer(&self, address: &PeerAddress) -> bool;

    /// Ban the peer's IP for `ban_time`.
    ///
    /// Fixed and whitelisted IPs, and IPs already banned, are left alone.
    fn add_banned_peer(&self, address: &PeerAddress, ban_time: Duration);

    /// Look up a peer in either table.
    fn get_peer(&self, address: &PeerAddress) -> Option<PeerEntry>;

    /// Check if either table holds `address`.
    fn has_peer(&self, address: &PeerAddress) -> bool;

    /// Every known peer.
    fn all_peers(&self) -> Vec<PeerEntry>;

    /// Peers in the New table.
    fn new_peers(&self) -> Vec<PeerEntry>;

    /// Peers in the Tried table.
    fn tried_peers(&self) -> Vec<PeerEntry>;

    /// Fully-known peers that may be offered to other nodes.
    fn advertised_peers(&self) -> Vec<AdvertisedPeer>;

    /// A shuffled sample of known peers; between `min` and `max` entries
    /// when the book holds at least `max`.
    fn randomized_peer_list(&self, min: usize, max: usize) -> Vec<PeerEntry>;

    /// IPs currently under a timed ban.
    fn banned_addresses(&self) -> Vec<IpAddr>;

    /// Get statistics
    fn stats(&self) -> AddressBookStats;
}
