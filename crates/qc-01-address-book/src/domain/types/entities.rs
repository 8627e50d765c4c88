//! Core Domain Entities for the Address Book
//!
//! A peer is identified by its [`PeerAddress`]. Everything else about it
//! (advertised metadata, bookkeeping) hangs off a [`PeerEntry`] owned by
//! exactly one table bucket.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Network address of a remote node (IP + port).
///
/// This is the lookup key in both tables. Once an entry exists its address
/// never changes; updates only replace metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeerAddress {
    /// IP address (v4 or v6).
    pub ip: IpAddr,
    /// Port number.
    pub port: u16,
}

impl PeerAddress {
    /// Create a new peer address.
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    /// Create an IPv4 peer address.
    pub fn v4(a: u8, b: u8, c: u8, d: u8, port: u16) -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::new(a, b, c, d)), port)
    }

    /// The address as a std socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.socket_addr().fmt(f)
    }
}

impl FromStr for PeerAddress {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SocketAddr>().map(Self::from)
    }
}

/// Metadata a peer advertises about itself during discovery.
///
/// Every field is optional: peers learned second-hand are often only
/// partially known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SharedState {
    /// Application version string.
    pub version: Option<String>,
    /// Wire protocol version.
    pub protocol_version: Option<String>,
    /// Network (chain) identifier the peer is on.
    pub network_id: Option<String>,
    /// Operating system reported by the peer.
    pub os: Option<String>,
    /// Best chain height reported by the peer.
    pub height: Option<u64>,
    /// Port the peer accepts inbound connections on.
    pub advertised_port: Option<u16>,
}

impl SharedState {
    /// Whether enough is known about the peer to advertise it to others.
    pub fn is_complete(&self) -> bool {
        self.version.is_some() && self.protocol_version.is_some() && self.network_id.is_some()
    }

    /// Merge `incoming` into `self`: present fields overwrite, absent ones keep
    /// the current value.
    pub fn merge(&mut self, incoming: SharedState) {
        let SharedState {
            version,
            protocol_version,
            network_id,
            os,
            height,
            advertised_port,
        } = incoming;

        if version.is_some() {
            self.version = version;
        }
        if protocol_version.is_some() {
            self.protocol_version = protocol_version;
        }
        if network_id.is_some() {
            self.network_id = network_id;
        }
        if os.is_some() {
            self.os = os;
        }
        if height.is_some() {
            self.height = height;
        }
        if advertised_port.is_some() {
            self.advertised_port = advertised_port;
        }
    }
}

/// Classification of an address against the reference lists.
///
/// Computed once when an entry is created and stored on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PeerKind {
    /// Not in any reference list.
    #[default]
    None,
    /// Bootstrap seed node.
    Seed,
    /// Operator-pinned peer the node always keeps.
    Fixed,
    /// Operator-trusted peer.
    Whitelisted,
}

impl PeerKind {
    /// Trusted peers are never downgraded.
    pub fn is_trusted(&self) -> bool {
        !matches!(self, PeerKind::None)
    }

    /// Fixed and whitelisted peers can never be banned.
    pub fn is_ban_protected(&self) -> bool {
        matches!(self, PeerKind::Fixed | PeerKind::Whitelisted)
    }
}

impl fmt::Display for PeerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Seed => write!(f, "seed"),
            Self::Fixed => write!(f, "fixed"),
            Self::Whitelisted => write!(f, "whitelisted"),
        }
    }
}

/// Bookkeeping the address book keeps per entry. Never advertised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalState {
    /// Reference-list classification.
    pub peer_kind: PeerKind,
    /// When the entry entered its current table.
    pub date_added: Timestamp,
    /// Connection failures since the last success.
    pub consecutive_failures: u32,
}

impl InternalState {
    /// Fresh state for an entry created at `now`.
    pub fn new(peer_kind: PeerKind, now: Timestamp) -> Self {
        Self {
            peer_kind,
            date_added: now,
            consecutive_failures: 0,
        }
    }
}

/// A peer as reported by a collaborator (connection manager, discovery).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeerInfo {
    /// The peer's address.
    pub address: PeerAddress,
    /// Advertised metadata, if any is known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shared_state: Option<SharedState>,
}

impl PeerInfo {
    /// A bare address with no metadata.
    pub fn new(address: PeerAddress) -> Self {
        Self {
            address,
            shared_state: None,
        }
    }

    /// Attach advertised metadata.
    #[must_use]
    pub fn with_shared_state(mut self, shared_state: SharedState) -> Self {
        self.shared_state = Some(shared_state);
        self
    }
}

impl From<PeerAddress> for PeerInfo {
    fn from(address: PeerAddress) -> Self {
        Self::new(address)
    }
}

/// A peer stored in one of the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEntry {
    /// Identity key.
    pub address: PeerAddress,
    /// Advertised metadata, absent for partially-known peers.
    pub shared_state: Option<SharedState>,
    /// Table bookkeeping.
    pub internal_state: InternalState,
}

impl PeerEntry {
    /// Create an entry for `info` classified as `peer_kind`, added at `now`.
    pub fn new(info: PeerInfo, peer_kind: PeerKind, now: Timestamp) -> Self {
        Self {
            address: info.address,
            shared_state: info.shared_state,
            internal_state: InternalState::new(peer_kind, now),
        }
    }

    /// The entry's peer kind.
    pub fn peer_kind(&self) -> PeerKind {
        self.internal_state.peer_kind
    }

    /// Seconds the entry has spent in its table as of `now`.
    pub fn age_secs(&self, now: Timestamp) -> u64 {
        now.secs_since(self.internal_state.date_added)
    }

    /// The collaborator-facing view of this entry.
    pub fn to_info(&self) -> PeerInfo {
        PeerInfo {
            address: self.address,
            shared_state: self.shared_state.clone(),
        }
    }
}

/// A peer that is fully known and safe to offer to other nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdvertisedPeer {
    /// The peer's address.
    pub address: PeerAddress,
    /// Complete advertised metadata.
    pub shared_state: SharedState,
}

impl AdvertisedPeer {
    /// Build from an entry, or `None` if the entry's metadata is missing or
    /// incomplete.
    pub fn from_entry(entry: &PeerEntry) -> Option<Self> {
        let shared_state = entry.shared_state.as_ref().filter(|s| s.is_complete())?;
        Some(Self {
            address: entry.address,
            shared_state: shared_state.clone(),
        })
    }
}

/// Unix timestamp in seconds.
///
/// Timestamps are clamped to a sane maximum so age arithmetic cannot be
/// steered by absurd values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Year 9999.
    pub const MAX_REASONABLE: u64 = 253_402_300_799;

    /// Create a new timestamp, clamping to `MAX_REASONABLE`.
    pub fn new(secs: u64) -> Self {
        Self(secs.min(Self::MAX_REASONABLE))
    }

    /// Get the underlying seconds value.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add seconds (saturating at `MAX_REASONABLE`).
    pub fn add_secs(&self, secs: u64) -> Self {
        Self::new(self.0.saturating_add(secs))
    }

    /// Seconds elapsed from `earlier` to `self`, zero if `earlier` is later.
    pub fn secs_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
