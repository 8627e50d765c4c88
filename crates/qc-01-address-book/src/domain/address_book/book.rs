//! Main AddressBook implementation.
//!
//! Reference: Bitcoin Core's `addrman.h`

use std::collections::{HashSet, VecDeque};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::banned::BannedAddresses;
use super::config::{AddressBookConfig, PeerLists};
use super::events::AddressBookEvent;
use super::sampling::{sample_size, shuffle};
use super::types::{AddPeerOutcome, AddressBookStats};
use crate::domain::{
    AddressBookError, AdvertisedPeer, ConfigError, NewPolicy, NewTable, PeerAddress, PeerEntry,
    PeerInfo, PeerKind, TableKind, Timestamp, TriedPolicy, TriedTable,
};
use crate::ports::{RandomSource, TimeSource};

/// Events kept between drains; the oldest are dropped beyond this.
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Longest ban recorded; longer requests are capped to this.
pub const MAX_BAN_TIME: Duration = Duration::from_secs(300 * 365 * 24 * 60 * 60);

/// Address book with New/Tried segregation, reference peers and bans
///
/// # Anti-Eclipse Defense
///
/// 1. Unverified addresses go to the New table, bucketed by address group
/// 2. Only after a successful connection do they move to Tried
/// 3. Full buckets evict an occupant instead of growing
/// 4. Fixed and whitelisted peers cannot be banned; trusted peers are
///    never downgraded
pub struct AddressBook {
    config: AddressBookConfig,
    /// Addresses we've heard about but never connected to
    new_table: NewTable,
    /// Addresses we've successfully connected to
    tried_table: TriedTable,
    lists: PeerLists,
    seed_addresses: HashSet<PeerAddress>,
    fixed_addresses: HashSet<PeerAddress>,
    whitelisted_addresses: HashSet<PeerAddress>,
    /// IPs of fixed and whitelisted peers; never banned
    protected_ips: HashSet<IpAddr>,
    blacklist: HashSet<IpAddr>,
    banned: BannedAddresses,
    events: VecDeque<AddressBookEvent>,
    time_source: Arc<dyn TimeSource>,
    random: Arc<dyn RandomSource>,
}

impl AddressBook {
    /// Create an address book and load the reference peers.
    ///
    /// Fixed and whitelisted peers are placed in the New table; previous
    /// peers go straight to Tried. Evictions caused by loading are not
    /// reported.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if `config` fails validation.
    pub fn new(
        config: AddressBookConfig,
        lists: PeerLists,
        time_source: Arc<dyn TimeSource>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let new_table = NewTable::new(
            config.new_table_config(),
            config.secret,
            NewPolicy::new(config.eviction_threshold),
            Box::new(Arc::clone(&random)),
        )?;
        let tried_table = TriedTable::new(
            config.tried_table_config(),
            config.secret,
            TriedPolicy::new(config.max_reconnect_tries),
            Box::new(Arc::clone(&random)),
        )?;

        let addresses = |peers: &[PeerInfo]| -> HashSet<PeerAddress> {
            peers.iter().map(|p| p.address).collect()
        };
        let protected_ips = lists
            .fixed_peers
            .iter()
            .chain(&lists.whitelisted_peers)
            .map(|p| p.address.ip)
            .collect();

        let mut book = Self {
            seed_addresses: addresses(&lists.seed_peers),
            fixed_addresses: addresses(&lists.fixed_peers),
            whitelisted_addresses: addresses(&lists.whitelisted_peers),
            protected_ips,
            blacklist: lists.blacklisted_ips.iter().copied().collect(),
            banned: BannedAddresses::new(),
            events: VecDeque::new(),
            config,
            new_table,
            tried_table,
            lists,
            time_source,
            random,
        };
        book.load_reference_peers();
        book.events.clear();

        info!(
            new = book.new_table.len(),
            tried = book.tried_table.len(),
            blacklisted = book.blacklist.len(),
            "Address book initialized"
        );
        Ok(book)
    }

    fn load_reference_peers(&mut self) {
        let now = self.now();
        let trusted: Vec<PeerInfo> = self
            .lists
            .fixed_peers
            .iter()
            .chain(&self.lists.whitelisted_peers)
            .cloned()
            .collect();
        for info in trusted {
            if let Err(err) = self.add_peer(info) {
                debug!(%err, "Skipping duplicate reference peer");
            }
        }

        let previous = self.lists.previous_peers.clone();
        for info in previous {
            if self.has_peer(&info.address) || self.is_blocked(&info.address.ip) {
                continue;
            }
            let kind = self.classify(&info.address);
            if let Err(err) = self.tried_table.add_peer(PeerEntry::new(info, kind, now), now) {
                debug!(%err, "Skipping duplicate previous peer");
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Offer a peer to the book.
    ///
    /// Unknown, unblocked peers are classified against the reference lists
    /// and stored in the New table.
    ///
    /// # Errors
    ///
    /// `ExistingPeer` if the address is already in either table.
    pub fn add_peer(&mut self, info: PeerInfo) -> Result<AddPeerOutcome, AddressBookError> {
        if let Some(existing) = self.get_peer(&info.address) {
            return Err(AddressBookError::ExistingPeer(Box::new(existing.clone())));
        }
        if self.is_blocked(&info.address.ip) {
            warn!(peer = %info.address, "Refusing blocked peer");
            return Ok(AddPeerOutcome::Blocked);
        }

        let now = self.now();
        let kind = self.classify(&info.address);
        let evicted = self
            .new_table
            .add_peer(PeerEntry::new(info, kind, now), now)?;
        if let Some(entry) = &evicted {
            self.record_eviction(entry.clone(), TableKind::New);
        }
        Ok(AddPeerOutcome::Inserted { evicted })
    }

    /// Move a peer to the Tried table after a successful connection.
    ///
    /// Returns `true` if the peer is (now) in Tried. Returns `false` for
    /// unknown addresses and for peers whose IP was blocked in the meantime;
    /// the latter are dropped.
    pub fn upgrade_peer(&mut self, address: &PeerAddress) -> bool {
        if self.tried_table.contains(address) {
            return true;
        }
        let Some(mut entry) = self.new_table.remove_peer(address) else {
            return false;
        };
        if self.is_blocked(&address.ip) {
            warn!(peer = %address, "Dropping blocked peer instead of upgrading");
            self.record(AddressBookEvent::PeerRemoved(entry));
            return false;
        }

        let now = self.now();
        entry.internal_state.date_added = now;
        entry.internal_state.consecutive_failures = 0;
        match self.tried_table.add_peer(entry, now) {
            Ok(evicted) => {
                if let Some(evicted) = evicted {
                    self.record_eviction(evicted, TableKind::Tried);
                }
                debug!(peer = %address, "Peer upgraded to tried");
                true
            }
            Err(err) => {
                warn!(%err, "Upgrade target already in tried table");
                false
            }
        }
    }

    /// Record a failed connection to a peer.
    ///
    /// - Trusted and unknown peers: nothing happens, `false`
    /// - Tried peers: once the Tried table gives up on the peer it moves
    ///   back to New, `true`
    /// - New peers: deleted, `true`
    pub fn downgrade_peer(&mut self, address: &PeerAddress) -> bool {
        if self.is_trusted_peer(address) {
            return false;
        }

        if self.tried_table.contains(address) {
            let Some(mut entry) = self.tried_table.failed_connection(address) else {
                return false;
            };
            let now = self.now();
            entry.internal_state.date_added = now;
            entry.internal_state.consecutive_failures = 0;
            return match self.new_table.add_peer(entry, now) {
                Ok(evicted) => {
                    if let Some(evicted) = evicted {
                        self.record_eviction(evicted, TableKind::New);
                    }
                    debug!(peer = %address, "Peer downgraded to new");
                    true
                }
                Err(err) => {
                    warn!(%err, "Downgrade target already in new table");
                    false
                }
            };
        }

        match self.new_table.failed_connection(address) {
            Some(entry) => {
                debug!(peer = %address, "Peer deleted after failed connection");
                self.record(AddressBookEvent::PeerRemoved(entry));
                true
            }
            None => false,
        }
    }

    /// Merge the advertised metadata in `info` into the stored entry.
    ///
    /// Returns `false` if the address is unknown.
    pub fn update_peer(&mut self, info: PeerInfo) -> bool {
        let PeerInfo {
            address,
            shared_state,
        } = info;
        let Some(shared_state) = shared_state else {
            return self.has_peer(&address);
        };
        if self.tried_table.contains(&address) {
            self.tried_table.update_peer(&address, shared_state)
        } else {
            self.new_table.update_peer(&address, shared_state)
        }
    }

    /// Remove a peer from whichever table holds it.
    pub fn remove_peer(&mut self, address: &PeerAddress) -> Option<PeerEntry> {
        self.new_table
            .remove_peer(address)
            .or_else(|| self.tried_table.remove_peer(address))
    }

    // =========================================================================
    // Bans
    // =========================================================================

    /// Ban the IP of `address` for `ban_time` starting at `now`, dropping
    /// every entry with that IP.
    ///
    /// `ban_time` is capped at [`MAX_BAN_TIME`]. Returns the unban deadline,
    /// or `None` if the IP belongs to a fixed or whitelisted peer or is
    /// already banned.
    pub fn add_banned_peer(
        &mut self,
        address: &PeerAddress,
        ban_time: Duration,
        now: Instant,
    ) -> Option<Instant> {
        let ip = address.ip;
        if self.protected_ips.contains(&ip) {
            warn!(%ip, "Refusing to ban protected peer");
            return None;
        }
        if self.banned.is_banned(&ip) {
            return None;
        }
        let ban_time = ban_time.min(MAX_BAN_TIME);
        let Some(until) = now.checked_add(ban_time) else {
            warn!(%ip, ?ban_time, "Ban deadline out of range");
            return None;
        };

        self.banned.ban(ip, until);
        let mut removed = self.new_table.remove_where(|e| e.address.ip == ip);
        removed.extend(self.tried_table.remove_where(|e| e.address.ip == ip));
        info!(%ip, ?ban_time, removed = removed.len(), "Peer banned");

        for entry in removed {
            self.record(AddressBookEvent::PeerRemoved(entry));
        }
        self.record(AddressBookEvent::PeerBanned { ip, until });
        Some(until)
    }

    /// Ban for the configured default ban time.
    pub fn add_banned_peer_default(
        &mut self,
        address: &PeerAddress,
        now: Instant,
    ) -> Option<Instant> {
        self.add_banned_peer(address, self.config.default_ban_time, now)
    }

    /// Lift every ban due at `now`, returning the released IPs.
    pub fn release_expired_bans(&mut self, now: Instant) -> Vec<IpAddr> {
        let released = self.banned.release_expired(now);
        for ip in &released {
            info!(%ip, "Peer unbanned");
            self.record(AddressBookEvent::PeerUnbanned(*ip));
        }
        released
    }

    /// Earliest pending unban deadline.
    pub fn next_unban_deadline(&self) -> Option<Instant> {
        self.banned.next_deadline()
    }

    /// Drop every timed ban and its deadline. Returns how many were dropped.
    pub fn clear_bans(&mut self) -> usize {
        self.banned.clear()
    }

    /// Check if `ip` is under a timed ban.
    pub fn is_banned(&self, ip: &IpAddr) -> bool {
        self.banned.is_banned(ip)
    }

    /// Check if `ip` is permanently blacklisted.
    pub fn is_blacklisted(&self, ip: &IpAddr) -> bool {
        self.blacklist.contains(ip)
    }

    /// IPs under a timed ban.
    pub fn banned_addresses(&self) -> Vec<IpAddr> {
        self.banned.addresses()
    }

    /// Permanently blacklisted IPs.
    pub fn blacklisted_ips(&self) -> &[IpAddr] {
        &self.lists.blacklisted_ips
    }

    fn is_blocked(&self, ip: &IpAddr) -> bool {
        self.is_blacklisted(ip) || self.is_banned(ip)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up a peer in either table.
    pub fn get_peer(&self, address: &PeerAddress) -> Option<&PeerEntry> {
        self.new_table
            .get_peer(address)
            .or_else(|| self.tried_table.get_peer(address))
    }

    /// Check if either table holds `address`.
    pub fn has_peer(&self, address: &PeerAddress) -> bool {
        self.get_peer(address).is_some()
    }

    /// Which table holds `address`.
    pub fn table_of(&self, address: &PeerAddress) -> Option<TableKind> {
        if self.new_table.contains(address) {
            Some(TableKind::New)
        } else if self.tried_table.contains(address) {
            Some(TableKind::Tried)
        } else {
            None
        }
    }

    /// Every entry, New first.
    pub fn all_peers(&self) -> Vec<PeerEntry> {
        self.new_table
            .iter()
            .chain(self.tried_table.iter())
            .cloned()
            .collect()
    }

    /// Entries of the New table.
    pub fn new_peers(&self) -> Vec<PeerEntry> {
        self.new_table.all_peers()
    }

    /// Entries of the Tried table.
    pub fn tried_peers(&self) -> Vec<PeerEntry> {
        self.tried_table.all_peers()
    }

    /// Every entry with complete advertised metadata, New first.
    pub fn advertised_peers(&self) -> Vec<AdvertisedPeer> {
        let mut peers = self.new_table.advertised_peers();
        peers.extend(self.tried_table.advertised_peers());
        peers
    }

    /// A shuffled random sample of known peers for discovery.
    ///
    /// When the book holds at least `max` peers the sample size lies in
    /// `[min, max]`; smaller books yield what they have.
    pub fn randomized_peer_list(&self, min: usize, max: usize) -> Vec<PeerEntry> {
        let mut peers = self.all_peers();
        let size = sample_size(min, max, peers.len(), self.random.as_ref());
        shuffle(&mut peers, self.random.as_ref());
        peers.truncate(size);
        peers
    }

    /// Bootstrap seed peers.
    pub fn seed_peers(&self) -> &[PeerInfo] {
        &self.lists.seed_peers
    }

    /// Operator-pinned peers.
    pub fn fixed_peers(&self) -> &[PeerInfo] {
        &self.lists.fixed_peers
    }

    /// Operator-trusted peers.
    pub fn whitelisted_peers(&self) -> &[PeerInfo] {
        &self.lists.whitelisted_peers
    }

    /// Peers known from an earlier run.
    pub fn previous_peers(&self) -> &[PeerInfo] {
        &self.lists.previous_peers
    }

    /// Seed, fixed and whitelisted peers are trusted.
    pub fn is_trusted_peer(&self, address: &PeerAddress) -> bool {
        self.classify(address).is_trusted()
    }

    /// Reference-list classification of `address`; fixed wins over
    /// whitelisted, which wins over seed.
    pub fn classify(&self, address: &PeerAddress) -> PeerKind {
        if self.fixed_addresses.contains(address) {
            PeerKind::Fixed
        } else if self.whitelisted_addresses.contains(address) {
            PeerKind::Whitelisted
        } else if self.seed_addresses.contains(address) {
            PeerKind::Seed
        } else {
            PeerKind::None
        }
    }

    /// Get statistics
    pub fn stats(&self) -> AddressBookStats {
        AddressBookStats {
            new_count: self.new_table.len(),
            tried_count: self.tried_table.len(),
            banned_count: self.banned.len(),
            blacklisted_count: self.blacklist.len(),
            new_bucket_count: self.new_table.bucket_count(),
            tried_bucket_count: self.tried_table.bucket_count(),
        }
    }

    /// The New table.
    pub fn new_table(&self) -> &NewTable {
        &self.new_table
    }

    /// The Tried table.
    pub fn tried_table(&self) -> &TriedTable {
        &self.tried_table
    }

    /// Active configuration.
    pub fn config(&self) -> &AddressBookConfig {
        &self.config
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Take the events recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<AddressBookEvent> {
        self.events.drain(..).collect()
    }

    fn record_eviction(&mut self, entry: PeerEntry, table: TableKind) {
        debug!(%table, peer = %entry.address, "Peer evicted");
        self.record(AddressBookEvent::PeerEvicted { entry, table });
    }

    fn record(&mut self, event: AddressBookEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn now(&self) -> Timestamp {
        self.time_source.now()
    }
}

impl std::fmt::Debug for AddressBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressBook")
            .field("new_table", &self.new_table)
            .field("tried_table", &self.tried_table)
            .field("banned", &self.banned.len())
            .field("blacklisted", &self.blacklist.len())
            .finish()
    }
}
