//! Address table implementation.

use std::fmt;

use tracing::debug;

use super::bucket::AddressBucket;
use super::config::TableConfig;
use super::policy::TablePolicy;
use crate::domain::{
    bucket_id, AddressBookError, AdvertisedPeer, ConfigError, PeerAddress, PeerEntry, Secret,
    SharedState, TableKind, Timestamp,
};
use crate::ports::RandomSource;

/// A fixed array of bounded buckets, specialized by a [`TablePolicy`].
///
/// Bucket placement is decided by [`bucket_id`] with this table's secret and
/// kind, so an address always maps to the same bucket for the lifetime of
/// the table.
pub struct AddressTable<P: TablePolicy> {
    buckets: Vec<AddressBucket>,
    config: TableConfig,
    secret: Secret,
    policy: P,
    random: Box<dyn RandomSource>,
}

impl<P: TablePolicy> AddressTable<P> {
    /// Create a table.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the table would have no buckets or
    /// zero-sized buckets.
    pub fn new(
        config: TableConfig,
        secret: Secret,
        policy: P,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            buckets: (0..config.bucket_count)
                .map(|_| AddressBucket::new(config.bucket_size))
                .collect(),
            config,
            secret,
            policy,
            random,
        })
    }

    /// Which table this is.
    pub fn kind(&self) -> TableKind {
        P::KIND
    }

    /// The table's eviction/failure policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.config.bucket_count
    }

    /// Capacity of each bucket.
    pub fn bucket_size(&self) -> usize {
        self.config.bucket_size
    }

    /// All buckets, in index order.
    pub fn buckets(&self) -> &[AddressBucket] {
        &self.buckets
    }

    /// Index of the bucket `address` belongs to.
    pub fn bucket_index(&self, address: &PeerAddress) -> Option<usize> {
        bucket_id(&self.secret, address, P::KIND, self.config.bucket_count)
    }

    /// The bucket `address` belongs to.
    pub fn bucket(&self, address: &PeerAddress) -> Option<&AddressBucket> {
        self.bucket_index(address).and_then(|i| self.buckets.get(i))
    }

    fn bucket_mut(&mut self, address: &PeerAddress) -> Option<&mut AddressBucket> {
        let index = self.bucket_index(address)?;
        self.buckets.get_mut(index)
    }

    /// Total entry count
    pub fn len(&self) -> usize {
        self.buckets.iter().map(AddressBucket::len).sum()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(AddressBucket::is_empty)
    }

    /// Check if the table holds `address`.
    pub fn contains(&self, address: &PeerAddress) -> bool {
        self.get_peer(address).is_some()
    }

    /// Look up an entry through its bucket.
    pub fn get_peer(&self, address: &PeerAddress) -> Option<&PeerEntry> {
        self.bucket(address)?.get(address)
    }

    /// Insert `entry`, evicting one occupant if its bucket is full.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(evicted))` if an occupant made room
    /// - `Ok(None)` if the bucket had a free slot
    /// - `Err(ExistingPeer)` if the address is already in this table
    pub fn add_peer(
        &mut self,
        entry: PeerEntry,
        now: Timestamp,
    ) -> Result<Option<PeerEntry>, AddressBookError> {
        if let Some(existing) = self.get_peer(&entry.address) {
            return Err(AddressBookError::ExistingPeer(Box::new(existing.clone())));
        }

        let evicted = self.make_space(&entry.address, now);
        let kind = P::KIND;
        let address = entry.address;
        if let Some(bucket) = self.bucket_mut(&address) {
            bucket.insert(entry);
            debug!(table = %kind, peer = %address, "Peer added");
        }
        Ok(evicted)
    }

    /// Merge `shared_state` into the stored entry.
    ///
    /// Returns `false` if the address is not in this table.
    pub fn update_peer(&mut self, address: &PeerAddress, shared_state: SharedState) -> bool {
        let Some(entry) = self.bucket_mut(address).and_then(|b| b.get_mut(address)) else {
            return false;
        };
        match entry.shared_state.as_mut() {
            Some(current) => current.merge(shared_state),
            None => entry.shared_state = Some(shared_state),
        }
        true
    }

    /// Remove an entry, returning it if it was present.
    pub fn remove_peer(&mut self, address: &PeerAddress) -> Option<PeerEntry> {
        self.bucket_mut(address)?.remove(address)
    }

    /// Free a slot in `address`'s bucket if it is full.
    ///
    /// Returns the evicted entry, or `None` if the bucket had room.
    pub fn make_space(&mut self, address: &PeerAddress, now: Timestamp) -> Option<PeerEntry> {
        let index = self.bucket_index(address)?;
        let bucket = self.buckets.get_mut(index)?;
        if !bucket.is_full() {
            return None;
        }

        let victim = self.policy.select_victim(bucket, now, self.random.as_ref())?;
        let evicted = bucket.remove(&victim)?;
        debug!(
            table = %P::KIND,
            bucket = index,
            evicted = %evicted.address,
            "Bucket full, evicted occupant"
        );
        Some(evicted)
    }

    /// Apply the policy's failed-connection action, returning the entry if it
    /// was dropped as a result.
    pub fn failed_connection(&mut self, address: &PeerAddress) -> Option<PeerEntry> {
        let policy = &self.policy;
        let index = bucket_id(&self.secret, address, P::KIND, self.config.bucket_count)?;
        let bucket = self.buckets.get_mut(index)?;
        let entry = bucket.get_mut(address)?;
        if policy.record_failure(entry) {
            bucket.remove(address)
        } else {
            None
        }
    }

    /// Apply the policy's failed-connection action.
    ///
    /// Returns `true` if the peer was removed as a result; `false` if it was
    /// kept or was not present.
    pub fn failed_connection_action(&mut self, address: &PeerAddress) -> bool {
        self.failed_connection(address).is_some()
    }

    /// Remove every entry matching `predicate`.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<PeerEntry>
    where
        F: FnMut(&PeerEntry) -> bool,
    {
        self.buckets
            .iter_mut()
            .flat_map(|b| b.drain_matching(&mut predicate))
            .collect()
    }

    /// Iterate over every entry.
    pub fn iter(&self) -> impl Iterator<Item = &PeerEntry> {
        self.buckets.iter().flat_map(|b| b.entries())
    }

    /// Every entry, flattened over all buckets.
    pub fn all_peers(&self) -> Vec<PeerEntry> {
        self.iter().cloned().collect()
    }

    /// Every entry with complete advertised metadata. Partially-known entries
    /// are skipped.
    pub fn advertised_peers(&self) -> Vec<AdvertisedPeer> {
        self.iter().filter_map(AdvertisedPeer::from_entry).collect()
    }
}

impl<P: TablePolicy> fmt::Debug for AddressTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressTable")
            .field("kind", &P::KIND)
            .field("bucket_count", &self.config.bucket_count)
            .field("bucket_size", &self.config.bucket_size)
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}
