//! Address Book configuration.

use std::net::IpAddr;
use std::time::Duration;

use crate::domain::{ConfigError, PeerInfo, Secret, TableConfig};

/// Tunables of the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookConfig {
    /// Bucket-placement key shared by both tables.
    pub secret: Secret,
    /// Number of buckets in the New table
    pub new_bucket_count: usize,
    /// Maximum entries per New bucket
    pub new_bucket_size: usize,
    /// Age after which a New entry is preferred for eviction
    pub eviction_threshold: Duration,
    /// Number of buckets in the Tried table
    pub tried_bucket_count: usize,
    /// Maximum entries per Tried bucket
    pub tried_bucket_size: usize,
    /// Consecutive failures before a Tried entry is dropped
    pub max_reconnect_tries: u32,
    /// Ban length used when the caller does not give one
    pub default_ban_time: Duration,
}

impl Default for AddressBookConfig {
    fn default() -> Self {
        Self {
            secret: Secret::random(),
            new_bucket_count: 128,
            new_bucket_size: 32,
            eviction_threshold: Duration::from_secs(24 * 60 * 60),
            tried_bucket_count: 64,
            tried_bucket_size: 32,
            max_reconnect_tries: 3,
            default_ban_time: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl AddressBookConfig {
    /// Testing config with small tables and a fixed secret
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Self {
        Self {
            secret: Secret::from(0xA11CE_u64),
            new_bucket_count: 16,
            new_bucket_size: 4,
            eviction_threshold: Duration::from_secs(60 * 60),
            tried_bucket_count: 8,
            tried_bucket_size: 4,
            max_reconnect_tries: 3,
            default_ban_time: Duration::from_secs(60),
        }
    }

    /// Shape of the New table.
    pub fn new_table_config(&self) -> TableConfig {
        TableConfig::new(self.new_bucket_count, self.new_bucket_size)
    }

    /// Shape of the Tried table.
    pub fn tried_table_config(&self) -> TableConfig {
        TableConfig::new(self.tried_bucket_count, self.tried_bucket_size)
    }

    /// Reject values that would leave a table without room or make Tried
    /// entries undroppable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.new_table_config().validate()?;
        self.tried_table_config().validate()?;
        if self.max_reconnect_tries == 0 {
            return Err(ConfigError::Invalid(
                "max_reconnect_tries must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Reference peer collections supplied at start-up.
///
/// Read-only for the lifetime of the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerLists {
    /// IPs that are never admitted.
    pub blacklisted_ips: Vec<IpAddr>,
    /// Bootstrap nodes.
    pub seed_peers: Vec<PeerInfo>,
    /// Peers the node always keeps.
    pub fixed_peers: Vec<PeerInfo>,
    /// Trusted peers.
    pub whitelisted_peers: Vec<PeerInfo>,
    /// Peers known from an earlier run.
    pub previous_peers: Vec<PeerInfo>,
}
