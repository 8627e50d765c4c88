//! TOML configuration file loading.

use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{AddressBookConfig, ConfigError, PeerAddress, PeerInfo, PeerLists, Secret};
use crate::ports::ConfigProvider;

// ============================================================================
// TomlConfigProvider - Production Config Loading
// ============================================================================

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    address_book: AddressBookSection,
    #[serde(default)]
    peers: PeersSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AddressBookSection {
    secret: Option<String>,
    new_bucket_count: Option<usize>,
    new_bucket_size: Option<usize>,
    eviction_threshold_secs: Option<u64>,
    tried_bucket_count: Option<usize>,
    tried_bucket_size: Option<usize>,
    max_reconnect_tries: Option<u32>,
    default_ban_time_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PeersSection {
    #[serde(default)]
    blacklisted_ips: Vec<String>,
    #[serde(default)]
    seed: Vec<String>,
    #[serde(default)]
    fixed: Vec<String>,
    #[serde(default)]
    whitelisted: Vec<String>,
    #[serde(default)]
    previous: Vec<String>,
}

/// TOML-based configuration provider.
///
/// Every key is optional and falls back to [`AddressBookConfig::default`].
/// Without a `secret` a random one is generated at load time.
///
/// # Config File Format
///
/// ```toml
/// [address_book]
/// secret = "000102030405060708090a0b0c0d0e0f"
/// new_bucket_count = 128
/// new_bucket_size = 32
/// eviction_threshold_secs = 86400
/// tried_bucket_count = 64
/// tried_bucket_size = 32
/// max_reconnect_tries = 3
/// default_ban_time_secs = 86400
///
/// [peers]
/// blacklisted_ips = ["203.0.113.7"]
/// seed = ["198.51.100.1:4000"]
/// fixed = ["198.51.100.2:4000"]
/// whitelisted = ["[2001:db8::1]:4000"]
/// previous = ["192.0.2.10:4000"]
/// ```
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    config: AddressBookConfig,
    lists: PeerLists,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML or unknown keys, `InvalidSecret` and
    /// `InvalidAddress` for bad values, `Invalid` if the result fails
    /// validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let ab = file.address_book;
        let defaults = AddressBookConfig::default();
        let secret = match ab.secret.as_deref() {
            Some(hex) => Secret::from_hex(hex)?,
            None => defaults.secret,
        };
        let config = AddressBookConfig {
            secret,
            new_bucket_count: ab.new_bucket_count.unwrap_or(defaults.new_bucket_count),
            new_bucket_size: ab.new_bucket_size.unwrap_or(defaults.new_bucket_size),
            eviction_threshold: ab
                .eviction_threshold_secs
                .map_or(defaults.eviction_threshold, Duration::from_secs),
            tried_bucket_count: ab.tried_bucket_count.unwrap_or(defaults.tried_bucket_count),
            tried_bucket_size: ab.tried_bucket_size.unwrap_or(defaults.tried_bucket_size),
            max_reconnect_tries: ab
                .max_reconnect_tries
                .unwrap_or(defaults.max_reconnect_tries),
            default_ban_time: ab
                .default_ban_time_secs
                .map_or(defaults.default_ban_time, Duration::from_secs),
        };
        config.validate()?;

        let peers = file.peers;
        let lists = PeerLists {
            blacklisted_ips: peers
                .blacklisted_ips
                .iter()
                .map(|s| parse_ip(s))
                .collect::<Result<_, _>>()?,
            seed_peers: parse_peers(&peers.seed)?,
            fixed_peers: parse_peers(&peers.fixed)?,
            whitelisted_peers: parse_peers(&peers.whitelisted)?,
            previous_peers: parse_peers(&peers.previous)?,
        };

        Ok(Self { config, lists })
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn address_book_config(&self) -> AddressBookConfig {
        self.config.clone()
    }

    fn peer_lists(&self) -> PeerLists {
        self.lists.clone()
    }
}

fn parse_ip(s: &str) -> Result<IpAddr, ConfigError> {
    s.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(s.to_string()))
}

fn parse_peers(entries: &[String]) -> Result<Vec<PeerInfo>, ConfigError> {
    entries
        .iter()
        .map(|s| {
            s.trim()
                .parse::<PeerAddress>()
                .map(PeerInfo::new)
                .map_err(|_| ConfigError::InvalidAddress(s.clone()))
        })
        .collect()
}
