//! Configuration Provider Adapters

#[cfg(feature = "toml-config")]
mod file;

#[cfg(feature = "toml-config")]
pub use file::TomlConfigProvider;

use crate::domain::{AddressBookConfig, PeerLists};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - In-memory config for testing/development
// ============================================================================

/// Static configuration provider.
///
/// Useful for testing and embedding. For production, use
/// `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: AddressBookConfig,
    lists: PeerLists,
}

impl StaticConfigProvider {
    /// Default config (fresh random secret) and empty peer lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given address book config.
    #[must_use]
    pub fn with_config(mut self, config: AddressBookConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given reference peer lists.
    #[must_use]
    pub fn with_peer_lists(mut self, lists: PeerLists) -> Self {
        self.lists = lists;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn address_book_config(&self) -> AddressBookConfig {
        self.config.clone()
    }

    fn peer_lists(&self) -> PeerLists {
        self.lists.clone()
    }
}
