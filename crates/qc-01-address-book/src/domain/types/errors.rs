//! Domain Errors for the Address Book

use thiserror::Error;

use super::entities::PeerEntry;

/// Errors propagated by table and address book operations.
///
/// Expected churn outcomes (peer not found, downgrade not applicable, ban on
/// a protected address) are plain `bool`/outcome values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressBookError {
    /// The address is already tracked in the New or Tried table. Carries the
    /// stored entry so the caller can decide to update it instead.
    #[error("peer {} is already tracked", .0.address)]
    ExistingPeer(Box<PeerEntry>),
}

impl AddressBookError {
    /// The entry that caused the error.
    pub fn entry(&self) -> &PeerEntry {
        match self {
            Self::ExistingPeer(entry) => entry,
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A peer address or IP in a list could not be parsed.
    #[error("invalid address in config: {0}")]
    InvalidAddress(String),

    /// The bucket secret is not 32 hex characters.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// A parameter is out of range.
    #[error("invalid parameter: {0}")]
    Invalid(String),
}
