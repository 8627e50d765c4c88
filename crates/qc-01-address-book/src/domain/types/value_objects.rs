//! Value Objects for the Address Book

use std::fmt;

use super::errors::ConfigError;

/// Which of the two address tables an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Addresses heard about but never connected to.
    New,
    /// Addresses connected to successfully at least once.
    Tried,
}

impl TableKind {
    /// Domain-separation byte mixed into bucket hashes.
    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Tried => 1,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Tried => write!(f, "tried"),
        }
    }
}

/// 128-bit bucket-placement key.
///
/// Generated once per node lifetime (or loaded from config) and never
/// transmitted, so outside observers cannot predict which bucket an address
/// lands in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secret([u8; 16]);

impl Secret {
    /// Length of the hex encoding.
    pub const HEX_LEN: usize = 32;

    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Fresh secret from the thread-local CSPRNG.
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Parse a 32-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let bytes = hex::decode(s.trim()).map_err(|e| ConfigError::InvalidSecret(e.to_string()))?;
        let bytes: [u8; 16] = bytes.try_into().map_err(|v: Vec<u8>| {
            ConfigError::InvalidSecret(format!("expected 16 bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Hex encoding, for persisting the secret across restarts.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The two SipHash key halves.
    pub(crate) fn sip_keys(&self) -> (u64, u64) {
        let mut k0 = [0u8; 8];
        let mut k1 = [0u8; 8];
        k0.copy_from_slice(&self.0[..8]);
        k1.copy_from_slice(&self.0[8..]);
        (u64::from_le_bytes(k0), u64::from_le_bytes(k1))
    }
}

impl From<u64> for Secret {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&value.to_le_bytes());
        bytes[8..].copy_from_slice(&value.rotate_left(32).to_le_bytes());
        Self(bytes)
    }
}

// Never print the key itself.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}
