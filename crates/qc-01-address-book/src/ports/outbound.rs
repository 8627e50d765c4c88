//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces the address book **requires** the host
//! application to implement.

use std::sync::Arc;

use crate::domain::{AddressBookConfig, PeerLists, Timestamp};

/// Abstract interface for wall-clock time.
///
/// Entry ages (`date_added`) are measured with it. Production uses system
/// time; tests use fixed or manually advanced timestamps.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct SystemTimeSource;
///
/// impl TimeSource for SystemTimeSource {
///     fn now(&self) -> Timestamp {
///         let secs = std::time::SystemTime::now()
///             .duration_since(std::time::UNIX_EPOCH)
///             .map(|d| d.as_secs())
///             .unwrap_or(0);
///         Timestamp::new(secs)
///     }
/// }
/// ```
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Source of uniform random indices for eviction and sampling.
///
/// Injected so eviction decisions are reproducible under test.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the book is shared across tasks
/// behind a lock and may hold the source in several places.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..max`. Returns `0` when `max` is `0`.
    fn random_usize(&self, max: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for Arc<R> {
    fn random_usize(&self, max: usize) -> usize {
        (**self).random_usize(max)
    }
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, static values, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Address book tunables.
    fn address_book_config(&self) -> AddressBookConfig;

    /// Reference peer lists (blacklist, seed, fixed, whitelisted, previous).
    fn peer_lists(&self) -> PeerLists;
}
