//! Test utilities for the address book.
//!
//! Deterministic time sources for tests. Enable with the `test-utils`
//! feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use qc_01_address_book::test_utils::FixedTimeSource;
//! use qc_01_address_book::TimeSource;
//!
//! let time_source = FixedTimeSource::new(1000);
//! assert_eq!(time_source.now().as_secs(), 1000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::Timestamp;
use crate::ports::outbound::TimeSource;

/// A time source that returns a fixed timestamp.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: u64,
}

impl FixedTimeSource {
    /// Create a new fixed time source with the given timestamp (in seconds).
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }

    /// Get the configured timestamp value.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }
}

/// A time source advanced by hand.
///
/// Uses an `AtomicU64` so it can be shared with the book behind an `Arc`
/// while the test moves time forward.
///
/// ```rust,ignore
/// use qc_01_address_book::test_utils::ManualTimeSource;
/// use qc_01_address_book::TimeSource;
///
/// let time = ManualTimeSource::new(100);
/// time.advance(50);
/// assert_eq!(time.now().as_secs(), 150);
/// ```
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    time: AtomicU64,
}

impl ManualTimeSource {
    /// Start the clock at `initial` seconds.
    pub fn new(initial: u64) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to `secs`.
    pub fn set(&self, secs: u64) {
        self.time.store(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.time.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_source_returns_configured_value() {
        let source = FixedTimeSource::new(1000);
        assert_eq!(source.now().as_secs(), 1000);
        assert_eq!(source.timestamp(), 1000);
    }

    #[test]
    fn test_manual_time_source_moves() {
        let source = ManualTimeSource::new(10);
        source.advance(5);
        assert_eq!(source.now().as_secs(), 15);
        source.set(3);
        assert_eq!(source.now().as_secs(), 3);
    }
}
