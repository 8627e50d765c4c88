//! Address table configuration.

use crate::domain::ConfigError;

/// Shape of one address table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of buckets
    pub bucket_count: usize,
    /// Maximum entries per bucket
    pub bucket_size: usize,
}

impl TableConfig {
    /// Create a table shape.
    pub fn new(bucket_count: usize, bucket_size: usize) -> Self {
        Self {
            bucket_count,
            bucket_size,
        }
    }

    /// Reject shapes that leave no room for any entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_count == 0 {
            return Err(ConfigError::Invalid("bucket_count must be > 0".into()));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket_size must be > 0".into()));
        }
        Ok(())
    }

    /// Total number of entries the table can hold.
    pub fn capacity(&self) -> usize {
        self.bucket_count.saturating_mul(self.bucket_size)
    }
}
