//! # Adapters
//!
//! Concrete implementations of the driven ports:
//!
//! - `time` - system clock
//! - `random` - seeded `StdRng` and a fixed source for tests
//! - `config` - static and TOML configuration providers (TOML requires
//!   feature `toml-config`)

pub mod config;
pub mod random;
pub mod time;

pub use config::StaticConfigProvider;
#[cfg(feature = "toml-config")]
pub use config::TomlConfigProvider;
pub use random::{FixedRandomSource, SeededRandomSource};
pub use time::SystemTimeSource;
