//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** APIs the address book exposes to the node
//! - **Driven Ports (Outbound):** time, randomness and configuration it
//!   requires from adapters

pub mod inbound;
pub mod outbound;

pub use inbound::AddressBookApi;
pub use outbound::{ConfigProvider, RandomSource, TimeSource};
