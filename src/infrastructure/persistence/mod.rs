//! # Persistence Layer
//!
//! Trade store and roster directory implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryRosterDirectory, InMemoryTradeStore};
pub use postgres::PostgresTradeStore;
