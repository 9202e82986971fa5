//! # In-Memory Persistence
//!
//! Thread-safe in-memory implementations for tests and the default wiring.

pub mod roster_directory;
pub mod trade_store;

pub use roster_directory::InMemoryRosterDirectory;
pub use trade_store::InMemoryTradeStore;
