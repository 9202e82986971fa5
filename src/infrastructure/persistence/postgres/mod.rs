//! # PostgreSQL Persistence
//!
//! PostgreSQL-backed trade store using sqlx.

pub mod trade_store;

pub use trade_store::PostgresTradeStore;
