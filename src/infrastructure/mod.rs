//! # Infrastructure Layer
//!
//! Implementations of the application-layer ports: trade stores, roster
//! directories, delivery queues, workers, the scheduled job runner, and the
//! renderer/transport adapters behind notification delivery.

pub mod events;
pub mod notify;
pub mod persistence;
pub mod queue;
