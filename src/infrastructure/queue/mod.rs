//! # Delivery Queue Infrastructure
//!
//! In-memory durable queue, the delivery worker loop, and the scheduled job
//! runner.

pub mod in_memory;
pub mod scheduler;
pub mod worker;

pub use in_memory::InMemoryDeliveryQueue;
pub use scheduler::{JobError, JobScheduler, ScheduledJob};
pub use worker::DeliveryWorker;
