//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides:
//! - [`authorization`]: the capability check for trade actions
//! - [`dispatcher`]: notification fan-out into the delivery queues
//! - [`queue`]: the delivery queue port and message types
//! - [`retry`]: exponential backoff for transient failures

pub mod authorization;
pub mod dispatcher;
pub mod queue;
pub mod retry;

pub use authorization::{
    Actor, ActorContext, TradeAction, acting_participant, authorize, resolve_actor,
};
pub use dispatcher::NotificationDispatcher;
pub use queue::{
    Delivery, DeliveryQueue, NotificationKind, QUEUE_CHAT_ANNOUNCE, QUEUE_EMAIL, QueueError,
    QueuedMessage, RecipientContext,
};
pub use retry::{RetryError, RetryPolicy, RetryResult, Retryable, execute_with_retry};
