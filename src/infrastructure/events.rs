//! # Event Publishing
//!
//! Tracing-backed reference implementation of [`EventPublisher`].
//!
//! Lifecycle events land in the structured log stream; a real deployment
//! would swap in a message-bus publisher behind the same port.

use crate::application::use_cases::EventPublisher;
use crate::domain::events::TradeEvent;
use async_trait::async_trait;
use tracing::info;

/// Publishes domain events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    /// Creates the publisher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: TradeEvent) -> Result<(), String> {
        info!(
            event_id = %event.event_id(),
            event_type = event.event_type(),
            trade_id = %event.trade_id(),
            occurred_at = %event.occurred_at(),
            "domain event published"
        );
        Ok(())
    }
}
