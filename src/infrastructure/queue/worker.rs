//! # Delivery Worker
//!
//! Pull -> render -> send -> ack loop draining one named queue.
//!
//! Failed deliveries are nacked and logged with structured context; the
//! queue redelivers them, so delivery is at-least-once and transports must
//! tolerate duplicates. Shutdown is cooperative through a
//! [`CancellationToken`]; on cancellation the worker recovers its
//! outstanding deliveries so nothing is stranded in the unacked map.

use crate::application::services::queue::{Delivery, DeliveryQueue};
use crate::infrastructure::notify::{MessageRenderer, Transport};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Worker draining one delivery queue through a renderer and a transport.
#[derive(Debug)]
pub struct DeliveryWorker {
    queue: Arc<dyn DeliveryQueue>,
    renderer: Arc<dyn MessageRenderer>,
    transport: Arc<dyn Transport>,
    queue_name: String,
    batch_size: usize,
    poll_interval: Duration,
}

impl DeliveryWorker {
    /// Creates a worker for the named queue.
    #[must_use]
    pub fn new(
        queue: Arc<dyn DeliveryQueue>,
        renderer: Arc<dyn MessageRenderer>,
        transport: Arc<dyn Transport>,
        queue_name: impl Into<String>,
        batch_size: usize,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            renderer,
            transport,
            queue_name: queue_name.into(),
            batch_size: batch_size.max(1),
            poll_interval,
        }
    }

    /// Runs the delivery loop until the token is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(queue = %self.queue_name, "delivery worker started");
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                () = sleep(self.poll_interval) => {
                    self.drain_once().await;
                }
            }
        }

        // Outstanding deliveries would otherwise sit unacked forever.
        match self.queue.recover(&self.queue_name).await {
            Ok(0) => {}
            Ok(recovered) => {
                info!(queue = %self.queue_name, recovered, "requeued unacked deliveries on shutdown");
            }
            Err(e) => {
                warn!(queue = %self.queue_name, error = %e, "failed to recover queue on shutdown");
            }
        }
        info!(queue = %self.queue_name, "delivery worker stopped");
    }

    /// Pulls one batch and delivers each message.
    async fn drain_once(&self) {
        let deliveries = match self.queue.pull(&self.queue_name, self.batch_size).await {
            Ok(deliveries) => deliveries,
            Err(e) => {
                warn!(queue = %self.queue_name, error = %e, "pull failed");
                return;
            }
        };

        for delivery in deliveries {
            self.deliver(delivery).await;
        }
    }

    async fn deliver(&self, delivery: Delivery) {
        let message = &delivery.message;
        let rendered =
            self.renderer
                .render(message.kind, &message.trade, &message.recipient);

        match self
            .transport
            .send(&message.recipient, &rendered.subject, &rendered.body)
            .await
        {
            Ok(()) => {
                debug!(
                    queue = %self.queue_name,
                    message_id = %message.message_id,
                    kind = %message.kind,
                    to = %message.recipient.address(),
                    "notification delivered"
                );
                if let Err(e) = self.queue.ack(&self.queue_name, delivery.tag).await {
                    warn!(queue = %self.queue_name, tag = delivery.tag, error = %e, "ack failed");
                }
            }
            Err(e) => {
                error!(
                    queue = %self.queue_name,
                    message_id = %message.message_id,
                    kind = %message.kind,
                    trade_id = %message.trade.trade.id(),
                    to = %message.recipient.address(),
                    error = %e,
                    "delivery failed; message will be redelivered"
                );
                if let Err(e) = self.queue.nack(&self.queue_name, delivery.tag).await {
                    warn!(queue = %self.queue_name, tag = delivery.tag, error = %e, "nack failed");
                }
            }
        }
    }
}
