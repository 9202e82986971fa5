//! # In-Memory Delivery Queue
//!
//! In-memory implementation of [`DeliveryQueue`] with named queues and an
//! unacked map.
//!
//! Pulled messages move from the ready queue into an unacked map keyed by
//! delivery tag; ack removes them permanently, nack and
//! [`recover`](DeliveryQueue::recover) requeue them at the front. Pulls are
//! bounded by the prefetch limit: a consumer holding `prefetch` unacked
//! deliveries gets nothing more until it acks or nacks.

use crate::application::services::queue::{Delivery, DeliveryQueue, QueueError, QueuedMessage};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// One named queue: ready messages plus outstanding deliveries.
#[derive(Debug, Default)]
struct NamedQueue {
    ready: VecDeque<QueuedMessage>,
    unacked: BTreeMap<u64, QueuedMessage>,
}

/// In-memory implementation of [`DeliveryQueue`].
///
/// Queues must be declared up front with [`declare`](Self::declare);
/// publishing or pulling on an undeclared name is an error rather than a
/// silent drop.
///
/// # Examples
///
/// ```
/// use league_trades::application::services::queue::QUEUE_EMAIL;
/// use league_trades::infrastructure::queue::InMemoryDeliveryQueue;
///
/// # async fn example() {
/// let queue = InMemoryDeliveryQueue::new(10);
/// queue.declare(QUEUE_EMAIL).await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryDeliveryQueue {
    queues: Arc<Mutex<HashMap<String, NamedQueue>>>,
    next_tag: Arc<AtomicU64>,
    prefetch: usize,
}

impl InMemoryDeliveryQueue {
    /// Creates a queue client with the given per-queue prefetch limit.
    #[must_use]
    pub fn new(prefetch: usize) -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            next_tag: Arc::new(AtomicU64::new(1)),
            prefetch: prefetch.max(1),
        }
    }

    /// Declares a named queue. Declaring an existing queue is a no-op.
    pub async fn declare(&self, queue: &str) {
        self.queues
            .lock()
            .await
            .entry(queue.to_string())
            .or_default();
    }

    /// Returns the number of ready messages on the named queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue does not exist.
    pub async fn depth(&self, queue: &str) -> Result<usize, QueueError> {
        let queues = self.queues.lock().await;
        queues
            .get(queue)
            .map(|q| q.ready.len())
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))
    }

    /// Returns the number of outstanding unacked deliveries.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue does not exist.
    pub async fn unacked(&self, queue: &str) -> Result<usize, QueueError> {
        let queues = self.queues.lock().await;
        queues
            .get(queue)
            .map(|q| q.unacked.len())
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))
    }
}

#[async_trait]
impl DeliveryQueue for InMemoryDeliveryQueue {
    async fn publish(&self, queue: &str, message: QueuedMessage) -> Result<(), QueueError> {
        let mut queues = self.queues.lock().await;
        let named = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        named.ready.push_back(message);
        Ok(())
    }

    async fn pull(&self, queue: &str, max: usize) -> Result<Vec<Delivery>, QueueError> {
        let mut queues = self.queues.lock().await;
        let named = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;

        // Backpressure: the unacked window caps how much a consumer may
        // hold in flight.
        let window = self.prefetch.saturating_sub(named.unacked.len());
        let take = max.min(window);

        let mut deliveries = Vec::with_capacity(take);
        for _ in 0..take {
            let Some(message) = named.ready.pop_front() else {
                break;
            };
            let tag = self.next_tag.fetch_add(1, Ordering::SeqCst);
            named.unacked.insert(tag, message.clone());
            deliveries.push(Delivery { tag, message });
        }
        Ok(deliveries)
    }

    async fn ack(&self, queue: &str, tag: u64) -> Result<(), QueueError> {
        let mut queues = self.queues.lock().await;
        let named = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        named
            .unacked
            .remove(&tag)
            .map(|_| ())
            .ok_or(QueueError::UnknownTag(tag))
    }

    async fn nack(&self, queue: &str, tag: u64) -> Result<(), QueueError> {
        let mut queues = self.queues.lock().await;
        let named = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        let message = named
            .unacked
            .remove(&tag)
            .ok_or(QueueError::UnknownTag(tag))?;
        named.ready.push_front(message);
        Ok(())
    }

    async fn recover(&self, queue: &str) -> Result<usize, QueueError> {
        let mut queues = self.queues.lock().await;
        let named = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        let count = named.unacked.len();
        // Requeue in tag order so redeliveries keep their original order.
        let unacked = std::mem::take(&mut named.unacked);
        for (_, message) in unacked.into_iter().rev() {
            named.ready.push_front(message);
        }
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::queue::{NotificationKind, RecipientContext};
    use crate::domain::entities::HydratedTrade;
    use crate::domain::value_objects::{ParticipantRole, TeamId, TradeStatus};
    use crate::domain::entities::Trade;
    use crate::domain::value_objects::AssetKind;
    use uuid::Uuid;

    fn message() -> QueuedMessage {
        let creator = TeamId::new_v4();
        let recipient = TeamId::new_v4();
        let trade = Trade::builder(TradeStatus::Requested)
            .participant(creator, ParticipantRole::Creator)
            .participant(recipient, ParticipantRole::Recipient)
            .item(AssetKind::Player, Uuid::new_v4(), creator, recipient)
            .build()
            .unwrap();
        QueuedMessage::new(
            NotificationKind::TradeRequested,
            HydratedTrade::new(trade, vec![]),
            RecipientContext::Channel {
                name: "trades".to_string(),
            },
        )
    }

    async fn declared(prefetch: usize) -> InMemoryDeliveryQueue {
        let queue = InMemoryDeliveryQueue::new(prefetch);
        queue.declare("email").await;
        queue
    }

    #[tokio::test]
    async fn publish_pull_ack() {
        let queue = declared(10).await;
        queue.publish("email", message()).await.unwrap();

        let deliveries = queue.pull("email", 10).await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(queue.depth("email").await.unwrap(), 0);
        assert_eq!(queue.unacked("email").await.unwrap(), 1);

        queue.ack("email", deliveries[0].tag).await.unwrap();
        assert_eq!(queue.unacked("email").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn undeclared_queue_is_an_error() {
        let queue = InMemoryDeliveryQueue::new(10);
        assert!(matches!(
            queue.publish("mail", message()).await,
            Err(QueueError::UnknownQueue(_))
        ));
        assert!(matches!(
            queue.pull("mail", 1).await,
            Err(QueueError::UnknownQueue(_))
        ));
    }

    #[tokio::test]
    async fn nack_requeues_for_redelivery() {
        let queue = declared(10).await;
        let original = message();
        queue.publish("email", original.clone()).await.unwrap();

        let first = queue.pull("email", 1).await.unwrap();
        queue.nack("email", first[0].tag).await.unwrap();

        let second = queue.pull("email", 1).await.unwrap();
        assert_eq!(second[0].message.message_id, original.message_id);
        // A fresh delivery tag each time.
        assert_ne!(second[0].tag, first[0].tag);
    }

    #[tokio::test]
    async fn double_ack_is_unknown_tag() {
        let queue = declared(10).await;
        queue.publish("email", message()).await.unwrap();
        let deliveries = queue.pull("email", 1).await.unwrap();

        queue.ack("email", deliveries[0].tag).await.unwrap();
        assert!(matches!(
            queue.ack("email", deliveries[0].tag).await,
            Err(QueueError::UnknownTag(_))
        ));
    }

    #[tokio::test]
    async fn prefetch_bounds_the_unacked_window() {
        let queue = declared(2).await;
        for _ in 0..5 {
            queue.publish("email", message()).await.unwrap();
        }

        let first = queue.pull("email", 10).await.unwrap();
        assert_eq!(first.len(), 2);

        // Window exhausted until something is acked.
        assert!(queue.pull("email", 10).await.unwrap().is_empty());

        queue.ack("email", first[0].tag).await.unwrap();
        assert_eq!(queue.pull("email", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recover_requeues_all_unacked_in_order() {
        let queue = declared(10).await;
        let a = message();
        let b = message();
        queue.publish("email", a.clone()).await.unwrap();
        queue.publish("email", b.clone()).await.unwrap();
        queue.pull("email", 2).await.unwrap();
        assert_eq!(queue.unacked("email").await.unwrap(), 2);

        let recovered = queue.recover("email").await.unwrap();
        assert_eq!(recovered, 2);
        assert_eq!(queue.unacked("email").await.unwrap(), 0);

        let redelivered = queue.pull("email", 2).await.unwrap();
        assert_eq!(redelivered[0].message.message_id, a.message_id);
        assert_eq!(redelivered[1].message.message_id, b.message_id);
    }
}
