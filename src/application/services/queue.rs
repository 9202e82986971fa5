//! # Delivery Queue Port
//!
//! Durable named queues decoupling notification dispatch from delivery.
//!
//! The dispatcher publishes [`QueuedMessage`]s; workers pull bounded batches,
//! deliver, and ack. Unacked deliveries survive in an unacked map and are
//! redelivered after a nack or a [`recover`](DeliveryQueue::recover) (the
//! worker-crash path). Delivery is at-least-once; transports must tolerate
//! duplicates.

use crate::application::services::retry::Retryable;
use crate::domain::entities::HydratedTrade;
use crate::domain::value_objects::{OwnerId, TeamId, Timestamp, TradeStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Queue carrying per-owner email notifications.
pub const QUEUE_EMAIL: &str = "email";

/// Queue carrying broadcast chat announcements.
pub const QUEUE_CHAT_ANNOUNCE: &str = "chat-announce";

/// Delivery queue error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The named queue does not exist.
    #[error("unknown queue: {0}")]
    UnknownQueue(String),

    /// The delivery tag is not outstanding on this queue.
    #[error("unknown delivery tag: {0}")]
    UnknownTag(u64),

    /// Backend failure.
    #[error("queue backend error: {0}")]
    Backend(String),
}

impl Retryable for QueueError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// The notification class a queued message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Proposal sent to the recipient teams.
    TradeRequested,
    /// A recipient declined the proposal.
    TradeDeclined,
    /// Every recipient team consented.
    TradeAccepted,
    /// Accepted trade handed to the commissioner.
    TradeSubmitted,
}

impl NotificationKind {
    /// The trade status this notification kind is valid for.
    ///
    /// Dispatch re-fetches the trade and refuses to enqueue when the live
    /// status disagrees.
    #[must_use]
    pub const fn expected_status(&self) -> TradeStatus {
        match self {
            Self::TradeRequested => TradeStatus::Requested,
            Self::TradeDeclined => TradeStatus::Rejected,
            Self::TradeAccepted => TradeStatus::Accepted,
            Self::TradeSubmitted => TradeStatus::Submitted,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TradeRequested => "TRADE_REQUESTED",
            Self::TradeDeclined => "TRADE_DECLINED",
            Self::TradeAccepted => "TRADE_ACCEPTED",
            Self::TradeSubmitted => "TRADE_SUBMITTED",
        };
        write!(f, "{}", s)
    }
}

/// Who a queued message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientContext {
    /// One individual team owner.
    Owner {
        /// The owner's identity.
        owner_id: OwnerId,
        /// The team the owner belongs to.
        team_id: TeamId,
        /// Delivery address.
        email: String,
        /// Name used in the rendered message.
        display_name: String,
    },
    /// A shared announce channel.
    Channel {
        /// Channel name.
        name: String,
    },
}

impl RecipientContext {
    /// Returns a short address string for logs.
    #[must_use]
    pub fn address(&self) -> String {
        match self {
            Self::Owner { email, .. } => email.clone(),
            Self::Channel { name } => format!("#{name}"),
        }
    }
}

/// One notification waiting for delivery.
///
/// Carries a full hydrated snapshot so workers render without re-fetching;
/// the snapshot reflects the trade at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedMessage {
    /// Unique message identifier.
    pub message_id: Uuid,
    /// The notification class.
    pub kind: NotificationKind,
    /// Hydrated trade snapshot at dispatch time.
    pub trade: HydratedTrade,
    /// The addressee.
    pub recipient: RecipientContext,
    /// When the message was enqueued.
    pub enqueued_at: Timestamp,
}

impl QueuedMessage {
    /// Creates a new queued message with a fresh identifier.
    #[must_use]
    pub fn new(kind: NotificationKind, trade: HydratedTrade, recipient: RecipientContext) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            kind,
            trade,
            recipient,
            enqueued_at: Timestamp::now(),
        }
    }
}

/// One pulled message with its acknowledgement tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Tag identifying this delivery for ack/nack.
    pub tag: u64,
    /// The pulled message.
    pub message: QueuedMessage,
}

/// Port for durable named delivery queues.
#[async_trait]
pub trait DeliveryQueue: Send + Sync + fmt::Debug {
    /// Appends a message to the named queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue does not exist or the backend fails.
    async fn publish(&self, queue: &str, message: QueuedMessage) -> Result<(), QueueError>;

    /// Pulls up to `max` messages, bounded by the consumer's unacked window.
    ///
    /// Pulled messages stay invisible to other consumers until acked or
    /// nacked.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue does not exist or the backend fails.
    async fn pull(&self, queue: &str, max: usize) -> Result<Vec<Delivery>, QueueError>;

    /// Acknowledges a delivery, removing it permanently.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not outstanding.
    async fn ack(&self, queue: &str, tag: u64) -> Result<(), QueueError>;

    /// Negatively acknowledges a delivery, requeueing it for redelivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not outstanding.
    async fn nack(&self, queue: &str, tag: u64) -> Result<(), QueueError>;

    /// Requeues every unacked delivery. Returns the number requeued.
    ///
    /// Used after a worker crash, when outstanding tags will never be acked.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue does not exist or the backend fails.
    async fn recover(&self, queue: &str) -> Result<usize, QueueError>;
}
