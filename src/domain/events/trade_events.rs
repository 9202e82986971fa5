//! # Trade Lifecycle Events
//!
//! One event per lifecycle milestone. Events are immutable facts: they carry
//! the ids needed to reconstruct context, never the full aggregate.

use crate::domain::value_objects::{EventId, ParticipantId, Timestamp, TradeId};
use serde::{Deserialize, Serialize};

/// A trade lifecycle milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeEvent {
    /// The proposal was sent to its recipients.
    TradeRequested {
        /// Unique event identifier.
        event_id: EventId,
        /// The trade concerned.
        trade_id: TradeId,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// Every recipient team has consented.
    TradeAccepted {
        /// Unique event identifier.
        event_id: EventId,
        /// The trade concerned.
        trade_id: TradeId,
        /// Participants that consented, in acceptance order.
        accepted_by: Vec<ParticipantId>,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// A recipient declined the proposal.
    TradeRejected {
        /// Unique event identifier.
        event_id: EventId,
        /// The trade concerned.
        trade_id: TradeId,
        /// The participant that declined.
        declined_by: ParticipantId,
        /// Optional free-form reason.
        reason: Option<String>,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// An accepted trade was handed to the commissioner.
    TradeSubmitted {
        /// Unique event identifier.
        event_id: EventId,
        /// The trade concerned.
        trade_id: TradeId,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
}

impl TradeEvent {
    /// Creates a `TradeRequested` event.
    #[must_use]
    pub fn requested(trade_id: TradeId) -> Self {
        Self::TradeRequested {
            event_id: EventId::new_v4(),
            trade_id,
            occurred_at: Timestamp::now(),
        }
    }

    /// Creates a `TradeAccepted` event.
    #[must_use]
    pub fn accepted(trade_id: TradeId, accepted_by: Vec<ParticipantId>) -> Self {
        Self::TradeAccepted {
            event_id: EventId::new_v4(),
            trade_id,
            accepted_by,
            occurred_at: Timestamp::now(),
        }
    }

    /// Creates a `TradeRejected` event.
    #[must_use]
    pub fn rejected(trade_id: TradeId, declined_by: ParticipantId, reason: Option<String>) -> Self {
        Self::TradeRejected {
            event_id: EventId::new_v4(),
            trade_id,
            declined_by,
            reason,
            occurred_at: Timestamp::now(),
        }
    }

    /// Creates a `TradeSubmitted` event.
    #[must_use]
    pub fn submitted(trade_id: TradeId) -> Self {
        Self::TradeSubmitted {
            event_id: EventId::new_v4(),
            trade_id,
            occurred_at: Timestamp::now(),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::TradeRequested { event_id, .. }
            | Self::TradeAccepted { event_id, .. }
            | Self::TradeRejected { event_id, .. }
            | Self::TradeSubmitted { event_id, .. } => *event_id,
        }
    }

    /// Returns the trade this event concerns.
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        match self {
            Self::TradeRequested { trade_id, .. }
            | Self::TradeAccepted { trade_id, .. }
            | Self::TradeRejected { trade_id, .. }
            | Self::TradeSubmitted { trade_id, .. } => *trade_id,
        }
    }

    /// Returns when the event occurred.
    #[must_use]
    pub fn occurred_at(&self) -> Timestamp {
        match self {
            Self::TradeRequested { occurred_at, .. }
            | Self::TradeAccepted { occurred_at, .. }
            | Self::TradeRejected { occurred_at, .. }
            | Self::TradeSubmitted { occurred_at, .. } => *occurred_at,
        }
    }

    /// Returns the stable event-type tag used in logs and storage.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::TradeRequested { .. } => "TRADE_REQUESTED",
            Self::TradeAccepted { .. } => "TRADE_ACCEPTED",
            Self::TradeRejected { .. } => "TRADE_REJECTED",
            Self::TradeSubmitted { .. } => "TRADE_SUBMITTED",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn constructors_assign_fresh_event_ids() {
        let trade_id = TradeId::new_v4();
        let a = TradeEvent::requested(trade_id);
        let b = TradeEvent::requested(trade_id);
        assert_ne!(a.event_id(), b.event_id());
        assert_eq!(a.trade_id(), trade_id);
    }

    #[test]
    fn event_type_tags() {
        let trade_id = TradeId::new_v4();
        let participant = ParticipantId::new_v4();
        assert_eq!(TradeEvent::requested(trade_id).event_type(), "TRADE_REQUESTED");
        assert_eq!(
            TradeEvent::accepted(trade_id, vec![participant]).event_type(),
            "TRADE_ACCEPTED"
        );
        assert_eq!(
            TradeEvent::rejected(trade_id, participant, None).event_type(),
            "TRADE_REJECTED"
        );
        assert_eq!(TradeEvent::submitted(trade_id).event_type(), "TRADE_SUBMITTED");
    }

    #[test]
    fn serde_carries_type_tag() {
        let event = TradeEvent::rejected(
            TradeId::new_v4(),
            ParticipantId::new_v4(),
            Some("unbalanced".to_string()),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TRADE_REJECTED");
        assert_eq!(json["reason"], "unbalanced");
    }
}
