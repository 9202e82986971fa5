//! # Trade DTOs
//!
//! Data transfer objects for trade operations.
//!
//! These DTOs decouple the API layer from the domain layer, providing
//! validation and serialization for trade-related requests and responses.

use crate::domain::entities::{Participant, Trade, TradeItem};
use crate::domain::value_objects::{
    AssetKind, OwnerId, ParticipantId, ParticipantRole, TeamId, Timestamp, TradeId, TradeStatus,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One participant entry in a create or update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    /// The team to bind to the trade.
    pub team_id: TeamId,
    /// The role the team holds.
    pub role: ParticipantRole,
}

/// One item entry in a create or update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Kind of the referenced asset.
    pub asset_kind: AssetKind,
    /// Opaque reference to the player or draft pick record.
    pub entity_id: Uuid,
    /// The team giving the asset up.
    pub sender_team: TeamId,
    /// The team receiving the asset.
    pub recipient_team: TeamId,
}

/// Request to create a new trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeRequest {
    /// Initial status; defaults to Draft when omitted.
    #[serde(default)]
    pub status: Option<TradeStatus>,
    /// Participants to bind to the trade.
    pub participants: Vec<ParticipantSpec>,
    /// Items changing hands.
    pub items: Vec<ItemSpec>,
}

impl CreateTradeRequest {
    /// Creates a new CreateTradeRequest.
    #[must_use]
    pub fn new(
        status: Option<TradeStatus>,
        participants: Vec<ParticipantSpec>,
        items: Vec<ItemSpec>,
    ) -> Self {
        Self {
            status,
            participants,
            items,
        }
    }

    /// Returns the effective initial status.
    #[must_use]
    pub fn initial_status(&self) -> TradeStatus {
        self.status.unwrap_or(TradeStatus::Draft)
    }

    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// Returns an error message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.participants.is_empty() {
            return Err("participants cannot be empty".to_string());
        }
        if self.items.is_empty() {
            return Err("items cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds the trade aggregate from this request.
    ///
    /// # Errors
    ///
    /// Returns an error message if the aggregate invariants are violated.
    pub fn to_domain(&self) -> Result<Trade, String> {
        let mut builder = Trade::builder(self.initial_status());
        for p in &self.participants {
            builder = builder.participant(p.team_id, p.role);
        }
        for i in &self.items {
            builder = builder.item(i.asset_kind, i.entity_id, i.sender_team, i.recipient_team);
        }
        builder.build().map_err(|e| e.to_string())
    }
}

impl fmt::Display for CreateTradeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateTradeRequest {{ status: {}, participants: {}, items: {} }}",
            self.initial_status(),
            self.participants.len(),
            self.items.len()
        )
    }
}

/// Request for the combined trade update.
///
/// Every section is optional; sections the actor is not allowed to apply are
/// skipped silently while the rest of the update proceeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTradeRequest {
    /// Target status; only the advance to Requested is accepted here.
    #[serde(default)]
    pub status: Option<TradeStatus>,
    /// Replacement participants (wholesale, draft only).
    #[serde(default)]
    pub participants: Option<Vec<ParticipantSpec>>,
    /// Replacement items (wholesale, draft only).
    #[serde(default)]
    pub items: Option<Vec<ItemSpec>>,
    /// Declining participant; foreign ids are ignored without effect.
    #[serde(default)]
    pub declined_by: Option<ParticipantId>,
    /// Free-form decline reason.
    #[serde(default)]
    pub declined_reason: Option<String>,
}

impl UpdateTradeRequest {
    /// Returns true if the request carries a content replacement.
    #[must_use]
    pub fn has_content_changes(&self) -> bool {
        self.participants.is_some() || self.items.is_some()
    }
}

/// Request to record one recipient's consent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceptTradeRequest {
    /// Acting participant; required for admins, ignored for team owners.
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
}

/// Request to decline a trade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectTradeRequest {
    /// Acting participant; required for admins, ignored for team owners.
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    /// Free-form decline reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body for the decline dispatch endpoint.
///
/// The declining individual is excluded from the fan-out; stored trade data
/// only carries the declining participant, so the owner id travels with the
/// dispatch request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclineDispatchRequest {
    /// The individual owner that declined, excluded from notification.
    #[serde(default)]
    pub declined_by_owner: Option<OwnerId>,
}

/// Acknowledgement returned by the dispatch endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchAccepted {
    /// The trade the dispatch concerns.
    pub trade_id: TradeId,
    /// Number of messages enqueued.
    pub enqueued: usize,
}

/// Response carrying a full trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    /// Trade identifier.
    pub id: TradeId,
    /// Current status.
    pub status: TradeStatus,
    /// Participants bound to the trade.
    pub participants: Vec<Participant>,
    /// Items changing hands.
    pub items: Vec<TradeItem>,
    /// Participants that consented, in acceptance order.
    pub accepted_by: Vec<ParticipantId>,
    /// When the trade became fully accepted.
    pub accepted_on: Option<Timestamp>,
    /// The declining participant, if rejected.
    pub declined_by: Option<ParticipantId>,
    /// The decline reason, if any.
    pub declined_reason: Option<String>,
    /// Version for optimistic locking.
    pub version: u64,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

impl From<&Trade> for TradeResponse {
    fn from(trade: &Trade) -> Self {
        Self {
            id: trade.id(),
            status: trade.status(),
            participants: trade.participants().to_vec(),
            items: trade.items().to_vec(),
            accepted_by: trade.accepted_by().to_vec(),
            accepted_on: trade.accepted_on(),
            declined_by: trade.declined_by(),
            declined_reason: trade.declined_reason().map(str::to_string),
            version: trade.version(),
            created_at: trade.created_at(),
            updated_at: trade.updated_at(),
        }
    }
}

impl fmt::Display for TradeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TradeResponse {{ id: {}, status: {} }}", self.id, self.status)
    }
}
