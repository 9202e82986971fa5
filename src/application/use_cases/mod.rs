//! # Use Cases
//!
//! Application use cases implementing the negotiation workflows.
//!
//! Each use case orchestrates domain objects to perform one operation,
//! handling validation, authorization, persistence, and events. The ports
//! they depend on are defined here and implemented in the infrastructure
//! layer.

use crate::application::error::ApplicationError;
use crate::domain::entities::{DraftPick, HydratedTrade, Owner, Participant, Player, Trade, TradeItem};
use crate::domain::errors::DomainError;
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::{
    AssetKind, ItemId, OwnerId, ParticipantId, TeamId, TradeId, TradeStatus,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod accept_trade;
pub mod create_trade;
pub mod delete_trade;
pub mod get_trade;
pub mod reject_trade;
pub mod submit_trade;
pub mod update_trade;


pub use accept_trade::AcceptTradeUseCase;
pub use create_trade::CreateTradeUseCase;
pub use delete_trade::DeleteTradeUseCase;
pub use get_trade::GetTradeUseCase;
pub use reject_trade::RejectTradeUseCase;
pub use submit_trade::SubmitTradeUseCase;
pub use update_trade::UpdateTradeUseCase;

/// Trade store error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No trade with the given id.
    #[error("trade not found: {0}")]
    TradeNotFound(TradeId),

    /// An item's asset could not be resolved during hydration.
    #[error("{kind} {entity_id} not found")]
    AssetNotFound {
        /// Kind of the missing asset.
        kind: AssetKind,
        /// The unresolvable entity reference.
        entity_id: Uuid,
    },

    /// A domain rule failed inside an atomic store operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TradeNotFound(id) => Self::NotFound(format!("trade {id}")),
            StoreError::AssetNotFound { .. } => Self::HydrationError(err.to_string()),
            StoreError::Domain(e) => Self::DomainError(e),
            StoreError::Backend(msg) => Self::RepositoryError(msg),
        }
    }
}

/// Result type for trade store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Port for trade persistence.
///
/// Narrow mutations (`update_status`, `update_declined_by`,
/// `update_accepted_by`) exist for the negotiation engine only; nothing else
/// writes the status or consent fields.
#[async_trait]
pub trait TradeStore: Send + Sync + fmt::Debug {
    /// Persists a new trade with its participants and items in one
    /// transaction, re-reading and re-validating the aggregate before
    /// committing.
    ///
    /// # Errors
    ///
    /// Returns a domain error (aborting the transaction) if the persisted
    /// aggregate fails validation, or a backend error.
    async fn create_trade(&self, trade: &Trade) -> StoreResult<()>;

    /// Fetches a trade by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn get_trade_by_id(&self, id: TradeId) -> StoreResult<Trade>;

    /// Sets the status field. Transition validity is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn update_status(&self, id: TradeId, status: TradeStatus) -> StoreResult<Trade>;

    /// Records a decline: sets the declined fields and the Rejected status
    /// in one atomic operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent, or a domain error if
    /// the trade is not open for consent.
    async fn update_declined_by(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
        reason: Option<String>,
    ) -> StoreResult<Trade>;

    /// Overwrites the consent list. Exists for admin repair flows; normal
    /// consent goes through [`record_acceptance`](TradeStore::record_acceptance).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn update_accepted_by(
        &self,
        id: TradeId,
        participant_ids: Vec<ParticipantId>,
    ) -> StoreResult<Trade>;

    /// Atomically appends one consent and recomputes the status.
    ///
    /// The read-modify-write happens under a store-level critical section so
    /// two racing accepts can never lose an append.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent, or a domain error
    /// (not open for consent, re-acceptance, non-recipient).
    async fn record_acceptance(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
    ) -> StoreResult<Trade>;

    /// Applies a participant delta computed by the caller.
    ///
    /// The caller validates the merged aggregate before issuing the delta;
    /// a combined participant+item replacement is two calls, and the state
    /// between them may not satisfy the aggregate invariants on its own.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn update_participants(
        &self,
        id: TradeId,
        add: Vec<Participant>,
        remove: Vec<ParticipantId>,
    ) -> StoreResult<Trade>;

    /// Applies an item delta computed by the caller.
    ///
    /// Merged-aggregate validity is the caller's concern, as with
    /// [`update_participants`](TradeStore::update_participants).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn update_items(
        &self,
        id: TradeId,
        add: Vec<TradeItem>,
        remove: Vec<ItemId>,
    ) -> StoreResult<Trade>;

    /// Deletes a trade and its children unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TradeNotFound`] if absent.
    async fn delete_trade(&self, id: TradeId) -> StoreResult<()>;

    /// Resolves every item's entity id into its player or draft pick record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AssetNotFound`] for the first unresolvable
    /// item.
    async fn hydrate_trade(&self, trade: &Trade) -> StoreResult<HydratedTrade>;
}

/// Port for roster lookups: players, draft picks, and team owners.
#[async_trait]
pub trait RosterDirectory: Send + Sync + fmt::Debug {
    /// Fetches an owner record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, String>;

    /// Fetches every owner of a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn owners_for_team(&self, team_id: TeamId) -> Result<Vec<Owner>, String>;

    /// Fetches a player record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, String>;

    /// Fetches a draft pick record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get_draft_pick(&self, id: Uuid) -> Result<Option<DraftPick>, String>;
}

/// Port for publishing domain events.
///
/// Publishing failures are logged by callers and never fail the mutation
/// that produced the event.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes one trade lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish(&self, event: TradeEvent) -> Result<(), String>;
}
