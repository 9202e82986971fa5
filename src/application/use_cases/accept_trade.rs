//! # Accept Trade Use Case
//!
//! Records one recipient team's consent on a trade.
//!
//! The consent append and the status recomputation happen inside the store's
//! atomic `record_acceptance`, so two racing accepts can never lose an
//! append. The use case resolves who is consenting, authorizes, delegates,
//! and publishes the `TradeAccepted` event when the trade becomes fully
//! accepted.

use crate::application::dto::trade_dto::{AcceptTradeRequest, TradeResponse};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::authorization::{
    Actor, TradeAction, acting_participant, authorize, resolve_actor,
};
use crate::application::use_cases::{EventPublisher, RosterDirectory, TradeStore};
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::{TradeId, TradeStatus};
use std::sync::Arc;
use tracing::warn;

/// Use case for recording one recipient's consent.
#[derive(Debug)]
pub struct AcceptTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AcceptTradeUseCase {
    /// Creates the use case with all dependencies.
    #[must_use]
    pub fn new(
        store: Arc<dyn TradeStore>,
        directory: Arc<dyn RosterDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            directory,
            event_publisher,
        }
    }

    /// Executes the accept trade use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The actor is not a recipient-team owner (nor admin)
    /// - The trade is not open for consent
    /// - The participant has already accepted
    pub async fn execute(
        &self,
        actor: &Actor,
        trade_id: TradeId,
        request: AcceptTradeRequest,
    ) -> ApplicationResult<TradeResponse> {
        // 1. Resolve the actor and load the trade
        let context = resolve_actor(self.directory.as_ref(), actor).await?;
        let trade = self.store.get_trade_by_id(trade_id).await?;

        // 2. Capability check
        authorize(&context, Some(&trade), TradeAction::Accept)?;

        // 3. Resolve the consenting participant. Admins act for no team and
        //    must name the participant explicitly.
        let participant_id = match acting_participant(&context, &trade) {
            Some(id) => id,
            None => request.participant_id.ok_or_else(|| {
                ApplicationError::bad_request("participant_id is required for an admin accept")
            })?,
        };

        // 4. Atomic append-and-recompute
        let updated = self.store.record_acceptance(trade_id, participant_id).await?;

        // 5. Publish when the trade became fully accepted
        if updated.status() == TradeStatus::Accepted
            && let Err(e) = self
                .event_publisher
                .publish(TradeEvent::accepted(
                    trade_id,
                    updated.accepted_by().to_vec(),
                ))
                .await
        {
            warn!(trade_id = %trade_id, error = %e, "failed to publish trade event");
        }

        Ok(TradeResponse::from(&updated))
    }
}
