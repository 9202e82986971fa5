//! # Create Trade Use Case
//!
//! Use case for creating a new trade proposal.
//!
//! Orchestrates request validation, the initial-status capability check,
//! aggregate construction, persistence, and the `TradeRequested` event when
//! the trade starts its life already requested.

use crate::application::dto::trade_dto::{CreateTradeRequest, TradeResponse};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::authorization::{Actor, TradeAction, authorize, resolve_actor};
use crate::application::use_cases::{EventPublisher, RosterDirectory, TradeStore};
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::TradeStatus;
use std::sync::Arc;
use tracing::warn;

/// Use case for creating a new trade.
#[derive(Debug)]
pub struct CreateTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateTradeUseCase {
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

    /// Executes the create trade use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request validation fails
    /// - The initial status is invalid for a non-admin actor
    /// - The aggregate invariants are violated
    /// - Persistence fails
    pub async fn execute(
        &self,
        actor: &Actor,
        request: CreateTradeRequest,
    ) -> ApplicationResult<TradeResponse> {
        // 1. Validate request shape
        request.validate().map_err(ApplicationError::bad_request)?;

        // 2. Resolve the actor against the roster
        let context = resolve_actor(self.directory.as_ref(), actor).await?;

        // 3. Capability check on the initial status
        authorize(&context, None, TradeAction::Create(request.initial_status()))?;

        // 4. Build the aggregate (validates invariants)
        let trade = request.to_domain().map_err(ApplicationError::bad_request)?;

        // 5. Persist atomically
        self.store.create_trade(&trade).await?;

        // 6. A trade born Requested announces itself
        if trade.status() == TradeStatus::Requested
            && let Err(e) = self
                .event_publisher
                .publish(TradeEvent::requested(trade.id()))
                .await
        {
            warn!(trade_id = %trade.id(), error = %e, "failed to publish trade event");
        }

        Ok(TradeResponse::from(&trade))
    }
}
