//! # Submit Trade Use Case
//!
//! Hands a fully accepted trade to the commissioner.
//!
//! Submission hydrates the trade first: every referenced asset must still
//! resolve before the status flips. A trade that submits with a dangling
//! player reference would be unexecutable.

use crate::application::dto::trade_dto::TradeResponse;
use crate::application::error::ApplicationResult;
use crate::application::services::authorization::{Actor, TradeAction, authorize, resolve_actor};
use crate::application::use_cases::{EventPublisher, RosterDirectory, TradeStore};
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::{TradeId, TradeStatus};
use std::sync::Arc;
use tracing::warn;

/// Use case for submitting an accepted trade.
#[derive(Debug)]
pub struct SubmitTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitTradeUseCase {
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

    /// Executes the submit trade use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The actor is not the creator's owner (nor admin)
    /// - The trade is not Accepted
    /// - An item's asset no longer resolves
    pub async fn execute(&self, actor: &Actor, trade_id: TradeId) -> ApplicationResult<TradeResponse> {
        let context = resolve_actor(self.directory.as_ref(), actor).await?;
        let trade = self.store.get_trade_by_id(trade_id).await?;

        authorize(&context, Some(&trade), TradeAction::Submit)?;

        // Validate the transition before touching anything else.
        let mut submitted = trade.clone();
        submitted.apply_submission()?;

        // Every asset must still resolve at submission time.
        self.store.hydrate_trade(&trade).await?;

        let updated = self
            .store
            .update_status(trade_id, TradeStatus::Submitted)
            .await?;

        if let Err(e) = self
            .event_publisher
            .publish(TradeEvent::submitted(trade_id))
            .await
        {
            warn!(trade_id = %trade_id, error = %e, "failed to publish trade event");
        }

        Ok(TradeResponse::from(&updated))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::application::use_cases::tests::{
        MockEventPublisher, MockRosterDirectory, MockTradeStore, owner_for, two_team_trade,
    };
    use crate::domain::entities::Trade;
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::TeamId;

    struct Fixture {
        use_case: SubmitTradeUseCase,
        store: Arc<MockTradeStore>,
        events: Arc<MockEventPublisher>,
        trade: Trade,
        creator_actor: Actor,
        recipient_actor: Actor,
    }

    fn fixture(status: TradeStatus) -> Fixture {
        let creator_team = TeamId::new_v4();
        let recipient_team = TeamId::new_v4();
        let mut trade = two_team_trade(TradeStatus::Requested, creator_team, recipient_team);
        if status == TradeStatus::Accepted {
            let recipient = trade.recipients().next().unwrap().id();
            trade.apply_acceptance(recipient).unwrap();
        } else {
            trade = two_team_trade(status, creator_team, recipient_team);
        }

        let creator_owner = owner_for(creator_team, "creator@league.test");
        let recipient_owner = owner_for(recipient_team, "recipient@league.test");
        let creator_actor = Actor {
            owner_id: creator_owner.id,
            admin: false,
        };
        let recipient_actor = Actor {
            owner_id: recipient_owner.id,
            admin: false,
        };

        let store = Arc::new(MockTradeStore::with_trade(trade.clone()));
        let events = Arc::new(MockEventPublisher::default());
        let use_case = SubmitTradeUseCase::new(
            Arc::clone(&store) as _,
            Arc::new(MockRosterDirectory::with_owners(vec![
                creator_owner,
                recipient_owner,
            ])) as _,
            Arc::clone(&events) as _,
        );

        Fixture {
            use_case,
            store,
            events,
            trade,
            creator_actor,
            recipient_actor,
        }
    }

    #[tokio::test]
    async fn creator_submits_accepted_trade() {
        let fx = fixture(TradeStatus::Accepted);
        let response = fx
            .use_case
            .execute(&fx.creator_actor, fx.trade.id())
            .await
            .unwrap();

        assert_eq!(response.status, TradeStatus::Submitted);
        assert_eq!(fx.events.published_types(), vec!["TRADE_SUBMITTED"]);
    }

    #[tokio::test]
    async fn recipient_cannot_submit() {
        let fx = fixture(TradeStatus::Accepted);
        let result = fx.use_case.execute(&fx.recipient_actor, fx.trade.id()).await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::NotCreator))
        ));
    }

    #[tokio::test]
    async fn submit_requires_accepted_status() {
        for status in [TradeStatus::Draft, TradeStatus::Requested] {
            let fx = fixture(status);
            let result = fx.use_case.execute(&fx.creator_actor, fx.trade.id()).await;
            assert!(matches!(
                result,
                Err(ApplicationError::DomainError(DomainError::NotAccepted(_)))
            ));
        }
    }

    #[tokio::test]
    async fn unresolvable_asset_blocks_submission() {
        let fx = fixture(TradeStatus::Accepted);
        fx.store.fail_hydration();

        let result = fx.use_case.execute(&fx.creator_actor, fx.trade.id()).await;
        assert!(matches!(result, Err(ApplicationError::HydrationError(_))));

        // Status untouched.
        let trade = fx.store.get_trade_by_id(fx.trade.id()).await.unwrap();
        assert_eq!(trade.status(), TradeStatus::Accepted);
        assert!(fx.events.published_types().is_empty());
    }
}
