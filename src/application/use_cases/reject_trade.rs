//! # Reject Trade Use Case
//!
//! Declines a trade on behalf of a recipient team.
//!
//! The declined fields and the Rejected status are written in one atomic
//! store operation; there is no window where the trade is rejected but the
//! decliner unknown.

use crate::application::dto::trade_dto::{RejectTradeRequest, TradeResponse};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::authorization::{
    Actor, TradeAction, acting_participant, authorize, resolve_actor,
};
use crate::application::use_cases::{EventPublisher, RosterDirectory, TradeStore};
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::TradeId;
use std::sync::Arc;
use tracing::warn;

/// Use case for declining a trade.
#[derive(Debug)]
pub struct RejectTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RejectTradeUseCase {
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

    /// Executes the reject trade use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The actor is the creator, or not a participant-team owner (nor
    ///   admin)
    /// - The trade is not open for consent
    pub async fn execute(
        &self,
        actor: &Actor,
        trade_id: TradeId,
        request: RejectTradeRequest,
    ) -> ApplicationResult<TradeResponse> {
        let context = resolve_actor(self.directory.as_ref(), actor).await?;
        let trade = self.store.get_trade_by_id(trade_id).await?;

        authorize(&context, Some(&trade), TradeAction::Reject)?;

        let participant_id = match acting_participant(&context, &trade) {
            Some(id) => id,
            None => request.participant_id.ok_or_else(|| {
                ApplicationError::bad_request("participant_id is required for an admin reject")
            })?,
        };

        let updated = self
            .store
            .update_declined_by(trade_id, participant_id, request.reason.clone())
            .await?;

        if let Err(e) = self
            .event_publisher
            .publish(TradeEvent::rejected(
                trade_id,
                participant_id,
                request.reason,
            ))
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
    use crate::application::use_cases::tests::{
        MockEventPublisher, MockRosterDirectory, MockTradeStore, owner_for, two_team_trade,
    };
    use crate::domain::entities::Trade;
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::{TeamId, TradeStatus};

    struct Fixture {
        use_case: RejectTradeUseCase,
        events: Arc<MockEventPublisher>,
        trade: Trade,
        creator_actor: Actor,
        recipient_actor: Actor,
    }

    fn fixture(status: TradeStatus) -> Fixture {
        let creator_team = TeamId::new_v4();
        let recipient_team = TeamId::new_v4();
        let trade = two_team_trade(status, creator_team, recipient_team);

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

        let events = Arc::new(MockEventPublisher::default());
        let use_case = RejectTradeUseCase::new(
            Arc::new(MockTradeStore::with_trade(trade.clone())) as _,
            Arc::new(MockRosterDirectory::with_owners(vec![
                creator_owner,
                recipient_owner,
            ])) as _,
            Arc::clone(&events) as _,
        );

        Fixture {
            use_case,
            events,
            trade,
            creator_actor,
            recipient_actor,
        }
    }

    #[tokio::test]
    async fn recipient_decline_rejects_and_publishes() {
        let fx = fixture(TradeStatus::Requested);
        let response = fx
            .use_case
            .execute(
                &fx.recipient_actor,
                fx.trade.id(),
                RejectTradeRequest {
                    participant_id: None,
                    reason: Some("keeping my picks".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.status, TradeStatus::Rejected);
        assert_eq!(response.declined_reason.as_deref(), Some("keeping my picks"));
        let recipient_participant = fx.trade.recipients().next().unwrap().id();
        assert_eq!(response.declined_by, Some(recipient_participant));
        assert_eq!(fx.events.published_types(), vec!["TRADE_REJECTED"]);
    }

    #[tokio::test]
    async fn creator_cannot_reject() {
        let fx = fixture(TradeStatus::Requested);
        let result = fx
            .use_case
            .execute(
                &fx.creator_actor,
                fx.trade.id(),
                RejectTradeRequest::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::CreatorCannotReject))
        ));
        assert!(fx.events.published_types().is_empty());
    }

    #[tokio::test]
    async fn reject_outside_consent_window_fails() {
        let fx = fixture(TradeStatus::Draft);
        let result = fx
            .use_case
            .execute(
                &fx.recipient_actor,
                fx.trade.id(),
                RejectTradeRequest::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::NotOpenForConsent(_)))
        ));
    }

    #[tokio::test]
    async fn admin_rejects_by_naming_the_participant() {
        let fx = fixture(TradeStatus::Requested);
        let admin = Actor {
            owner_id: crate::domain::value_objects::OwnerId::new_v4(),
            admin: true,
        };
        let participant_id = fx.trade.recipients().next().unwrap().id();

        let response = fx
            .use_case
            .execute(
                &admin,
                fx.trade.id(),
                RejectTradeRequest {
                    participant_id: Some(participant_id),
                    reason: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(response.status, TradeStatus::Rejected);
        assert_eq!(response.declined_by, Some(participant_id));
    }

    #[tokio::test]
    async fn missing_trade_is_not_found() {
        let fx = fixture(TradeStatus::Requested);
        let result = fx
            .use_case
            .execute(
                &fx.recipient_actor,
                crate::domain::value_objects::TradeId::new_v4(),
                RejectTradeRequest::default(),
            )
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }
}
