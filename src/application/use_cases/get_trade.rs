//! # Get Trade Use Case
//!
//! Fetches one trade by id for any authenticated owner.

use crate::application::dto::trade_dto::TradeResponse;
use crate::application::error::ApplicationResult;
use crate::application::services::authorization::{Actor, resolve_actor};
use crate::application::use_cases::{RosterDirectory, TradeStore};
use crate::domain::value_objects::TradeId;
use std::sync::Arc;

/// Use case for reading a single trade.
#[derive(Debug)]
pub struct GetTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
}

impl GetTradeUseCase {
    /// Creates the use case with all dependencies.
    #[must_use]
    pub fn new(store: Arc<dyn TradeStore>, directory: Arc<dyn RosterDirectory>) -> Self {
        Self { store, directory }
    }

    /// Executes the get trade use case.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `Unauthorized` for an
    /// unknown actor.
    pub async fn execute(&self, actor: &Actor, id: TradeId) -> ApplicationResult<TradeResponse> {
        resolve_actor(self.directory.as_ref(), actor).await?;
        let trade = self.store.get_trade_by_id(id).await?;
        Ok(TradeResponse::from(&trade))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::application::use_cases::tests::{
        MockRosterDirectory, MockTradeStore, owner_for, two_team_trade,
    };
    use crate::domain::value_objects::{TeamId, TradeStatus};

    #[tokio::test]
    async fn returns_existing_trade() {
        let creator = TeamId::new_v4();
        let recipient = TeamId::new_v4();
        let trade = two_team_trade(TradeStatus::Requested, creator, recipient);
        let owner = owner_for(recipient, "viewer@league.test");
        let actor = Actor {
            owner_id: owner.id,
            admin: false,
        };

        let use_case = GetTradeUseCase::new(
            Arc::new(MockTradeStore::with_trade(trade.clone())) as _,
            Arc::new(MockRosterDirectory::with_owners(vec![owner])) as _,
        );

        let response = use_case.execute(&actor, trade.id()).await.unwrap();
        assert_eq!(response.id, trade.id());
        assert_eq!(response.status, TradeStatus::Requested);
    }

    #[tokio::test]
    async fn missing_trade_is_not_found() {
        let owner = owner_for(TeamId::new_v4(), "viewer@league.test");
        let actor = Actor {
            owner_id: owner.id,
            admin: false,
        };
        let use_case = GetTradeUseCase::new(
            Arc::new(MockTradeStore::default()) as _,
            Arc::new(MockRosterDirectory::with_owners(vec![owner])) as _,
        );

        let result = use_case
            .execute(&actor, crate::domain::value_objects::TradeId::new_v4())
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }
}
