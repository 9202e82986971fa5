//! # Delete Trade Use Case
//!
//! Removes a trade and its children. Admin only, any status.

use crate::application::error::ApplicationResult;
use crate::application::services::authorization::{Actor, TradeAction, authorize, resolve_actor};
use crate::application::use_cases::{RosterDirectory, TradeStore};
use crate::domain::value_objects::TradeId;
use std::sync::Arc;
use tracing::info;

/// Use case for deleting a trade.
#[derive(Debug)]
pub struct DeleteTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
}

impl DeleteTradeUseCase {
    /// Creates the use case with all dependencies.
    #[must_use]
    pub fn new(store: Arc<dyn TradeStore>, directory: Arc<dyn RosterDirectory>) -> Self {
        Self { store, directory }
    }

    /// Executes the delete trade use case.
    ///
    /// Deletion is unconditional once existence is confirmed; there is no
    /// status gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the trade does not exist or the actor is not an
    /// admin.
    pub async fn execute(&self, actor: &Actor, trade_id: TradeId) -> ApplicationResult<()> {
        let context = resolve_actor(self.directory.as_ref(), actor).await?;
        let trade = self.store.get_trade_by_id(trade_id).await?;

        authorize(&context, Some(&trade), TradeAction::Delete)?;

        self.store.delete_trade(trade_id).await?;
        info!(trade_id = %trade_id, status = %trade.status(), "trade deleted");
        Ok(())
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
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::{OwnerId, TeamId, TradeStatus};

    #[tokio::test]
    async fn admin_deletes_any_status() {
        for status in [TradeStatus::Draft, TradeStatus::Submitted] {
            let trade = two_team_trade(status, TeamId::new_v4(), TeamId::new_v4());
            let store = Arc::new(MockTradeStore::with_trade(trade.clone()));
            let use_case = DeleteTradeUseCase::new(
                Arc::clone(&store) as _,
                Arc::new(MockRosterDirectory::default()) as _,
            );
            let admin = Actor {
                owner_id: OwnerId::new_v4(),
                admin: true,
            };

            use_case.execute(&admin, trade.id()).await.unwrap();
            assert!(matches!(
                store.get_trade_by_id(trade.id()).await,
                Err(crate::application::use_cases::StoreError::TradeNotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn creator_owner_cannot_delete() {
        let creator_team = TeamId::new_v4();
        let trade = two_team_trade(TradeStatus::Draft, creator_team, TeamId::new_v4());
        let owner = owner_for(creator_team, "creator@league.test");
        let actor = Actor {
            owner_id: owner.id,
            admin: false,
        };
        let use_case = DeleteTradeUseCase::new(
            Arc::new(MockTradeStore::with_trade(trade.clone())) as _,
            Arc::new(MockRosterDirectory::with_owners(vec![owner])) as _,
        );

        let result = use_case.execute(&actor, trade.id()).await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::AdminRequired))
        ));
    }

    #[tokio::test]
    async fn missing_trade_is_not_found_even_for_admin() {
        let use_case = DeleteTradeUseCase::new(
            Arc::new(MockTradeStore::default()) as _,
            Arc::new(MockRosterDirectory::default()) as _,
        );
        let admin = Actor {
            owner_id: OwnerId::new_v4(),
            admin: true,
        };
        let result = use_case
            .execute(&admin, crate::domain::value_objects::TradeId::new_v4())
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }
}
