//! # In-Memory Trade Store
//!
//! In-memory implementation of [`TradeStore`] for tests and the default
//! wiring.
//!
//! Every mutation runs in one write-lock critical section, which is what
//! makes [`record_acceptance`](TradeStore::record_acceptance) atomic: two
//! racing accepts serialize on the lock and neither append is lost.
//! Hydration resolves entity ids through the injected roster directory.

use crate::application::use_cases::{RosterDirectory, StoreError, StoreResult, TradeStore};
use crate::domain::entities::{
    AssetDetails, HydratedItem, HydratedTrade, Participant, Trade, TradeItem,
};
use crate::domain::value_objects::{
    AssetKind, ItemId, ParticipantId, Timestamp, TradeId, TradeStatus,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TradeStore`].
///
/// Uses a thread-safe `HashMap` for storage. Suitable for unit tests and
/// single-process deployments without database dependencies.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use league_trades::infrastructure::persistence::{
///     InMemoryRosterDirectory, InMemoryTradeStore,
/// };
///
/// let directory = Arc::new(InMemoryRosterDirectory::new());
/// let store = InMemoryTradeStore::new(directory);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryTradeStore {
    storage: Arc<RwLock<HashMap<TradeId, Trade>>>,
    directory: Arc<dyn RosterDirectory>,
}

impl InMemoryTradeStore {
    /// Creates a new empty in-memory trade store.
    #[must_use]
    pub fn new(directory: Arc<dyn RosterDirectory>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            directory,
        }
    }

    /// Returns the number of stored trades.
    pub async fn count(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Clears all trades from the store.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    /// Runs one mutation under the write lock and returns the updated trade.
    async fn mutate<F>(&self, id: TradeId, f: F) -> StoreResult<Trade>
    where
        F: FnOnce(&mut Trade) -> StoreResult<()>,
    {
        let mut storage = self.storage.write().await;
        let mut trade = storage
            .get(&id)
            .cloned()
            .ok_or(StoreError::TradeNotFound(id))?;
        f(&mut trade)?;
        storage.insert(id, trade.clone());
        Ok(trade)
    }
}

#[async_trait]
impl TradeStore for InMemoryTradeStore {
    async fn create_trade(&self, trade: &Trade) -> StoreResult<()> {
        // The in-memory equivalent of the transactional create: nothing is
        // inserted unless the aggregate validates.
        trade.validate()?;
        let mut storage = self.storage.write().await;
        if storage.contains_key(&trade.id()) {
            return Err(StoreError::Backend(format!(
                "trade {} already exists",
                trade.id()
            )));
        }
        storage.insert(trade.id(), trade.clone());
        Ok(())
    }

    async fn get_trade_by_id(&self, id: TradeId) -> StoreResult<Trade> {
        self.storage
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::TradeNotFound(id))
    }

    async fn update_status(&self, id: TradeId, status: TradeStatus) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            *trade = rebuild(trade, Some(status), None, None, None);
            Ok(())
        })
        .await
    }

    async fn update_declined_by(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
        reason: Option<String>,
    ) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            trade.apply_decline(participant_id, reason)?;
            Ok(())
        })
        .await
    }

    async fn update_accepted_by(
        &self,
        id: TradeId,
        participant_ids: Vec<ParticipantId>,
    ) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            *trade = rebuild(trade, None, Some(participant_ids), None, None);
            Ok(())
        })
        .await
    }

    async fn record_acceptance(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
    ) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            trade.apply_acceptance(participant_id)?;
            Ok(())
        })
        .await
    }

    async fn update_participants(
        &self,
        id: TradeId,
        add: Vec<Participant>,
        remove: Vec<ParticipantId>,
    ) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            let mut participants: Vec<Participant> = trade
                .participants()
                .iter()
                .filter(|p| !remove.contains(&p.id()))
                .cloned()
                .collect();
            participants.extend(add);
            *trade = rebuild(trade, None, None, Some(participants), None);
            Ok(())
        })
        .await
    }

    async fn update_items(
        &self,
        id: TradeId,
        add: Vec<TradeItem>,
        remove: Vec<ItemId>,
    ) -> StoreResult<Trade> {
        self.mutate(id, |trade| {
            let mut items: Vec<TradeItem> = trade
                .items()
                .iter()
                .filter(|i| !remove.contains(&i.id()))
                .cloned()
                .collect();
            items.extend(add);
            *trade = rebuild(trade, None, None, None, Some(items));
            Ok(())
        })
        .await
    }

    async fn delete_trade(&self, id: TradeId) -> StoreResult<()> {
        self.storage
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::TradeNotFound(id))
    }

    async fn hydrate_trade(&self, trade: &Trade) -> StoreResult<HydratedTrade> {
        let mut items = Vec::with_capacity(trade.items().len());
        for item in trade.items() {
            let asset = match item.asset_kind() {
                AssetKind::Player => self
                    .directory
                    .get_player(item.entity_id())
                    .await
                    .map_err(StoreError::Backend)?
                    .map(AssetDetails::Player),
                AssetKind::DraftPick => self
                    .directory
                    .get_draft_pick(item.entity_id())
                    .await
                    .map_err(StoreError::Backend)?
                    .map(AssetDetails::DraftPick),
            };
            let asset = asset.ok_or(StoreError::AssetNotFound {
                kind: item.asset_kind(),
                entity_id: item.entity_id(),
            })?;
            items.push(HydratedItem {
                item: item.clone(),
                asset,
            });
        }
        Ok(HydratedTrade::new(trade.clone(), items))
    }
}

/// Rebuilds a trade with selected fields replaced and the version bumped.
fn rebuild(
    trade: &Trade,
    status: Option<TradeStatus>,
    accepted_by: Option<Vec<ParticipantId>>,
    participants: Option<Vec<Participant>>,
    items: Option<Vec<TradeItem>>,
) -> Trade {
    Trade::from_parts(
        trade.id(),
        status.unwrap_or(trade.status()),
        participants.unwrap_or_else(|| trade.participants().to_vec()),
        items.unwrap_or_else(|| trade.items().to_vec()),
        accepted_by.unwrap_or_else(|| trade.accepted_by().to_vec()),
        trade.accepted_on(),
        trade.declined_by(),
        trade.declined_reason().map(str::to_string),
        trade.version() + 1,
        trade.created_at(),
        Timestamp::now(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{DraftPick, Player};
    use crate::domain::value_objects::{ParticipantRole, TeamId};
    use crate::infrastructure::persistence::InMemoryRosterDirectory;
    use uuid::Uuid;

    fn store() -> (InMemoryTradeStore, Arc<InMemoryRosterDirectory>) {
        let directory = Arc::new(InMemoryRosterDirectory::new());
        (InMemoryTradeStore::new(Arc::clone(&directory) as _), directory)
    }

    fn test_trade(status: TradeStatus) -> Trade {
        let creator = TeamId::new_v4();
        let recipient = TeamId::new_v4();
        Trade::builder(status)
            .participant(creator, ParticipantRole::Creator)
            .participant(recipient, ParticipantRole::Recipient)
            .item(AssetKind::Player, Uuid::new_v4(), creator, recipient)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn create_and_get() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Draft);

        store.create_trade(&trade).await.unwrap();

        let fetched = store.get_trade_by_id(trade.id()).await.unwrap();
        assert_eq!(fetched, trade);
    }

    #[tokio::test]
    async fn get_nonexistent_is_not_found() {
        let (store, _) = store();
        let result = store.get_trade_by_id(TradeId::new_v4()).await;
        assert!(matches!(result, Err(StoreError::TradeNotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Draft);
        store.create_trade(&trade).await.unwrap();

        let result = store.create_trade(&trade).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn update_status_bumps_version() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Draft);
        store.create_trade(&trade).await.unwrap();

        let updated = store
            .update_status(trade.id(), TradeStatus::Requested)
            .await
            .unwrap();
        assert_eq!(updated.status(), TradeStatus::Requested);
        assert_eq!(updated.version(), trade.version() + 1);
    }

    #[tokio::test]
    async fn record_acceptance_applies_consent_semantics() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Requested);
        let recipient = trade.recipients().next().unwrap().id();
        store.create_trade(&trade).await.unwrap();

        let updated = store.record_acceptance(trade.id(), recipient).await.unwrap();
        assert_eq!(updated.status(), TradeStatus::Accepted);
        assert_eq!(updated.accepted_by(), &[recipient]);

        // A second accept by the same participant is a domain error.
        let result = store.record_acceptance(trade.id(), recipient).await;
        assert!(matches!(result, Err(StoreError::Domain(_))));
    }

    #[tokio::test]
    async fn concurrent_accepts_lose_no_consent() {
        let creator = TeamId::new_v4();
        let first = TeamId::new_v4();
        let second = TeamId::new_v4();
        let trade = Trade::builder(TradeStatus::Requested)
            .participant(creator, ParticipantRole::Creator)
            .participant(first, ParticipantRole::Recipient)
            .participant(second, ParticipantRole::Recipient)
            .item(AssetKind::Player, Uuid::new_v4(), creator, first)
            .item(AssetKind::Player, Uuid::new_v4(), creator, second)
            .build()
            .unwrap();
        let first_id = trade.participant_for_team(first).unwrap().id();
        let second_id = trade.participant_for_team(second).unwrap().id();

        let (store, _) = store();
        store.create_trade(&trade).await.unwrap();

        let a = store.record_acceptance(trade.id(), first_id);
        let b = store.record_acceptance(trade.id(), second_id);
        let (ra, rb) = tokio::join!(a, b);
        ra.unwrap();
        rb.unwrap();

        let settled = store.get_trade_by_id(trade.id()).await.unwrap();
        assert_eq!(settled.accepted_by().len(), 2);
        assert_eq!(settled.status(), TradeStatus::Accepted);
    }

    #[tokio::test]
    async fn delete_removes_trade() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Draft);
        store.create_trade(&trade).await.unwrap();

        store.delete_trade(trade.id()).await.unwrap();
        assert!(matches!(
            store.delete_trade(trade.id()).await,
            Err(StoreError::TradeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn hydrate_resolves_seeded_assets() {
        let (store, directory) = store();
        let creator = TeamId::new_v4();
        let recipient = TeamId::new_v4();
        let player_id = Uuid::new_v4();
        let pick_id = Uuid::new_v4();
        let trade = Trade::builder(TradeStatus::Draft)
            .participant(creator, ParticipantRole::Creator)
            .participant(recipient, ParticipantRole::Recipient)
            .item(AssetKind::Player, player_id, creator, recipient)
            .item(AssetKind::DraftPick, pick_id, recipient, creator)
            .build()
            .unwrap();

        directory
            .seed_player(Player {
                id: player_id,
                name: "Jordan Blake".to_string(),
                position: "WR".to_string(),
                team_id: creator,
            })
            .await;
        directory
            .seed_draft_pick(DraftPick {
                id: pick_id,
                season: 2027,
                round: 1,
                team_id: recipient,
            })
            .await;

        let hydrated = store.hydrate_trade(&trade).await.unwrap();
        assert_eq!(hydrated.items.len(), 2);
        assert!(matches!(hydrated.items[0].asset, AssetDetails::Player(_)));
        assert!(matches!(
            hydrated.items[1].asset,
            AssetDetails::DraftPick(_)
        ));
    }

    #[tokio::test]
    async fn hydrate_missing_asset_fails() {
        let (store, _) = store();
        let trade = test_trade(TradeStatus::Draft);

        let result = store.hydrate_trade(&trade).await;
        assert!(matches!(result, Err(StoreError::AssetNotFound { .. })));
    }
}
