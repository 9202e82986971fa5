//! # Notification Dispatcher
//!
//! Fans one trade transition out into queued notification messages.
//!
//! The dispatcher is decoupled from the mutation that caused the transition:
//! it re-fetches the trade, refuses to dispatch when the live status
//! disagrees with the notification kind, hydrates, and enqueues exactly one
//! message per target. Callers may retry a failed dispatch freely; the
//! mutation has already committed.
//!
//! Targets per kind:
//!
//! - `TradeRequested` — every owner of every recipient team, never the
//!   creator's owners
//! - `TradeDeclined` — every owner across all participants except the
//!   declining individual
//! - `TradeAccepted` — every owner of the creator team
//! - `TradeSubmitted` — one broadcast to the announce channel

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::queue::{
    DeliveryQueue, NotificationKind, QUEUE_CHAT_ANNOUNCE, QUEUE_EMAIL, QueuedMessage,
    RecipientContext,
};
use crate::application::use_cases::{RosterDirectory, TradeStore};
use crate::domain::entities::{HydratedTrade, Owner, Trade};
use crate::domain::value_objects::{OwnerId, TeamId, TradeId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Application service enqueueing trade notifications.
#[derive(Debug)]
pub struct NotificationDispatcher {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    queue: Arc<dyn DeliveryQueue>,
    announce_channel: String,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(
        store: Arc<dyn TradeStore>,
        directory: Arc<dyn RosterDirectory>,
        queue: Arc<dyn DeliveryQueue>,
        announce_channel: impl Into<String>,
    ) -> Self {
        Self {
            store,
            directory,
            queue,
            announce_channel: announce_channel.into(),
        }
    }

    /// Enqueues request notifications to every recipient-team owner.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when the live status is not Requested, plus
    /// store, directory, and queue errors.
    pub async fn dispatch_requested(&self, trade_id: TradeId) -> ApplicationResult<usize> {
        let (trade, hydrated) = self.load(trade_id, NotificationKind::TradeRequested).await?;
        let owners = self.owners_for_teams(trade.recipient_teams()).await?;
        self.enqueue_for_owners(NotificationKind::TradeRequested, &hydrated, owners)
            .await
    }

    /// Enqueues decline notifications to every participant owner except the
    /// declining individual.
    ///
    /// Stored trade data only carries the declining participant, so the
    /// declining owner travels with the dispatch request.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when the live status is not Rejected, plus
    /// store, directory, and queue errors.
    pub async fn dispatch_declined(
        &self,
        trade_id: TradeId,
        declined_by_owner: Option<OwnerId>,
    ) -> ApplicationResult<usize> {
        let (trade, hydrated) = self.load(trade_id, NotificationKind::TradeDeclined).await?;
        let teams: BTreeSet<TeamId> = trade.participants().iter().map(|p| p.team_id()).collect();
        let owners = self
            .owners_for_teams(teams)
            .await?
            .into_iter()
            .filter(|o| Some(o.id) != declined_by_owner)
            .collect();
        self.enqueue_for_owners(NotificationKind::TradeDeclined, &hydrated, owners)
            .await
    }

    /// Enqueues acceptance notifications to every creator-team owner.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when the live status is not Accepted, plus
    /// store, directory, and queue errors.
    pub async fn dispatch_accepted(&self, trade_id: TradeId) -> ApplicationResult<usize> {
        let (trade, hydrated) = self.load(trade_id, NotificationKind::TradeAccepted).await?;
        let creator_team = trade
            .creator()
            .map(|p| p.team_id())
            .ok_or_else(|| ApplicationError::internal("trade has no creator"))?;
        let owners = self
            .owners_for_teams(BTreeSet::from([creator_team]))
            .await?;
        self.enqueue_for_owners(NotificationKind::TradeAccepted, &hydrated, owners)
            .await
    }

    /// Enqueues one broadcast announcement for a submitted trade.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when the live status is not Submitted, plus
    /// store and queue errors.
    pub async fn dispatch_submitted(&self, trade_id: TradeId) -> ApplicationResult<usize> {
        let (_, hydrated) = self.load(trade_id, NotificationKind::TradeSubmitted).await?;
        let message = QueuedMessage::new(
            NotificationKind::TradeSubmitted,
            hydrated,
            RecipientContext::Channel {
                name: self.announce_channel.clone(),
            },
        );
        self.queue
            .publish(QUEUE_CHAT_ANNOUNCE, message)
            .await
            .map_err(|e| ApplicationError::queue(e.to_string()))?;
        info!(trade_id = %trade_id, queue = QUEUE_CHAT_ANNOUNCE, "enqueued trade announcement");
        Ok(1)
    }

    /// Fetches, status-guards, and hydrates the trade for a dispatch.
    async fn load(
        &self,
        trade_id: TradeId,
        kind: NotificationKind,
    ) -> ApplicationResult<(Trade, HydratedTrade)> {
        let trade = self.store.get_trade_by_id(trade_id).await?;
        let expected = kind.expected_status();
        if trade.status() != expected {
            return Err(ApplicationError::bad_request(format!(
                "cannot dispatch {kind} while trade is {}; expected {expected}",
                trade.status()
            )));
        }
        let hydrated = self.store.hydrate_trade(&trade).await?;
        Ok((trade, hydrated))
    }

    /// Resolves every owner of the given teams, deduplicated by owner id.
    async fn owners_for_teams(&self, teams: BTreeSet<TeamId>) -> ApplicationResult<Vec<Owner>> {
        let mut seen: BTreeSet<OwnerId> = BTreeSet::new();
        let mut owners = Vec::new();
        for team in teams {
            let team_owners = self
                .directory
                .owners_for_team(team)
                .await
                .map_err(ApplicationError::repository)?;
            for owner in team_owners {
                if seen.insert(owner.id) {
                    owners.push(owner);
                }
            }
        }
        Ok(owners)
    }

    async fn enqueue_for_owners(
        &self,
        kind: NotificationKind,
        hydrated: &HydratedTrade,
        owners: Vec<Owner>,
    ) -> ApplicationResult<usize> {
        let mut enqueued = 0usize;
        for owner in owners {
            let message = QueuedMessage::new(
                kind,
                hydrated.clone(),
                RecipientContext::Owner {
                    owner_id: owner.id,
                    team_id: owner.team_id,
                    email: owner.email,
                    display_name: owner.display_name,
                },
            );
            self.queue
                .publish(QUEUE_EMAIL, message)
                .await
                .map_err(|e| ApplicationError::queue(e.to_string()))?;
            enqueued += 1;
        }
        info!(
            trade_id = %hydrated.trade.id(),
            kind = %kind,
            enqueued,
            "enqueued trade notifications"
        );
        Ok(enqueued)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::queue::{Delivery, QueueError};
    use crate::application::use_cases::{StoreError, StoreResult};
    use crate::domain::entities::{
        AssetDetails, DraftPick, HydratedItem, Participant, Player, TradeItem,
    };
    use crate::domain::value_objects::{
        AssetKind, ItemId, ParticipantId, ParticipantRole, TradeStatus,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Default)]
    struct MockStore {
        trades: Mutex<HashMap<TradeId, Trade>>,
    }

    impl MockStore {
        fn with_trade(trade: Trade) -> Self {
            let store = Self::default();
            store.trades.lock().unwrap().insert(trade.id(), trade);
            store
        }
    }

    #[async_trait]
    impl TradeStore for MockStore {
        async fn create_trade(&self, trade: &Trade) -> StoreResult<()> {
            self.trades.lock().unwrap().insert(trade.id(), trade.clone());
            Ok(())
        }

        async fn get_trade_by_id(&self, id: TradeId) -> StoreResult<Trade> {
            self.trades
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StoreError::TradeNotFound(id))
        }

        async fn update_status(&self, id: TradeId, _status: TradeStatus) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn update_declined_by(
            &self,
            id: TradeId,
            _participant_id: ParticipantId,
            _reason: Option<String>,
        ) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn update_accepted_by(
            &self,
            id: TradeId,
            _participant_ids: Vec<ParticipantId>,
        ) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn record_acceptance(
            &self,
            id: TradeId,
            _participant_id: ParticipantId,
        ) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn update_participants(
            &self,
            id: TradeId,
            _add: Vec<Participant>,
            _remove: Vec<ParticipantId>,
        ) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn update_items(
            &self,
            id: TradeId,
            _add: Vec<TradeItem>,
            _remove: Vec<ItemId>,
        ) -> StoreResult<Trade> {
            self.get_trade_by_id(id).await
        }

        async fn delete_trade(&self, id: TradeId) -> StoreResult<()> {
            self.trades
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::TradeNotFound(id))
        }

        async fn hydrate_trade(&self, trade: &Trade) -> StoreResult<HydratedTrade> {
            let items = trade
                .items()
                .iter()
                .map(|item| HydratedItem {
                    item: item.clone(),
                    asset: match item.asset_kind() {
                        AssetKind::Player => AssetDetails::Player(Player {
                            id: item.entity_id(),
                            name: "Test Player".to_string(),
                            position: "RB".to_string(),
                            team_id: item.sender_team(),
                        }),
                        AssetKind::DraftPick => AssetDetails::DraftPick(DraftPick {
                            id: item.entity_id(),
                            season: 2027,
                            round: 1,
                            team_id: item.sender_team(),
                        }),
                    },
                })
                .collect();
            Ok(HydratedTrade::new(trade.clone(), items))
        }
    }

    #[derive(Debug, Default)]
    struct MockDirectory {
        owners: Mutex<Vec<Owner>>,
    }

    impl MockDirectory {
        fn with_owners(owners: Vec<Owner>) -> Self {
            Self {
                owners: Mutex::new(owners),
            }
        }
    }

    #[async_trait]
    impl RosterDirectory for MockDirectory {
        async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, String> {
            Ok(self
                .owners
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id == id)
                .cloned())
        }

        async fn owners_for_team(&self, team_id: TeamId) -> Result<Vec<Owner>, String> {
            Ok(self
                .owners
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.team_id == team_id)
                .cloned()
                .collect())
        }

        async fn get_player(&self, _id: Uuid) -> Result<Option<Player>, String> {
            Ok(None)
        }

        async fn get_draft_pick(&self, _id: Uuid) -> Result<Option<DraftPick>, String> {
            Ok(None)
        }
    }

    #[derive(Debug, Default)]
    struct MockQueue {
        published: Mutex<Vec<(String, QueuedMessage)>>,
    }

    #[async_trait]
    impl DeliveryQueue for MockQueue {
        async fn publish(&self, queue: &str, message: QueuedMessage) -> Result<(), QueueError> {
            self.published
                .lock()
                .unwrap()
                .push((queue.to_string(), message));
            Ok(())
        }

        async fn pull(&self, _queue: &str, _max: usize) -> Result<Vec<Delivery>, QueueError> {
            Ok(vec![])
        }

        async fn ack(&self, _queue: &str, tag: u64) -> Result<(), QueueError> {
            Err(QueueError::UnknownTag(tag))
        }

        async fn nack(&self, _queue: &str, tag: u64) -> Result<(), QueueError> {
            Err(QueueError::UnknownTag(tag))
        }

        async fn recover(&self, _queue: &str) -> Result<usize, QueueError> {
            Ok(0)
        }
    }

    fn owner(team: TeamId, email: &str) -> Owner {
        Owner {
            id: OwnerId::new_v4(),
            team_id: team,
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
        }
    }

    struct Fixture {
        creator_team: TeamId,
        recipient_a: TeamId,
        recipient_b: TeamId,
        trade: Trade,
    }

    fn three_team_trade(status: TradeStatus) -> Fixture {
        let creator_team = TeamId::new_v4();
        let recipient_a = TeamId::new_v4();
        let recipient_b = TeamId::new_v4();
        let trade = Trade::builder(status)
            .participant(creator_team, ParticipantRole::Creator)
            .participant(recipient_a, ParticipantRole::Recipient)
            .participant(recipient_b, ParticipantRole::Recipient)
            .item(AssetKind::Player, Uuid::new_v4(), creator_team, recipient_a)
            .item(AssetKind::DraftPick, Uuid::new_v4(), recipient_b, creator_team)
            .build()
            .unwrap();
        Fixture {
            creator_team,
            recipient_a,
            recipient_b,
            trade,
        }
    }

    fn dispatcher_with(
        trade: Trade,
        owners: Vec<Owner>,
    ) -> (NotificationDispatcher, Arc<MockQueue>) {
        let queue = Arc::new(MockQueue::default());
        let dispatcher = NotificationDispatcher::new(
            Arc::new(MockStore::with_trade(trade)),
            Arc::new(MockDirectory::with_owners(owners)),
            Arc::clone(&queue) as Arc<dyn DeliveryQueue>,
            "trade-announce",
        );
        (dispatcher, queue)
    }

    #[tokio::test]
    async fn requested_targets_recipient_owners_only() {
        let fx = three_team_trade(TradeStatus::Requested);
        let owners = vec![
            owner(fx.creator_team, "creator@league.test"),
            owner(fx.recipient_a, "a1@league.test"),
            owner(fx.recipient_a, "a2@league.test"),
            owner(fx.recipient_b, "b1@league.test"),
        ];
        let (dispatcher, queue) = dispatcher_with(fx.trade.clone(), owners);

        let enqueued = dispatcher.dispatch_requested(fx.trade.id()).await.unwrap();
        assert_eq!(enqueued, 3);

        let published = queue.published.lock().unwrap();
        assert!(published.iter().all(|(q, _)| q == QUEUE_EMAIL));
        assert!(published.iter().all(|(_, m)| {
            !matches!(&m.recipient, RecipientContext::Owner { email, .. } if email.starts_with("creator"))
        }));
    }

    #[tokio::test]
    async fn requested_rejects_status_mismatch() {
        let fx = three_team_trade(TradeStatus::Draft);
        let (dispatcher, queue) = dispatcher_with(fx.trade.clone(), vec![]);

        let result = dispatcher.dispatch_requested(fx.trade.id()).await;
        assert!(matches!(result, Err(ApplicationError::BadRequest(_))));
        assert!(queue.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn declined_excludes_the_declining_individual() {
        let fx = three_team_trade(TradeStatus::Requested);
        let mut trade = fx.trade.clone();
        let decliner_participant = trade
            .recipients()
            .find(|p| p.team_id() == fx.recipient_a)
            .unwrap()
            .id();
        trade.apply_decline(decliner_participant, None).unwrap();

        let declining_owner = owner(fx.recipient_a, "decliner@league.test");
        let owners = vec![
            owner(fx.creator_team, "creator@league.test"),
            declining_owner.clone(),
            owner(fx.recipient_a, "co-owner@league.test"),
            owner(fx.recipient_b, "b1@league.test"),
        ];
        let (dispatcher, queue) = dispatcher_with(trade.clone(), owners);

        let enqueued = dispatcher
            .dispatch_declined(trade.id(), Some(declining_owner.id))
            .await
            .unwrap();
        // Creator owner, the co-owner on the declining team, and the other
        // recipient's owner; the declining individual is skipped.
        assert_eq!(enqueued, 3);

        let published = queue.published.lock().unwrap();
        assert!(published.iter().all(|(_, m)| {
            !matches!(&m.recipient, RecipientContext::Owner { owner_id, .. } if *owner_id == declining_owner.id)
        }));
    }

    #[tokio::test]
    async fn accepted_targets_creator_owners() {
        let fx = three_team_trade(TradeStatus::Requested);
        let mut trade = fx.trade.clone();
        let recipients: Vec<ParticipantId> = trade.recipients().map(|p| p.id()).collect();
        for id in recipients {
            trade.apply_acceptance(id).unwrap();
        }
        assert_eq!(trade.status(), TradeStatus::Accepted);

        let owners = vec![
            owner(fx.creator_team, "creator@league.test"),
            owner(fx.recipient_a, "a1@league.test"),
        ];
        let (dispatcher, queue) = dispatcher_with(trade.clone(), owners);

        let enqueued = dispatcher.dispatch_accepted(trade.id()).await.unwrap();
        assert_eq!(enqueued, 1);
        let published = queue.published.lock().unwrap();
        assert!(matches!(
            &published[0].1.recipient,
            RecipientContext::Owner { email, .. } if email == "creator@league.test"
        ));
    }

    #[tokio::test]
    async fn submitted_is_one_broadcast() {
        let fx = three_team_trade(TradeStatus::Requested);
        let mut trade = fx.trade.clone();
        let recipients: Vec<ParticipantId> = trade.recipients().map(|p| p.id()).collect();
        for id in recipients {
            trade.apply_acceptance(id).unwrap();
        }
        trade.apply_submission().unwrap();

        let (dispatcher, queue) = dispatcher_with(trade.clone(), vec![]);
        let enqueued = dispatcher.dispatch_submitted(trade.id()).await.unwrap();
        assert_eq!(enqueued, 1);

        let published = queue.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, QUEUE_CHAT_ANNOUNCE);
        assert!(matches!(
            &published[0].1.recipient,
            RecipientContext::Channel { name } if name == "trade-announce"
        ));
    }

    #[tokio::test]
    async fn dispatch_for_missing_trade_is_not_found() {
        let fx = three_team_trade(TradeStatus::Requested);
        let (dispatcher, _) = dispatcher_with(fx.trade, vec![]);
        let result = dispatcher.dispatch_requested(TradeId::new_v4()).await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }
}
