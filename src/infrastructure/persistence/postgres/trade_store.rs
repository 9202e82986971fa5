//! # PostgreSQL Trade Store
//!
//! PostgreSQL implementation of [`TradeStore`] using sqlx.
//!
//! The aggregate spans three tables: `trades`, `trade_participants`, and
//! `trade_items`. Creation persists the children before the trade row inside
//! one transaction, re-reads the aggregate, and aborts if the re-read fails
//! validation. Consent mutations take `SELECT ... FOR UPDATE` on the trade
//! row so racing accepts serialize on the row lock and no append is lost.

use crate::application::use_cases::{RosterDirectory, StoreError, StoreResult, TradeStore};
use crate::domain::entities::{
    AssetDetails, HydratedItem, HydratedTrade, Participant, Trade, TradeItem,
};
use crate::domain::value_objects::{
    AssetKind, ItemId, ParticipantId, ParticipantRole, TeamId, Timestamp, TradeId, TradeStatus,
};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use uuid::Uuid;

/// PostgreSQL implementation of [`TradeStore`].
///
/// Uses connection pooling via `sqlx::PgPool`. Asset hydration goes through
/// the injected roster directory, not the trade tables.
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use league_trades::infrastructure::persistence::PostgresTradeStore;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let store = PostgresTradeStore::new(pool, directory);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTradeStore {
    pool: PgPool,
    directory: Arc<dyn RosterDirectory>,
}

impl PostgresTradeStore {
    /// Creates a new PostgreSQL trade store.
    #[must_use]
    pub fn new(pool: PgPool, directory: Arc<dyn RosterDirectory>) -> Self {
        Self { pool, directory }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads a full aggregate within the given connection, optionally taking
    /// a row lock on the trade row.
    async fn load_trade(
        conn: &mut PgConnection,
        id: TradeId,
        for_update: bool,
    ) -> StoreResult<Trade> {
        let query = if for_update {
            "SELECT id, status, accepted_by, accepted_on, declined_by, declined_reason,
                    version, created_at, updated_at
             FROM trades WHERE id = $1 FOR UPDATE"
        } else {
            "SELECT id, status, accepted_by, accepted_on, declined_by, declined_reason,
                    version, created_at, updated_at
             FROM trades WHERE id = $1"
        };

        let row: Option<TradeRow> = sqlx::query_as(query)
            .bind(id.get())
            .fetch_optional(&mut *conn)
            .await
            .map_err(backend)?;
        let row = row.ok_or(StoreError::TradeNotFound(id))?;

        let participants: Vec<ParticipantRow> = sqlx::query_as(
            "SELECT id, trade_id, team_id, role
             FROM trade_participants WHERE trade_id = $1 ORDER BY id",
        )
        .bind(id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(backend)?;

        let items: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, trade_id, asset_kind, entity_id, sender_team, recipient_team
             FROM trade_items WHERE trade_id = $1 ORDER BY id",
        )
        .bind(id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(backend)?;

        row.try_into_trade(participants, items)
    }

    /// Writes the negotiation fields of a trade back to its row.
    async fn persist_negotiation_fields(conn: &mut PgConnection, trade: &Trade) -> StoreResult<()> {
        let accepted_by: Vec<Uuid> = trade.accepted_by().iter().map(|p| p.get()).collect();
        let accepted_by = serde_json::to_value(accepted_by).map_err(|e| {
            StoreError::Backend(format!("failed to serialize accepted_by: {e}"))
        })?;

        sqlx::query(
            "UPDATE trades
             SET status = $2, accepted_by = $3, accepted_on = $4, declined_by = $5,
                 declined_reason = $6, version = $7, updated_at = $8
             WHERE id = $1",
        )
        .bind(trade.id().get())
        .bind(trade.status().to_string())
        .bind(accepted_by)
        .bind(trade.accepted_on().map(|t| t.timestamp_millis()))
        .bind(trade.declined_by().map(|p| p.get()))
        .bind(trade.declined_reason())
        .bind(trade.version() as i64)
        .bind(trade.updated_at().timestamp_millis())
        .execute(&mut *conn)
        .await
        .map_err(backend)?;
        Ok(())
    }

    /// Inserts participant rows.
    async fn insert_participants(
        conn: &mut PgConnection,
        participants: &[Participant],
    ) -> StoreResult<()> {
        for participant in participants {
            sqlx::query(
                "INSERT INTO trade_participants (id, trade_id, team_id, role)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(participant.id().get())
            .bind(participant.trade_id().get())
            .bind(participant.team_id().get())
            .bind(participant.role().to_string())
            .execute(&mut *conn)
            .await
            .map_err(backend)?;
        }
        Ok(())
    }

    /// Inserts item rows.
    async fn insert_items(conn: &mut PgConnection, items: &[TradeItem]) -> StoreResult<()> {
        for item in items {
            sqlx::query(
                "INSERT INTO trade_items
                     (id, trade_id, asset_kind, entity_id, sender_team, recipient_team)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(item.id().get())
            .bind(item.trade_id().get())
            .bind(item.asset_kind().to_string())
            .bind(item.entity_id())
            .bind(item.sender_team().get())
            .bind(item.recipient_team().get())
            .execute(&mut *conn)
            .await
            .map_err(backend)?;
        }
        Ok(())
    }

    /// Bumps the version and updated_at of the trade row.
    async fn touch_trade_row(conn: &mut PgConnection, id: TradeId) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE trades SET version = version + 1, updated_at = $2 WHERE id = $1",
        )
        .bind(id.get())
        .bind(Timestamp::now().timestamp_millis())
        .execute(&mut *conn)
        .await
        .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::TradeNotFound(id));
        }
        Ok(())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl TradeStore for PostgresTradeStore {
    async fn create_trade(&self, trade: &Trade) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        // Children first, then the trade row; the whole transaction aborts
        // if the re-read aggregate fails validation.
        Self::insert_participants(&mut *tx, trade.participants()).await?;
        Self::insert_items(&mut *tx, trade.items()).await?;

        let accepted_by: Vec<Uuid> = trade.accepted_by().iter().map(|p| p.get()).collect();
        let accepted_by = serde_json::to_value(accepted_by).map_err(|e| {
            StoreError::Backend(format!("failed to serialize accepted_by: {e}"))
        })?;

        sqlx::query(
            "INSERT INTO trades
                 (id, status, accepted_by, accepted_on, declined_by, declined_reason,
                  version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(trade.id().get())
        .bind(trade.status().to_string())
        .bind(accepted_by)
        .bind(trade.accepted_on().map(|t| t.timestamp_millis()))
        .bind(trade.declined_by().map(|p| p.get()))
        .bind(trade.declined_reason())
        .bind(trade.version() as i64)
        .bind(trade.created_at().timestamp_millis())
        .bind(trade.updated_at().timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        let persisted = Self::load_trade(&mut *tx, trade.id(), false).await?;
        persisted.validate()?;

        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn get_trade_by_id(&self, id: TradeId) -> StoreResult<Trade> {
        let mut conn = self.pool.acquire().await.map_err(backend)?;
        Self::load_trade(&mut *conn, id, false).await
    }

    async fn update_status(&self, id: TradeId, status: TradeStatus) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let result = sqlx::query(
            "UPDATE trades SET status = $2, version = version + 1, updated_at = $3
             WHERE id = $1",
        )
        .bind(id.get())
        .bind(status.to_string())
        .bind(Timestamp::now().timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::TradeNotFound(id));
        }

        let trade = Self::load_trade(&mut *tx, id, false).await?;
        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn update_declined_by(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
        reason: Option<String>,
    ) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let mut trade = Self::load_trade(&mut *tx, id, true).await?;
        trade.apply_decline(participant_id, reason)?;
        Self::persist_negotiation_fields(&mut *tx, &trade).await?;

        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn update_accepted_by(
        &self,
        id: TradeId,
        participant_ids: Vec<ParticipantId>,
    ) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let trade = Self::load_trade(&mut *tx, id, true).await?;
        let trade = Trade::from_parts(
            trade.id(),
            trade.status(),
            trade.participants().to_vec(),
            trade.items().to_vec(),
            participant_ids,
            trade.accepted_on(),
            trade.declined_by(),
            trade.declined_reason().map(str::to_string),
            trade.version() + 1,
            trade.created_at(),
            Timestamp::now(),
        );
        Self::persist_negotiation_fields(&mut *tx, &trade).await?;

        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn record_acceptance(
        &self,
        id: TradeId,
        participant_id: ParticipantId,
    ) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        // The row lock serializes racing accepts; each sees the previous
        // append before recomputing the status.
        let mut trade = Self::load_trade(&mut *tx, id, true).await?;
        trade.apply_acceptance(participant_id)?;
        Self::persist_negotiation_fields(&mut *tx, &trade).await?;

        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn update_participants(
        &self,
        id: TradeId,
        add: Vec<Participant>,
        remove: Vec<ParticipantId>,
    ) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        if !remove.is_empty() {
            let ids: Vec<Uuid> = remove.iter().map(|p| p.get()).collect();
            sqlx::query("DELETE FROM trade_participants WHERE trade_id = $1 AND id = ANY($2)")
                .bind(id.get())
                .bind(&ids)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
        }
        Self::insert_participants(&mut *tx, &add).await?;
        Self::touch_trade_row(&mut *tx, id).await?;

        let trade = Self::load_trade(&mut *tx, id, false).await?;
        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn update_items(
        &self,
        id: TradeId,
        add: Vec<TradeItem>,
        remove: Vec<ItemId>,
    ) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        if !remove.is_empty() {
            let ids: Vec<Uuid> = remove.iter().map(|i| i.get()).collect();
            sqlx::query("DELETE FROM trade_items WHERE trade_id = $1 AND id = ANY($2)")
                .bind(id.get())
                .bind(&ids)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
        }
        Self::insert_items(&mut *tx, &add).await?;
        Self::touch_trade_row(&mut *tx, id).await?;

        let trade = Self::load_trade(&mut *tx, id, false).await?;
        tx.commit().await.map_err(backend)?;
        Ok(trade)
    }

    async fn delete_trade(&self, id: TradeId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("DELETE FROM trade_items WHERE trade_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        sqlx::query("DELETE FROM trade_participants WHERE trade_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        let result = sqlx::query("DELETE FROM trades WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::TradeNotFound(id));
        }

        tx.commit().await.map_err(backend)?;
        Ok(())
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

/// Row type for trade queries.
#[derive(Debug, sqlx::FromRow)]
struct TradeRow {
    id: Uuid,
    status: String,
    accepted_by: serde_json::Value,
    accepted_on: Option<i64>,
    declined_by: Option<Uuid>,
    declined_reason: Option<String>,
    version: i64,
    created_at: i64,
    updated_at: i64,
}

impl TradeRow {
    /// Converts the row plus its children into a trade aggregate.
    fn try_into_trade(
        self,
        participants: Vec<ParticipantRow>,
        items: Vec<ItemRow>,
    ) -> StoreResult<Trade> {
        let status: TradeStatus = self
            .status
            .parse()
            .map_err(|e: crate::domain::value_objects::InvalidTradeStatusError| {
                StoreError::Backend(e.to_string())
            })?;
        let accepted_by: Vec<Uuid> = serde_json::from_value(self.accepted_by)
            .map_err(|e| StoreError::Backend(format!("invalid accepted_by: {e}")))?;
        let accepted_on = self
            .accepted_on
            .map(|millis| {
                Timestamp::from_millis(millis)
                    .ok_or_else(|| StoreError::Backend("invalid accepted_on".to_string()))
            })
            .transpose()?;
        let created_at = Timestamp::from_millis(self.created_at)
            .ok_or_else(|| StoreError::Backend("invalid created_at".to_string()))?;
        let updated_at = Timestamp::from_millis(self.updated_at)
            .ok_or_else(|| StoreError::Backend("invalid updated_at".to_string()))?;

        let participants = participants
            .into_iter()
            .map(ParticipantRow::try_into_participant)
            .collect::<StoreResult<Vec<_>>>()?;
        let items = items
            .into_iter()
            .map(ItemRow::try_into_item)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Trade::from_parts(
            TradeId::new(self.id),
            status,
            participants,
            items,
            accepted_by.into_iter().map(ParticipantId::new).collect(),
            accepted_on,
            self.declined_by.map(ParticipantId::new),
            self.declined_reason,
            self.version as u64,
            created_at,
            updated_at,
        ))
    }
}

/// Row type for participant queries.
#[derive(Debug, sqlx::FromRow)]
struct ParticipantRow {
    id: Uuid,
    trade_id: Uuid,
    team_id: Uuid,
    role: String,
}

impl ParticipantRow {
    fn try_into_participant(self) -> StoreResult<Participant> {
        let role: ParticipantRole = self
            .role
            .parse()
            .map_err(|e: crate::domain::value_objects::ParseParticipantRoleError| {
                StoreError::Backend(e.to_string())
            })?;
        Ok(Participant::from_parts(
            ParticipantId::new(self.id),
            TradeId::new(self.trade_id),
            TeamId::new(self.team_id),
            role,
        ))
    }
}

/// Row type for item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    trade_id: Uuid,
    asset_kind: String,
    entity_id: Uuid,
    sender_team: Uuid,
    recipient_team: Uuid,
}

impl ItemRow {
    fn try_into_item(self) -> StoreResult<TradeItem> {
        let kind: AssetKind = self.asset_kind.parse().map_err(
            |e: crate::domain::value_objects::ParseAssetKindError| {
                StoreError::Backend(e.to_string())
            },
        )?;
        Ok(TradeItem::from_parts(
            ItemId::new(self.id),
            TradeId::new(self.trade_id),
            kind,
            self.entity_id,
            TeamId::new(self.sender_team),
            TeamId::new(self.recipient_team),
        ))
    }
}
