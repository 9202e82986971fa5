//! # Trade Item Entity
//!
//! One traded asset: a player or a draft pick moving between two teams.
//!
//! Items are exclusively owned by their trade. While the trade is a draft
//! they are replaced wholesale, never patched.

use crate::domain::value_objects::{AssetKind, ItemId, TeamId, TradeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One traded asset with a sender and recipient team.
///
/// The `entity_id` is opaque to the negotiation engine; hydration resolves it
/// into a concrete player or draft pick record for presentation.
///
/// # Examples
///
/// ```
/// use league_trades::domain::entities::TradeItem;
/// use league_trades::domain::value_objects::{AssetKind, TeamId, TradeId};
/// use uuid::Uuid;
///
/// let item = TradeItem::new(
///     TradeId::new_v4(),
///     AssetKind::Player,
///     Uuid::new_v4(),
///     TeamId::new_v4(),
///     TeamId::new_v4(),
/// );
/// assert_eq!(item.asset_kind(), AssetKind::Player);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeItem {
    /// Unique identifier, scoped to this trade.
    id: ItemId,
    /// The trade this item belongs to.
    trade_id: TradeId,
    /// Kind of the referenced asset.
    asset_kind: AssetKind,
    /// Opaque reference to the player or draft pick record.
    entity_id: Uuid,
    /// The team giving the asset up.
    sender_team: TeamId,
    /// The team receiving the asset.
    recipient_team: TeamId,
}

impl TradeItem {
    /// Creates a new item with a fresh identifier.
    #[must_use]
    pub fn new(
        trade_id: TradeId,
        asset_kind: AssetKind,
        entity_id: Uuid,
        sender_team: TeamId,
        recipient_team: TeamId,
    ) -> Self {
        Self {
            id: ItemId::new_v4(),
            trade_id,
            asset_kind,
            entity_id,
            sender_team,
            recipient_team,
        }
    }

    /// Reconstructs an item from storage.
    #[must_use]
    pub const fn from_parts(
        id: ItemId,
        trade_id: TradeId,
        asset_kind: AssetKind,
        entity_id: Uuid,
        sender_team: TeamId,
        recipient_team: TeamId,
    ) -> Self {
        Self {
            id,
            trade_id,
            asset_kind,
            entity_id,
            sender_team,
            recipient_team,
        }
    }

    /// Returns the item id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the trade this item belongs to.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        self.trade_id
    }

    /// Returns the kind of the referenced asset.
    #[inline]
    #[must_use]
    pub fn asset_kind(&self) -> AssetKind {
        self.asset_kind
    }

    /// Returns the opaque entity reference.
    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> Uuid {
        self.entity_id
    }

    /// Returns the team giving the asset up.
    #[inline]
    #[must_use]
    pub fn sender_team(&self) -> TeamId {
        self.sender_team
    }

    /// Returns the team receiving the asset.
    #[inline]
    #[must_use]
    pub fn recipient_team(&self) -> TeamId {
        self.recipient_team
    }
}

impl fmt::Display for TradeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradeItem({} {} {} -> {})",
            self.id, self.asset_kind, self.sender_team, self.recipient_team
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_fresh_id() {
        let trade_id = TradeId::new_v4();
        let entity = Uuid::new_v4();
        let sender = TeamId::new_v4();
        let recipient = TeamId::new_v4();

        let a = TradeItem::new(trade_id, AssetKind::Player, entity, sender, recipient);
        let b = TradeItem::new(trade_id, AssetKind::Player, entity, sender, recipient);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn accessors() {
        let trade_id = TradeId::new_v4();
        let entity = Uuid::new_v4();
        let sender = TeamId::new_v4();
        let recipient = TeamId::new_v4();

        let item = TradeItem::new(trade_id, AssetKind::DraftPick, entity, sender, recipient);
        assert_eq!(item.trade_id(), trade_id);
        assert_eq!(item.entity_id(), entity);
        assert_eq!(item.sender_team(), sender);
        assert_eq!(item.recipient_team(), recipient);
    }
}
