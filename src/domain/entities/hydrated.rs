//! # Hydrated Trade Projection
//!
//! Read-optimized projection pairing each item with its resolved asset.
//!
//! Hydration is a read-time join: the trade store resolves every item's
//! opaque entity id into the concrete [`Player`] or [`DraftPick`] record so
//! renderers and reports have complete data. The projection is never stored.

use crate::domain::entities::{DraftPick, Player, Trade, TradeItem};
use serde::{Deserialize, Serialize};

/// Resolved asset details for one item.
///
/// A sum type matched exhaustively at every point of use; the item's
/// [`AssetKind`](crate::domain::value_objects::AssetKind) discriminant and
/// this payload always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetDetails {
    /// A resolved player record.
    Player(Player),
    /// A resolved draft pick record.
    DraftPick(DraftPick),
}

impl AssetDetails {
    /// Returns a short human-readable label for rendered messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Player(p) => format!("{} ({})", p.name, p.position),
            Self::DraftPick(p) => format!("{} round {} pick", p.season, p.round),
        }
    }
}

/// One item together with its resolved asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedItem {
    /// The raw item as stored on the trade.
    pub item: TradeItem,
    /// The resolved player or draft pick record.
    pub asset: AssetDetails,
}

/// A trade together with the resolved assets of all its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedTrade {
    /// The underlying trade aggregate.
    pub trade: Trade,
    /// One hydrated entry per item, in item order.
    pub items: Vec<HydratedItem>,
}

impl HydratedTrade {
    /// Creates a hydrated projection.
    ///
    /// Callers are expected to supply one hydrated entry per trade item;
    /// the trade store enforces this when it performs the join.
    #[must_use]
    pub fn new(trade: Trade, items: Vec<HydratedItem>) -> Self {
        Self { trade, items }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TeamId;
    use uuid::Uuid;

    #[test]
    fn player_label() {
        let details = AssetDetails::Player(Player {
            id: Uuid::new_v4(),
            name: "Jordan Blake".to_string(),
            position: "WR".to_string(),
            team_id: TeamId::new_v4(),
        });
        assert_eq!(details.label(), "Jordan Blake (WR)");
    }

    #[test]
    fn draft_pick_label() {
        let details = AssetDetails::DraftPick(DraftPick {
            id: Uuid::new_v4(),
            season: 2027,
            round: 1,
            team_id: TeamId::new_v4(),
        });
        assert_eq!(details.label(), "2027 round 1 pick");
    }

    #[test]
    fn asset_details_serde_is_tagged() {
        let details = AssetDetails::DraftPick(DraftPick {
            id: Uuid::new_v4(),
            season: 2026,
            round: 2,
            team_id: TeamId::new_v4(),
        });
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["kind"], "DRAFT_PICK");
    }
}
