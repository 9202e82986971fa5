//! # Asset Kind
//!
//! Discriminant for the two kinds of tradeable assets.
//!
//! A trade item references an asset by opaque entity id plus this
//! discriminant; hydration resolves the pair into the concrete
//! [`Player`](crate::domain::entities::Player) or
//! [`DraftPick`](crate::domain::entities::DraftPick) record. The
//! discriminant is a real enum so every point of use matches exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of asset carried by a trade item.
///
/// # Examples
///
/// ```
/// use league_trades::domain::value_objects::AssetKind;
///
/// let kind: AssetKind = "PLAYER".parse().unwrap();
/// assert_eq!(kind, AssetKind::Player);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    /// A rostered player.
    Player,
    /// A future draft pick.
    DraftPick,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Player => "PLAYER",
            Self::DraftPick => "DRAFT_PICK",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AssetKind {
    type Err = ParseAssetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYER" => Ok(Self::Player),
            "DRAFT_PICK" => Ok(Self::DraftPick),
            _ => Err(ParseAssetKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown asset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssetKindError(pub String);

impl fmt::Display for ParseAssetKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid asset kind: {}", self.0)
    }
}

impl std::error::Error for ParseAssetKindError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        for kind in [AssetKind::Player, AssetKind::DraftPick] {
            let parsed: AssetKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("COACH".parse::<AssetKind>().is_err());
    }

    #[test]
    fn serde_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AssetKind::DraftPick).unwrap(),
            "\"DRAFT_PICK\""
        );
    }
}
