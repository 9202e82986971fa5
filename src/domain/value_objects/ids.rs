//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! This module provides newtype wrappers for all domain identifiers,
//! ensuring type safety and preventing accidental mixing of different ID
//! types. A participant id can never be passed where a team id is expected.
//!
//! All identifiers are UUID-based:
//!
//! - [`TradeId`] - Trade aggregate identifier
//! - [`ParticipantId`] - Per-trade participant identifier
//! - [`ItemId`] - Per-trade item identifier
//! - [`TeamId`] - League team identifier
//! - [`OwnerId`] - Human team-owner identifier
//! - [`EventId`] - Domain event identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generates a new random identifier using UUID v4.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id! {
    /// Trade aggregate identifier.
    ///
    /// Uniquely identifies one multi-team trade proposal. Immutable once
    /// the trade is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use league_trades::domain::value_objects::TradeId;
    ///
    /// let trade_id = TradeId::new_v4();
    /// println!("Trade: {}", trade_id);
    /// ```
    TradeId
}

uuid_id! {
    /// Per-trade participant identifier.
    ///
    /// Participant identity is independent per trade: the same team appearing
    /// in two trades yields two distinct participant ids. Consent in
    /// `accepted_by` is recorded against this identity.
    ParticipantId
}

uuid_id! {
    /// Per-trade item identifier.
    ///
    /// Items are exclusively owned by their trade and replaced wholesale
    /// while the trade is still a draft.
    ItemId
}

uuid_id! {
    /// League team identifier.
    ///
    /// Teams exist outside any single trade; participants bind a team to a
    /// role within one trade.
    TeamId
}

uuid_id! {
    /// Human team-owner identifier.
    ///
    /// A team may have several owners; any of them may act on behalf of the
    /// team for authorization purposes.
    OwnerId
}

uuid_id! {
    /// Domain event identifier.
    EventId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_v4_generates_distinct_ids() {
        assert_ne!(TradeId::new_v4(), TradeId::new_v4());
    }

    #[test]
    fn display_is_hyphenated() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = TradeId::new(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn from_str_roundtrip() {
        let id = ParticipantId::new_v4();
        let parsed: ParticipantId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("not-a-uuid".parse::<TeamId>().is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let id = OwnerId::new_v4();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: OwnerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn get_returns_inner_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(ItemId::new(uuid).get(), uuid);
    }
}
