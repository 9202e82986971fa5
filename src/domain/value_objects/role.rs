//! # Participant Role
//!
//! Role a team holds within one trade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a participant within exactly one trade.
///
/// Every valid trade has exactly one [`Creator`](ParticipantRole::Creator)
/// and at least one [`Recipient`](ParticipantRole::Recipient).
///
/// # Examples
///
/// ```
/// use league_trades::domain::value_objects::ParticipantRole;
///
/// assert!(ParticipantRole::Creator.is_creator());
/// assert!(!ParticipantRole::Recipient.is_creator());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    /// The team that proposed the trade.
    Creator,
    /// A team whose consent is required.
    Recipient,
}

impl ParticipantRole {
    /// Returns true if this is the creator role.
    #[inline]
    #[must_use]
    pub const fn is_creator(&self) -> bool {
        matches!(self, Self::Creator)
    }

    /// Returns true if this is the recipient role.
    #[inline]
    #[must_use]
    pub const fn is_recipient(&self) -> bool {
        matches!(self, Self::Recipient)
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Creator => "CREATOR",
            Self::Recipient => "RECIPIENT",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ParticipantRole {
    type Err = ParseParticipantRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATOR" => Ok(Self::Creator),
            "RECIPIENT" => Ok(Self::Recipient),
            _ => Err(ParseParticipantRoleError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown participant role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParticipantRoleError(pub String);

impl fmt::Display for ParseParticipantRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid participant role: {}", self.0)
    }
}

impl std::error::Error for ParseParticipantRoleError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(ParticipantRole::Creator.is_creator());
        assert!(!ParticipantRole::Creator.is_recipient());
        assert!(ParticipantRole::Recipient.is_recipient());
    }

    #[test]
    fn display_and_parse_roundtrip() {
        for role in [ParticipantRole::Creator, ParticipantRole::Recipient] {
            let parsed: ParticipantRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("OWNER".parse::<ParticipantRole>().is_err());
    }

    #[test]
    fn serde_screaming_snake_case() {
        let json = serde_json::to_string(&ParticipantRole::Recipient).unwrap();
        assert_eq!(json, "\"RECIPIENT\"");
    }
}
