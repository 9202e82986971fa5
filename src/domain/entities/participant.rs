//! # Participant Entity
//!
//! Binds a team to a role within exactly one trade.
//!
//! Participant identity is independent per trade: the same team appearing in
//! two trades yields two distinct participant records, and consent in
//! `accepted_by` is recorded against the participant id, not the team id.

use crate::domain::value_objects::{ParticipantId, ParticipantRole, TeamId, TradeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A team's role within one trade.
///
/// # Examples
///
/// ```
/// use league_trades::domain::entities::Participant;
/// use league_trades::domain::value_objects::{ParticipantRole, TeamId, TradeId};
///
/// let participant = Participant::new(
///     TradeId::new_v4(),
///     TeamId::new_v4(),
///     ParticipantRole::Recipient,
/// );
/// assert!(participant.role().is_recipient());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier, scoped to this trade.
    id: ParticipantId,
    /// The trade this participant belongs to.
    trade_id: TradeId,
    /// The team this participant represents.
    team_id: TeamId,
    /// The role the team holds in this trade.
    role: ParticipantRole,
}

impl Participant {
    /// Creates a new participant with a fresh identifier.
    #[must_use]
    pub fn new(trade_id: TradeId, team_id: TeamId, role: ParticipantRole) -> Self {
        Self {
            id: ParticipantId::new_v4(),
            trade_id,
            team_id,
            role,
        }
    }

    /// Reconstructs a participant from storage.
    #[must_use]
    pub const fn from_parts(
        id: ParticipantId,
        trade_id: TradeId,
        team_id: TeamId,
        role: ParticipantRole,
    ) -> Self {
        Self {
            id,
            trade_id,
            team_id,
            role,
        }
    }

    /// Returns the participant id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Returns the trade this participant belongs to.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        self.trade_id
    }

    /// Returns the team this participant represents.
    #[inline]
    #[must_use]
    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the participant's role.
    #[inline]
    #[must_use]
    pub fn role(&self) -> ParticipantRole {
        self.role
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Participant({} {} [{}])", self.id, self.team_id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_fresh_id() {
        let trade_id = TradeId::new_v4();
        let team_id = TeamId::new_v4();
        let a = Participant::new(trade_id, team_id, ParticipantRole::Recipient);
        let b = Participant::new(trade_id, team_id, ParticipantRole::Recipient);

        // Same team, same trade, distinct participant identities.
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn from_parts_preserves_identity() {
        let id = ParticipantId::new_v4();
        let p = Participant::from_parts(
            id,
            TradeId::new_v4(),
            TeamId::new_v4(),
            ParticipantRole::Creator,
        );
        assert_eq!(p.id(), id);
        assert!(p.role().is_creator());
    }
}
