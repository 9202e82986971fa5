//! # Roster Records
//!
//! League roster collaborator records: players, draft picks, and team owners.
//!
//! These records live outside the trade aggregate. The negotiation engine
//! only references them by id; the roster directory resolves them at
//! hydration and notification time.

use crate::domain::value_objects::{OwnerId, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rostered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier.
    pub id: Uuid,
    /// Full player name.
    pub name: String,
    /// Playing position (e.g. "RB", "WR").
    pub position: String,
    /// The team currently holding the player.
    pub team_id: TeamId,
}

/// A future draft pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Unique identifier.
    pub id: Uuid,
    /// Draft season the pick belongs to.
    pub season: u16,
    /// Round number within the draft.
    pub round: u8,
    /// The team currently holding the pick.
    pub team_id: TeamId,
}

/// A human team owner.
///
/// A team may have several owners; any of them may act on behalf of the team
/// for authorization, and each of them is an individual notification target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Unique identifier.
    pub id: OwnerId,
    /// The team this owner belongs to.
    pub team_id: TeamId,
    /// Notification email address.
    pub email: String,
    /// Display name used in rendered messages.
    pub display_name: String,
}
