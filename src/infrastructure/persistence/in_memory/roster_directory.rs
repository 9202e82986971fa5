//! # In-Memory Roster Directory
//!
//! Seedable in-memory implementation of [`RosterDirectory`] for tests and
//! the default wiring.

use crate::application::use_cases::RosterDirectory;
use crate::domain::entities::{DraftPick, Owner, Player};
use crate::domain::value_objects::{OwnerId, TeamId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory implementation of [`RosterDirectory`].
///
/// Uses thread-safe `HashMap`s for storage. Records are seeded through the
/// `seed_*` methods before the directory is shared.
///
/// # Examples
///
/// ```
/// use league_trades::infrastructure::persistence::InMemoryRosterDirectory;
///
/// let directory = InMemoryRosterDirectory::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterDirectory {
    owners: Arc<RwLock<HashMap<OwnerId, Owner>>>,
    players: Arc<RwLock<HashMap<Uuid, Player>>>,
    picks: Arc<RwLock<HashMap<Uuid, DraftPick>>>,
}

impl InMemoryRosterDirectory {
    /// Creates a new empty in-memory roster directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an owner record.
    pub async fn seed_owner(&self, owner: Owner) {
        self.owners.write().await.insert(owner.id, owner);
    }

    /// Adds or replaces a player record.
    pub async fn seed_player(&self, player: Player) {
        self.players.write().await.insert(player.id, player);
    }

    /// Adds or replaces a draft pick record.
    pub async fn seed_draft_pick(&self, pick: DraftPick) {
        self.picks.write().await.insert(pick.id, pick);
    }
}

#[async_trait]
impl RosterDirectory for InMemoryRosterDirectory {
    async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, String> {
        Ok(self.owners.read().await.get(&id).cloned())
    }

    async fn owners_for_team(&self, team_id: TeamId) -> Result<Vec<Owner>, String> {
        let owners = self.owners.read().await;
        Ok(owners
            .values()
            .filter(|o| o.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, String> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn get_draft_pick(&self, id: Uuid) -> Result<Option<DraftPick>, String> {
        Ok(self.picks.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owner(team_id: TeamId, email: &str) -> Owner {
        Owner {
            id: OwnerId::new_v4(),
            team_id,
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
        }
    }

    #[tokio::test]
    async fn seeded_owner_is_found() {
        let directory = InMemoryRosterDirectory::new();
        let record = owner(TeamId::new_v4(), "alex@league.test");
        directory.seed_owner(record.clone()).await;

        let found = directory.get_owner(record.id).await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn unknown_owner_is_none() {
        let directory = InMemoryRosterDirectory::new();
        assert!(directory.get_owner(OwnerId::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owners_for_team_filters_by_team() {
        let directory = InMemoryRosterDirectory::new();
        let team = TeamId::new_v4();
        directory.seed_owner(owner(team, "one@league.test")).await;
        directory.seed_owner(owner(team, "two@league.test")).await;
        directory
            .seed_owner(owner(TeamId::new_v4(), "other@league.test"))
            .await;

        let owners = directory.owners_for_team(team).await.unwrap();
        assert_eq!(owners.len(), 2);
        assert!(owners.iter().all(|o| o.team_id == team));
    }

    #[tokio::test]
    async fn seeded_assets_are_found() {
        let directory = InMemoryRosterDirectory::new();
        let team = TeamId::new_v4();
        let player = Player {
            id: Uuid::new_v4(),
            name: "Jordan Blake".to_string(),
            position: "WR".to_string(),
            team_id: team,
        };
        let pick = DraftPick {
            id: Uuid::new_v4(),
            season: 2027,
            round: 1,
            team_id: team,
        };
        directory.seed_player(player.clone()).await;
        directory.seed_draft_pick(pick.clone()).await;

        assert_eq!(directory.get_player(player.id).await.unwrap(), Some(player));
        assert_eq!(
            directory.get_draft_pick(pick.id).await.unwrap(),
            Some(pick)
        );
    }
}
