//! In-memory roster and leaderboard ranking

use crate::error::{EngineError, Result};
use crate::store::RosterProvider;
use crate::types::{LeaderboardEntry, Player, PlayerId};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::RwLock;
use tracing::debug;

/// Roster kept in registration order
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    players: RwLock<Vec<Player>>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a roster pre-filled with players
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players),
        }
    }

    /// Current roster contents
    pub fn snapshot(&self) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire roster read lock".to_string(),
            })?;

        Ok(players.clone())
    }
}

#[async_trait]
impl RosterProvider for InMemoryRoster {
    async fn get_players(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire roster read lock".to_string(),
            })?;

        Ok(player_ids
            .iter()
            .filter_map(|id| players.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    async fn all_players(&self) -> Result<Vec<Player>> {
        self.snapshot()
    }

    async fn register_player(&self, player: Player) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire roster write lock".to_string(),
            })?;

        if players.iter().any(|p| p.id == player.id) {
            return Err(EngineError::invalid_input(format!(
                "player {} is already registered",
                player.id
            ))
            .into());
        }

        debug!(
            "Registered player {} ({}) with power {}",
            player.id, player.name, player.power
        );
        players.push(player);
        Ok(())
    }

    async fn update_power(&self, player_id: &str, power: f64) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire roster write lock".to_string(),
            })?;

        let player = players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| EngineError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;

        player.power = power;
        Ok(())
    }

    async fn remove_player(&self, player_id: &str) -> Result<bool> {
        let mut players = self
            .players
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire roster write lock".to_string(),
            })?;

        let before = players.len();
        players.retain(|p| p.id != player_id);
        Ok(players.len() != before)
    }
}

/// Rank players by power, highest first
///
/// Tied powers share the rank of the first player in the tie and the next
/// distinct power resumes at its position ("1224" ranking). Equal players keep
/// their input order.
pub fn rank_players(mut players: Vec<Player>) -> Vec<LeaderboardEntry> {
    players.sort_by(|a, b| b.power.partial_cmp(&a.power).unwrap_or(Ordering::Equal));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(players.len());
    for (index, player) in players.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(previous) if previous.player.power == player.power => previous.rank,
            _ => index + 1,
        };
        entries.push(LeaderboardEntry { rank, player });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> InMemoryRoster {
        InMemoryRoster::with_players(vec![
            Player::new("p1", "Alice", 7.0),
            Player::new("p2", "Bob", 5.0),
            Player::new("p3", "Carol", 3.0),
            Player::new("p4", "Dave", 5.0),
        ])
    }

    #[tokio::test]
    async fn test_get_players_in_request_order() {
        let roster = sample_roster();
        let ids = vec!["p3".to_string(), "missing".to_string(), "p1".to_string()];

        let players = roster.get_players(&ids).await.unwrap();
        let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
    }

    #[tokio::test]
    async fn test_register_update_remove() {
        let roster = InMemoryRoster::new();
        roster
            .register_player(Player::new("p1", "Alice", 5.0))
            .await
            .unwrap();

        // duplicate ids are refused
        assert!(roster
            .register_player(Player::new("p1", "Again", 1.0))
            .await
            .is_err());

        roster.update_power("p1", 6.5).await.unwrap();
        assert_eq!(roster.all_players().await.unwrap()[0].power, 6.5);

        let err = roster.update_power("ghost", 1.0).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::PlayerNotFound { .. })
        ));

        assert!(roster.remove_player("p1").await.unwrap());
        assert!(!roster.remove_player("p1").await.unwrap());
        assert!(roster.all_players().await.unwrap().is_empty());
    }

    #[test]
    fn test_rank_players_shares_tied_ranks() {
        let entries = rank_players(sample_roster().snapshot().unwrap());

        let ranks: Vec<_> = entries
            .iter()
            .map(|e| (e.rank, e.player.id.as_str()))
            .collect();
        assert_eq!(ranks, vec![(1, "p1"), (2, "p2"), (2, "p4"), (4, "p3")]);
    }

    #[test]
    fn test_rank_players_empty() {
        assert!(rank_players(Vec::new()).is_empty());
    }
}
