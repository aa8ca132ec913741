//! Teams, partitions and roster validation shared by all balancers

use crate::config::BalanceStrategy;
use crate::error::{EngineError, Result};
use crate::types::{Player, PlayerId, TeamLabel};
use crate::utils::{power_difference, round_to};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of players; member order carries no meaning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Sum of member power
    pub fn power(&self) -> f64 {
        self.players.iter().map(|p| p.power).sum()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }
}

/// Two equal-size, disjoint teams covering the whole input roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub team_a: Team,
    pub team_b: Team,
    /// Absolute difference of team power
    pub imbalance: f64,
    /// Search that produced this split
    pub strategy: BalanceStrategy,
}

impl Partition {
    pub(crate) fn from_mask(
        players: &[Player],
        in_team_a: &[bool],
        strategy: BalanceStrategy,
    ) -> Self {
        let mut team_a = Vec::with_capacity(players.len() / 2);
        let mut team_b = Vec::with_capacity(players.len() / 2);

        for (player, &on_a) in players.iter().zip(in_team_a) {
            if on_a {
                team_a.push(player.clone());
            } else {
                team_b.push(player.clone());
            }
        }

        let team_a = Team::new(team_a);
        let team_b = Team::new(team_b);
        let imbalance = power_difference(team_a.power(), team_b.power());

        Self {
            team_a,
            team_b,
            imbalance,
            strategy,
        }
    }

    pub fn team(&self, label: TeamLabel) -> &Team {
        match label {
            TeamLabel::A => &self.team_a,
            TeamLabel::B => &self.team_b,
        }
    }

    /// The lower-power team, `None` when both sum to the same power
    pub fn weaker_team(&self) -> Option<TeamLabel> {
        let (a, b) = (self.team_a.power(), self.team_b.power());
        if a < b {
            Some(TeamLabel::A)
        } else if b < a {
            Some(TeamLabel::B)
        } else {
            None
        }
    }

    /// Whether the split is lopsided enough to warn about
    pub fn has_large_gap(&self, threshold: f64, precision: u32) -> bool {
        round_to(self.imbalance, precision) >= threshold
    }
}

/// Check the balancing preconditions
pub fn validate_roster(players: &[Player]) -> Result<()> {
    if players.is_empty() {
        return Err(EngineError::invalid_input("empty roster").into());
    }

    if players.len() % 2 != 0 {
        return Err(EngineError::invalid_input(format!(
            "odd roster size ({} players)",
            players.len()
        ))
        .into());
    }

    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if !player.power.is_finite() {
            return Err(EngineError::invalid_input(format!(
                "player {} has non-finite power {}",
                player.id, player.power
            ))
            .into());
        }
        if !seen.insert(player.id.as_str()) {
            return Err(EngineError::invalid_input(format!(
                "player {} appears more than once in the roster",
                player.id
            ))
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(powers: &[f64]) -> Vec<Player> {
        powers
            .iter()
            .enumerate()
            .map(|(i, &power)| {
                Player::new(format!("p{}", i + 1), format!("Player {}", i + 1), power)
            })
            .collect()
    }

    fn invalid_reason(players: &[Player]) -> String {
        let err = validate_roster(players).unwrap_err();
        match err.downcast_ref::<EngineError>() {
            Some(EngineError::InvalidInput { reason }) => reason.clone(),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_team_power() {
        let team = Team::new(roster(&[10.0, 4.0, -1.5]));
        assert_eq!(team.power(), 12.5);
        assert_eq!(team.len(), 3);
        assert!(team.contains("p2"));
        assert!(!team.contains("p9"));
    }

    #[test]
    fn test_from_mask_and_weaker_team() {
        let players = roster(&[10.0, 8.0, 6.0, 4.0]);
        let mask = [true, true, false, false];
        let partition = Partition::from_mask(&players, &mask, BalanceStrategy::Exact);

        assert_eq!(partition.team_a.ids(), vec!["p1", "p2"]);
        assert_eq!(partition.team_b.ids(), vec!["p3", "p4"]);
        assert_eq!(partition.imbalance, 8.0);
        assert_eq!(partition.weaker_team(), Some(TeamLabel::B));
        assert_eq!(partition.team(TeamLabel::B).power(), 10.0);
    }

    #[test]
    fn test_large_gap_uses_rounded_imbalance() {
        let players = roster(&[5.0, 2.000_000_1, 0.0, 0.0]);
        let mask = [true, false, true, false];
        let partition = Partition::from_mask(&players, &mask, BalanceStrategy::Exact);

        assert!(partition.imbalance < 3.0);
        assert!(partition.has_large_gap(3.0, 2));
        assert!(!partition.has_large_gap(3.5, 2));
    }

    #[test]
    fn test_validate_roster_rejections() {
        assert_eq!(invalid_reason(&[]), "empty roster");
        assert_eq!(
            invalid_reason(&roster(&[1.0, 2.0, 3.0])),
            "odd roster size (3 players)"
        );
        assert!(invalid_reason(&roster(&[1.0, f64::NAN])).contains("non-finite"));

        let mut duplicated = roster(&[1.0, 2.0]);
        duplicated[1].id = "p1".to_string();
        assert!(invalid_reason(&duplicated).contains("more than once"));

        assert!(validate_roster(&roster(&[1.0, 2.0])).is_ok());
    }
}
