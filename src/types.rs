//! Common types used throughout the engine

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Identifier shared by every participant record of one match
pub type MatchId = Uuid;

/// A roster member and their current power rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Skill estimate, unbounded in both directions
    pub power: f64,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, power: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power,
        }
    }
}

/// Result of one match from a single player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn from_winner(is_winner: bool) -> Self {
        if is_winner {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

impl FromStr for Outcome {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            other => Err(EngineError::invalid_input(format!(
                "malformed outcome '{}', expected 'win' or 'loss'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = EngineError;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Parse raw history entries, failing on the first malformed one
pub fn parse_outcomes<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Outcome>> {
    raw.iter()
        .map(|entry| entry.as_ref().parse::<Outcome>().map_err(Into::into))
        .collect()
}

/// Which side of a match a player was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamLabel {
    A,
    B,
}

impl TeamLabel {
    pub fn opponent(self) -> Self {
        match self {
            TeamLabel::A => TeamLabel::B,
            TeamLabel::B => TeamLabel::A,
        }
    }
}

impl fmt::Display for TeamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamLabel::A => write!(f, "A"),
            TeamLabel::B => write!(f, "B"),
        }
    }
}

impl FromStr for TeamLabel {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(TeamLabel::A),
            "B" | "b" => Ok(TeamLabel::B),
            other => Err(EngineError::invalid_input(format!(
                "unknown team '{}', expected 'A' or 'B'",
                other
            ))),
        }
    }
}

/// Ledger entry for one player in one match. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipantRecord {
    pub id: Uuid,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team: TeamLabel,
    pub outcome: Outcome,
    pub is_winner: bool,
    pub delta: f64,
    pub new_power: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Rating change computed for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub player_id: PlayerId,
    pub old_power: f64,
    pub delta: f64,
    pub new_power: f64,
    pub win_streak: usize,
    pub loss_streak: usize,
    pub underdog_bonus_applied: bool,
}

/// Teams and winner submitted after a game was played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSubmission {
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub winner: TeamLabel,
}

/// Everything produced by settling one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: MatchId,
    pub winner: TeamLabel,
    pub team_a_power: f64,
    pub team_b_power: f64,
    pub imbalance: f64,
    pub records: Vec<MatchParticipantRecord>,
}

/// Ledger records of one match regrouped by team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub winner: Option<TeamLabel>,
    pub played_at: DateTime<Utc>,
    pub team_a: Vec<MatchParticipantRecord>,
    pub team_b: Vec<MatchParticipantRecord>,
}

/// A ranked roster entry; tied powers share a rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player: Player,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_parsing() {
        assert_eq!("win".parse::<Outcome>().unwrap(), Outcome::Win);
        assert_eq!("loss".parse::<Outcome>().unwrap(), Outcome::Loss);

        let err = "draw".parse::<Outcome>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_parse_outcomes_fails_fast() {
        let parsed = parse_outcomes(&["win", "win", "loss"]).unwrap();
        assert_eq!(parsed, vec![Outcome::Win, Outcome::Win, Outcome::Loss]);

        let err = parse_outcomes(&["win", "WIN"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_outcome_serde_lowercase() {
        let json = serde_json::to_string(&vec![Outcome::Win, Outcome::Loss]).unwrap();
        assert_eq!(json, r#"["win","loss"]"#);

        let back: Vec<Outcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Outcome::Win, Outcome::Loss]);

        let err = serde_json::from_str::<Outcome>(r#""draw""#).unwrap_err();
        assert!(err.to_string().contains("malformed outcome 'draw'"));
    }

    #[test]
    fn test_team_label() {
        assert_eq!(TeamLabel::A.opponent(), TeamLabel::B);
        assert_eq!("b".parse::<TeamLabel>().unwrap(), TeamLabel::B);
        assert!("C".parse::<TeamLabel>().is_err());
        assert_eq!(TeamLabel::A.to_string(), "A");
    }
}
