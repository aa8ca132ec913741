//! JSON session snapshots used by the command line tool

use crate::error::Result;
use crate::store::{InMemoryLedger, InMemoryRoster};
use crate::types::{parse_outcomes, MatchParticipantRecord, Player};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Roster plus ledger of one play group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub players: Vec<Player>,
    /// Ledger records, oldest first
    #[serde(default)]
    pub records: Vec<MatchParticipantRecord>,
}

impl SessionSnapshot {
    /// Read a snapshot from a JSON file
    ///
    /// A ledger record whose outcome is not `win` or `loss` fails with
    /// `InvalidInput`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;

        parse_outcomes(&recorded_outcomes(&value))
            .with_context(|| format!("Invalid ledger in session file {}", path.display()))?;

        serde_json::from_value(value)
            .with_context(|| format!("Failed to parse session file {}", path.display()))
    }

    /// Write the snapshot as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write session file {}", path.display()))
    }

    /// Load the snapshot into fresh in-memory stores
    pub fn into_stores(self) -> (InMemoryRoster, InMemoryLedger) {
        (
            InMemoryRoster::with_players(self.players),
            InMemoryLedger::with_records(self.records),
        )
    }

    /// Capture the current state of in-memory stores
    pub fn capture(roster: &InMemoryRoster, ledger: &InMemoryLedger) -> Result<Self> {
        Ok(Self {
            players: roster.snapshot()?,
            records: ledger.records()?,
        })
    }
}

/// Raw `outcome` field of every ledger record, non-strings rendered as JSON
fn recorded_outcomes(value: &Value) -> Vec<String> {
    let Some(records) = value.get("records").and_then(Value::as_array) else {
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| record.get("outcome"))
        .map(|outcome| match outcome.as_str() {
            Some(raw) => raw.to_string(),
            None => outcome.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::store::{HistoryStore, RosterProvider};

    fn temp_session_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "huddle-snapshot-{}.json",
            crate::utils::generate_player_id()
        ))
    }

    #[tokio::test]
    async fn test_snapshot_file_round_trip() {
        let path = temp_session_path();

        let snapshot = SessionSnapshot {
            players: vec![
                Player::new("p1", "Alice", 5.0),
                Player::new("p2", "Bob", 3.5),
            ],
            records: Vec::new(),
        };
        snapshot.save(&path).unwrap();

        let loaded = SessionSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let (roster, ledger) = loaded.into_stores();
        assert_eq!(roster.all_players().await.unwrap().len(), 2);
        assert!(ledger.last_results("p1", 3).await.unwrap().is_empty());
    }

    #[test]
    fn test_unknown_outcome_is_invalid_input() {
        let path = temp_session_path();
        let raw = r#"{
            "players": [{"id": "p1", "name": "Alice", "power": 5.0}],
            "records": [{
                "id": "6f1c1d8e-0c55-4c43-9a43-3f4b5c6d7e80",
                "match_id": "0e9b0a52-7d61-4d5b-8a4c-1b2c3d4e5f60",
                "player_id": "p1",
                "team": "A",
                "outcome": "draw",
                "is_winner": false,
                "delta": 0.0,
                "new_power": 5.0,
                "recorded_at": "2024-03-01T20:00:00Z"
            }]
        }"#;
        std::fs::write(&path, raw).unwrap();

        let err = SessionSnapshot::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err.downcast_ref::<EngineError>() {
            Some(EngineError::InvalidInput { reason }) => assert!(reason.contains("'draw'")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot: SessionSnapshot = serde_json::from_str(r#"{"players": []}"#).unwrap();
        assert!(snapshot.records.is_empty());
    }
}
