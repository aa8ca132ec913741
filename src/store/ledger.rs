//! In-memory append-only match ledger

use crate::error::{EngineError, Result};
use crate::store::{HistoryStore, LedgerSink};
use crate::types::{MatchId, MatchParticipantRecord, MatchSummary, Outcome, TeamLabel};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Ledger kept in time order; later entries are more recent
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: RwLock<Vec<MatchParticipantRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from previously stored records
    ///
    /// Records are ordered by `recorded_at`. Entries with the same timestamp
    /// keep their given order, so the participants of one match stay together.
    pub fn with_records(mut records: Vec<MatchParticipantRecord>) -> Self {
        records.sort_by_key(|r| r.recorded_at);
        Self {
            records: RwLock::new(records),
        }
    }

    /// All records, oldest first
    pub fn records(&self) -> Result<Vec<MatchParticipantRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire ledger read lock".to_string(),
            })?;

        Ok(records.clone())
    }

    /// Number of stored participant records
    pub fn len(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl HistoryStore for InMemoryLedger {
    async fn last_results(&self, player_id: &str, limit: usize) -> Result<Vec<Outcome>> {
        let records = self
            .records
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire ledger read lock".to_string(),
            })?;

        Ok(records
            .iter()
            .rev()
            .filter(|r| r.player_id == player_id)
            .take(limit)
            .map(|r| r.outcome)
            .collect())
    }

    async fn all_records(&self) -> Result<Vec<MatchParticipantRecord>> {
        self.records()
    }
}

#[async_trait]
impl LedgerSink for InMemoryLedger {
    async fn append(&self, new_records: Vec<MatchParticipantRecord>) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire ledger write lock".to_string(),
            })?;

        debug!("Appending {} ledger records", new_records.len());
        records.extend(new_records);
        Ok(())
    }
}

/// Regroup ledger records (oldest first) into per-match summaries, newest first
pub fn group_matches(records: &[MatchParticipantRecord]) -> Vec<MatchSummary> {
    let mut summaries: Vec<MatchSummary> = Vec::new();
    let mut index_by_match: HashMap<MatchId, usize> = HashMap::new();

    for record in records.iter().rev() {
        let index = *index_by_match.entry(record.match_id).or_insert_with(|| {
            summaries.push(MatchSummary {
                match_id: record.match_id,
                winner: None,
                played_at: record.recorded_at,
                team_a: Vec::new(),
                team_b: Vec::new(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[index];
        if record.is_winner {
            summary.winner = Some(record.team);
        }
        if record.recorded_at > summary.played_at {
            summary.played_at = record.recorded_at;
        }
        match record.team {
            TeamLabel::A => summary.team_a.insert(0, record.clone()),
            TeamLabel::B => summary.team_b.insert(0, record.clone()),
        }
    }

    summaries
}

/// A player's rating after each of their matches, oldest first
pub fn power_series(records: &[MatchParticipantRecord], player_id: &str) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.player_id == player_id)
        .map(|r| r.new_power)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{current_timestamp, generate_match_id, generate_record_id};
    use chrono::Duration;

    fn record(
        match_id: MatchId,
        player_id: &str,
        team: TeamLabel,
        won: bool,
        new_power: f64,
    ) -> MatchParticipantRecord {
        MatchParticipantRecord {
            id: generate_record_id(),
            match_id,
            player_id: player_id.to_string(),
            team,
            outcome: Outcome::from_winner(won),
            is_winner: won,
            delta: if won { 1.0 } else { -1.0 },
            new_power,
            recorded_at: current_timestamp(),
        }
    }

    #[tokio::test]
    async fn test_last_results_most_recent_first() {
        let ledger = InMemoryLedger::new();
        for won in [true, false, false, true] {
            let m = generate_match_id();
            ledger
                .append(vec![
                    record(m, "p1", TeamLabel::A, won, 5.0),
                    record(m, "p2", TeamLabel::B, !won, 5.0),
                ])
                .await
                .unwrap();
        }

        let recent = ledger.last_results("p1", 3).await.unwrap();
        assert_eq!(recent, vec![Outcome::Win, Outcome::Loss, Outcome::Loss]);

        assert!(ledger.last_results("nobody", 3).await.unwrap().is_empty());
        assert_eq!(ledger.len().unwrap(), 8);
    }

    #[tokio::test]
    async fn test_stored_records_ordered_by_time() {
        let now = current_timestamp();
        let mut newest = record(generate_match_id(), "p1", TeamLabel::A, true, 7.0);
        newest.recorded_at = now;
        let mut oldest = record(generate_match_id(), "p1", TeamLabel::A, false, 5.0);
        oldest.recorded_at = now - Duration::minutes(20);
        let mut middle = record(generate_match_id(), "p1", TeamLabel::B, false, 6.0);
        middle.recorded_at = now - Duration::minutes(10);

        let ledger = InMemoryLedger::with_records(vec![newest, oldest, middle]);

        let recent = ledger.last_results("p1", 2).await.unwrap();
        assert_eq!(recent, vec![Outcome::Win, Outcome::Loss]);
        let records = ledger.records().unwrap();
        assert_eq!(power_series(&records, "p1"), vec![5.0, 6.0, 7.0]);
    }

    #[tokio::test]
    async fn test_match_history_groups_by_match() {
        let ledger = InMemoryLedger::new();
        let first = generate_match_id();
        let second = generate_match_id();

        ledger
            .append(vec![
                record(first, "p1", TeamLabel::A, true, 6.0),
                record(first, "p2", TeamLabel::B, false, 4.0),
            ])
            .await
            .unwrap();
        ledger
            .append(vec![
                record(second, "p1", TeamLabel::B, false, 5.0),
                record(second, "p3", TeamLabel::A, true, 8.0),
            ])
            .await
            .unwrap();

        let history = group_matches(&ledger.records().unwrap());
        assert_eq!(history.len(), 2);

        assert_eq!(history[0].match_id, second);
        assert_eq!(history[0].winner, Some(TeamLabel::A));
        assert_eq!(history[0].team_a[0].player_id, "p3");
        assert_eq!(history[0].team_b[0].player_id, "p1");

        assert_eq!(history[1].match_id, first);
        assert_eq!(history[1].winner, Some(TeamLabel::A));
    }

    #[test]
    fn test_power_series_in_order() {
        let m1 = generate_match_id();
        let m2 = generate_match_id();
        let records = vec![
            record(m1, "p1", TeamLabel::A, true, 6.0),
            record(m1, "p2", TeamLabel::B, false, 4.0),
            record(m2, "p1", TeamLabel::A, true, 6.5),
        ];

        assert_eq!(power_series(&records, "p1"), vec![6.0, 6.5]);
        assert_eq!(power_series(&records, "p2"), vec![4.0]);
        assert!(power_series(&records, "p9").is_empty());
    }
}
