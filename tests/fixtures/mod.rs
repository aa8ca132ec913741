//! Test fixtures and collaborator doubles for integration testing

use async_trait::async_trait;
use huddle::error::Result;
use huddle::store::{HistoryStore, InMemoryLedger, LedgerSink};
use huddle::types::{MatchParticipantRecord, Outcome, Player};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Eight players with a realistic spread of power
pub fn sample_players() -> Vec<Player> {
    vec![
        Player::new("ana", "Ana", 7.5),
        Player::new("ben", "Ben", 6.0),
        Player::new("cai", "Cai", 5.0),
        Player::new("dee", "Dee", 5.0),
        Player::new("eli", "Eli", 4.5),
        Player::new("fay", "Fay", 3.0),
        Player::new("gus", "Gus", 2.0),
        Player::new("hal", "Hal", 0.5),
    ]
}

pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// History store that is always unreachable
#[derive(Debug, Default)]
pub struct UnreachableHistory {
    calls: AtomicUsize,
}

impl UnreachableHistory {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for UnreachableHistory {
    async fn last_results(&self, _player_id: &str, _limit: usize) -> Result<Vec<Outcome>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("history backend timed out"))
    }

    async fn all_records(&self) -> Result<Vec<MatchParticipantRecord>> {
        Err(anyhow::anyhow!("history backend timed out"))
    }
}

/// Ledger sink that rejects every append
#[derive(Debug, Default)]
pub struct RejectingLedger {
    attempts: AtomicUsize,
}

impl RejectingLedger {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSink for RejectingLedger {
    async fn append(&self, _records: Vec<MatchParticipantRecord>) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("ledger is read-only"))
    }
}

/// In-memory ledger whose history reads yield to other tasks first
///
/// Widens the window between reading a player's history and writing their
/// new records so that unsynchronized settlements would interleave.
#[derive(Debug, Clone)]
pub struct SlowHistory {
    inner: Arc<InMemoryLedger>,
    delay: Duration,
}

impl SlowHistory {
    pub fn new(inner: Arc<InMemoryLedger>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl HistoryStore for SlowHistory {
    async fn last_results(&self, player_id: &str, limit: usize) -> Result<Vec<Outcome>> {
        tokio::time::sleep(self.delay).await;
        self.inner.last_results(player_id, limit).await
    }

    async fn all_records(&self) -> Result<Vec<MatchParticipantRecord>> {
        self.inner.all_records().await
    }
}
