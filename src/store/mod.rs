//! Collaborator interfaces for roster, match history and the ledger
//!
//! The engine never owns persistence. It reads players and recent results
//! through these traits and hands finished records back to a sink. In-memory
//! implementations back the tests and the CLI.

pub mod ledger;
pub mod roster;
pub mod snapshot;

use crate::error::Result;
use crate::types::{MatchParticipantRecord, Outcome, Player, PlayerId};
use async_trait::async_trait;

// Re-export commonly used types
pub use ledger::{group_matches, power_series, InMemoryLedger};
pub use roster::{rank_players, InMemoryRoster};
pub use snapshot::SessionSnapshot;

/// Source of registered players and owner of their current power
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Fetch the given players in request order; unknown ids are skipped
    async fn get_players(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>>;

    /// Every registered player
    async fn all_players(&self) -> Result<Vec<Player>>;

    /// Add a new player to the roster
    async fn register_player(&self, player: Player) -> Result<()>;

    /// Persist a player's new power after a match
    async fn update_power(&self, player_id: &str, power: f64) -> Result<()>;

    /// Delete a player, returning whether they existed
    async fn remove_player(&self, player_id: &str) -> Result<bool>;
}

/// Read side of the match ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Up to `limit` of the player's latest outcomes, most recent first
    async fn last_results(&self, player_id: &str, limit: usize) -> Result<Vec<Outcome>>;

    /// The whole ledger, oldest record first
    async fn all_records(&self) -> Result<Vec<MatchParticipantRecord>>;
}

/// Write side of the match ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Append every participant record of one match
    async fn append(&self, records: Vec<MatchParticipantRecord>) -> Result<()>;
}
