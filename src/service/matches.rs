//! Match orchestration
//!
//! [`MatchService`] wires the roster, the match ledger and configuration
//! together. It proposes balanced teams and settles finished matches: every
//! rating change of a match is computed before anything is written, and the
//! participants stay locked from the history read until the last power update.

use crate::balance::{balancer_for, Partition};
use crate::config::ConfigProvider;
use crate::error::{error_kind, EngineError, Result};
use crate::metrics::MetricsCollector;
use crate::rating::{is_underdog_win, RatingAdjuster};
use crate::service::locks::PlayerLocks;
use crate::store::{
    group_matches, power_series, rank_players, HistoryStore, LedgerSink, RosterProvider,
};
use crate::types::{
    AdjustmentResult, LeaderboardEntry, MatchOutcome, MatchParticipantRecord, MatchSubmission,
    MatchSummary, Outcome, Player, PlayerId, TeamLabel,
};
use crate::utils::{
    current_timestamp, generate_match_id, generate_player_id, generate_record_id, power_difference,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suggested teams for an upcoming match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProposal {
    pub partition: Partition,
    /// Imbalance reaches the power difference threshold
    pub large_gap: bool,
}

/// Rating change planned for one participant before anything is written
struct PlannedResult {
    team: TeamLabel,
    is_winner: bool,
    adjustment: AdjustmentResult,
}

/// Coordinates balancing and settlement against the collaborators
#[derive(Clone)]
pub struct MatchService {
    /// Registered players and their current power
    roster: Arc<dyn RosterProvider>,
    /// Read side of the ledger
    history: Arc<dyn HistoryStore>,
    /// Write side of the ledger
    ledger: Arc<dyn LedgerSink>,
    /// Tunables, read once per operation
    config: Arc<dyn ConfigProvider>,
    /// Metrics collector for recording performance data
    metrics: Arc<MetricsCollector>,
    /// Serializes settlements that share a player
    locks: PlayerLocks,
}

impl MatchService {
    /// Create a new service with its own metrics registry
    pub fn new(
        roster: Arc<dyn RosterProvider>,
        history: Arc<dyn HistoryStore>,
        ledger: Arc<dyn LedgerSink>,
        config: Arc<dyn ConfigProvider>,
    ) -> Result<Self> {
        let metrics = Arc::new(MetricsCollector::new()?);
        Ok(Self::with_metrics(roster, history, ledger, config, metrics))
    }

    /// Create a new service with metrics collector
    pub fn with_metrics(
        roster: Arc<dyn RosterProvider>,
        history: Arc<dyn HistoryStore>,
        ledger: Arc<dyn LedgerSink>,
        config: Arc<dyn ConfigProvider>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            roster,
            history,
            ledger,
            config,
            metrics,
            locks: PlayerLocks::new(),
        }
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn config(&self) -> Arc<dyn ConfigProvider> {
        self.config.clone()
    }

    /// Split the given players into two teams of equal power
    pub async fn propose_teams(&self, player_ids: &[PlayerId]) -> Result<TeamProposal> {
        let result = self.propose(player_ids).await;
        if let Err(e) = &result {
            self.metrics.record_error("propose_teams", error_kind(e));
            warn!("Team proposal failed: {}", e);
        }
        result
    }

    /// Split every registered player into two teams
    pub async fn propose_roster_teams(&self) -> Result<TeamProposal> {
        let players = self
            .roster
            .all_players()
            .await
            .map_err(|e| EngineError::dependency("roster", e))?;
        let ids: Vec<PlayerId> = players.into_iter().map(|p| p.id).collect();

        self.propose_teams(&ids).await
    }

    async fn propose(&self, player_ids: &[PlayerId]) -> Result<TeamProposal> {
        ensure_unique(player_ids.iter())?;

        let rating = self.config.rating_config()?;
        let balancing = self.config.balancing_config()?;
        let players = self.load_players(player_ids).await?;

        let timer = self.metrics.start_timer();
        let balancer = balancer_for(&balancing);
        let balancer_name = balancer.name();
        debug!(
            "Balancing {} players with the {} balancer",
            players.len(),
            balancer_name
        );

        let partition = tokio::task::spawn_blocking(move || balancer.balance(&players))
            .await
            .map_err(|e| EngineError::InternalError {
                message: format!("Balancing task failed: {}", e),
            })??;

        let large_gap =
            partition.has_large_gap(rating.power_difference_threshold, rating.rating_precision);
        self.metrics
            .record_balance(balancer_name, timer.stop(), large_gap);

        info!(
            "Proposed teams for {} players via {} - A: {:.2}, B: {:.2}, imbalance: {:.2}",
            player_ids.len(),
            partition.strategy,
            partition.team(TeamLabel::A).power(),
            partition.team(TeamLabel::B).power(),
            partition.imbalance
        );
        if large_gap {
            if let Some(weaker) = partition.weaker_team() {
                warn!(
                    "Large power gap of {:.2}, team {} is the weaker side",
                    partition.imbalance, weaker
                );
            }
        }

        Ok(TeamProposal {
            partition,
            large_gap,
        })
    }

    /// Apply the result of a finished match to every participant
    ///
    /// Fails with `InvalidInput` for malformed teams, `PlayerNotFound` for
    /// unknown ids and `DependencyFailure` when a collaborator errors. No
    /// record or power is written unless every adjustment succeeded.
    pub async fn settle_match(&self, submission: MatchSubmission) -> Result<MatchOutcome> {
        let timer = self.metrics.start_timer();

        match self.settle(&submission).await {
            Ok(outcome) => {
                self.metrics
                    .record_match_settled(outcome.winner, timer.stop());
                info!(
                    "Settled match {} - winner: {}, A: {:.2}, B: {:.2}, imbalance: {:.2}",
                    outcome.match_id,
                    outcome.winner,
                    outcome.team_a_power,
                    outcome.team_b_power,
                    outcome.imbalance
                );
                Ok(outcome)
            }
            Err(e) => {
                self.metrics.record_error("settle_match", error_kind(&e));
                warn!("Match settlement failed: {:#}", e);
                Err(e)
            }
        }
    }

    async fn settle(&self, submission: &MatchSubmission) -> Result<MatchOutcome> {
        validate_submission(submission)?;

        let rating = self.config.rating_config()?;
        let adjuster = RatingAdjuster::new(rating)?;
        let rating = adjuster.config();

        let participants: Vec<PlayerId> = submission
            .team_a
            .iter()
            .chain(&submission.team_b)
            .cloned()
            .collect();
        let guards = self.locks.acquire(&participants).await?;
        debug!("Holding {} player locks", guards.len());

        let team_a = self.load_players(&submission.team_a).await?;
        let team_b = self.load_players(&submission.team_b).await?;

        let team_a_power: f64 = team_a.iter().map(|p| p.power).sum();
        let team_b_power: f64 = team_b.iter().map(|p| p.power).sum();
        let imbalance = power_difference(team_a_power, team_b_power);

        let power_of = |label: TeamLabel| match label {
            TeamLabel::A => team_a_power,
            TeamLabel::B => team_b_power,
        };

        let mut planned = Vec::with_capacity(participants.len());
        for (team, players) in [(TeamLabel::A, &team_a), (TeamLabel::B, &team_b)] {
            let is_winner = team == submission.winner;
            let is_underdog = is_underdog_win(
                power_of(team),
                power_of(team.opponent()),
                is_winner,
                rating.power_difference_threshold,
                rating.rating_precision,
            );

            for player in players {
                let recent = self
                    .history
                    .last_results(&player.id, rating.history_window)
                    .await
                    .map_err(|e| EngineError::dependency("history store", e))?;

                let adjustment =
                    adjuster.adjust(player, is_winner, &recent, imbalance, is_underdog);
                planned.push(PlannedResult {
                    team,
                    is_winner,
                    adjustment,
                });
            }
        }

        let match_id = generate_match_id();
        let recorded_at = current_timestamp();
        let records: Vec<MatchParticipantRecord> = planned
            .iter()
            .map(|plan| MatchParticipantRecord {
                id: generate_record_id(),
                match_id,
                player_id: plan.adjustment.player_id.clone(),
                team: plan.team,
                outcome: Outcome::from_winner(plan.is_winner),
                is_winner: plan.is_winner,
                delta: plan.adjustment.delta,
                new_power: plan.adjustment.new_power,
                recorded_at,
            })
            .collect();

        self.ledger
            .append(records.clone())
            .await
            .map_err(|e| EngineError::dependency("ledger sink", e))?;

        for plan in &planned {
            self.roster
                .update_power(&plan.adjustment.player_id, plan.adjustment.new_power)
                .await
                .map_err(|e| EngineError::dependency("roster", e))?;

            self.metrics
                .record_rating_delta(plan.adjustment.delta, plan.adjustment.underdog_bonus_applied);
        }
        drop(guards);

        Ok(MatchOutcome {
            match_id,
            winner: submission.winner,
            team_a_power,
            team_b_power,
            imbalance,
            records,
        })
    }

    /// Roster ranked by power, tied players sharing a rank
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let players = self
            .roster
            .all_players()
            .await
            .map_err(|e| EngineError::dependency("roster", e))?;

        Ok(rank_players(players))
    }

    /// Every settled match, newest first
    pub async fn match_history(&self) -> Result<Vec<MatchSummary>> {
        let records = self
            .history
            .all_records()
            .await
            .map_err(|e| EngineError::dependency("history store", e))?;

        Ok(group_matches(&records))
    }

    /// A player's rating after each of their matches, oldest first
    pub async fn power_history(&self, player_id: &str) -> Result<Vec<f64>> {
        let records = self
            .history
            .all_records()
            .await
            .map_err(|e| EngineError::dependency("history store", e))?;

        Ok(power_series(&records, player_id))
    }

    /// Add a player under a fresh id, starting at the default power if none is given
    pub async fn register_player(&self, name: &str, power: Option<f64>) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::invalid_input("player name is empty").into());
        }

        let power = match power {
            Some(power) => power,
            None => self.config.rating_config()?.default_power,
        };
        if !power.is_finite() {
            return Err(EngineError::invalid_input(format!(
                "power of {} is not a finite number",
                name
            ))
            .into());
        }

        let player = Player::new(generate_player_id(), name, power);
        self.roster
            .register_player(player.clone())
            .await
            .map_err(|e| EngineError::dependency("roster", e))?;

        info!(
            "Registered player {} ({}) at power {}",
            player.name, player.id, player.power
        );
        Ok(player)
    }

    /// Remove a player from the roster; their ledger records are kept
    pub async fn remove_player(&self, player_id: &str) -> Result<bool> {
        let removed = self
            .roster
            .remove_player(player_id)
            .await
            .map_err(|e| EngineError::dependency("roster", e))?;

        if removed {
            self.locks.forget(player_id)?;
            info!("Removed player {}", player_id);
            debug!("{} players have settlement locks", self.locks.tracked()?);
        }
        Ok(removed)
    }

    /// Fetch players in request order; any unknown id is an error
    async fn load_players(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>> {
        let players = self
            .roster
            .get_players(player_ids)
            .await
            .map_err(|e| EngineError::dependency("roster", e))?;

        if players.len() != player_ids.len() {
            let found: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
            if let Some(missing) = player_ids.iter().find(|id| !found.contains(id.as_str())) {
                return Err(EngineError::PlayerNotFound {
                    player_id: missing.clone(),
                }
                .into());
            }
        }

        Ok(players)
    }
}

/// Check team shapes before touching any collaborator
fn validate_submission(submission: &MatchSubmission) -> Result<()> {
    if submission.team_a.is_empty() || submission.team_b.is_empty() {
        return Err(EngineError::invalid_input("both teams need at least one player").into());
    }

    if submission.team_a.len() != submission.team_b.len() {
        return Err(EngineError::invalid_input(format!(
            "teams have different sizes ({} vs {})",
            submission.team_a.len(),
            submission.team_b.len()
        ))
        .into());
    }

    ensure_unique(submission.team_a.iter().chain(&submission.team_b))
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a PlayerId>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(
                EngineError::invalid_input(format!("player {} appears more than once", id)).into(),
            );
        }
    }
    Ok(())
}
