//! Streak- and underdog-aware rating adjustment
//!
//! One parameterized adjuster covers every case; all constants come from
//! [`RatingConfig`]:
//!
//! 1. Players at or below zero power get a fixed recovery delta and no
//!    streak correction.
//! 2. Otherwise a win is worth `win_delta` and a loss costs `loss_delta`.
//!    A winner on a streak of `streak_threshold` or more gets `streak_bonus`
//!    less; a loser on such a losing streak loses `streak_bonus` less.
//! 3. Underdog winners receive `underdog_bonus` on top.
//! 4. The new rating is rounded to `rating_precision` digits and never
//!    clamped.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::rating::streak::Streaks;
use crate::types::{AdjustmentResult, Outcome, Player};
use crate::utils::{power_difference, round_to};
use tracing::debug;

/// Applies the rating rule for a fixed configuration snapshot
#[derive(Debug, Clone)]
pub struct RatingAdjuster {
    config: RatingConfig,
}

impl RatingAdjuster {
    /// Create a new adjuster from validated configuration
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Delta before the underdog bonus
    pub fn base_delta(&self, power: f64, is_winner: bool, streaks: Streaks) -> f64 {
        let config = &self.config;

        if power <= 0.0 {
            return if is_winner {
                config.recovery_win_delta
            } else {
                -config.recovery_loss_delta
            };
        }

        if is_winner {
            if streaks.wins >= config.streak_threshold {
                config.win_delta - config.streak_bonus
            } else {
                config.win_delta
            }
        } else if streaks.losses >= config.streak_threshold {
            -config.loss_delta + config.streak_bonus
        } else {
            -config.loss_delta
        }
    }

    /// Compute one player's rating change for a finished match
    ///
    /// `recent_results` is most-recent-first; only the first `history_window`
    /// entries matter and a shorter history is fine. `imbalance` is the
    /// pre-match team power gap and only reaches the delta through
    /// `is_underdog`.
    pub fn adjust(
        &self,
        player: &Player,
        is_winner: bool,
        recent_results: &[Outcome],
        imbalance: f64,
        is_underdog: bool,
    ) -> AdjustmentResult {
        let streaks = Streaks::from_recent(recent_results, self.config.history_window);
        let mut delta = self.base_delta(player.power, is_winner, streaks);

        let underdog_bonus_applied = is_underdog && is_winner;
        if underdog_bonus_applied {
            delta += self.config.underdog_bonus;
        }

        let precision = self.config.rating_precision;
        let new_power = round_to(player.power + delta, precision);

        debug!(
            "Player {} - win streak: {}, loss streak: {}, imbalance: {}, underdog: {}, delta: {}",
            player.id, streaks.wins, streaks.losses, imbalance, underdog_bonus_applied, delta
        );

        AdjustmentResult {
            player_id: player.id.clone(),
            old_power: player.power,
            delta: round_to(delta, precision),
            new_power,
            win_streak: streaks.wins,
            loss_streak: streaks.losses,
            underdog_bonus_applied,
        }
    }
}

/// Whether a team's win counts as an upset
///
/// The winning team must be strictly weaker, with a gap (rounded to
/// `precision` digits) of at least `threshold`.
pub fn is_underdog_win(
    team_power: f64,
    opponent_power: f64,
    team_won: bool,
    threshold: f64,
    precision: u32,
) -> bool {
    team_won
        && team_power < opponent_power
        && round_to(power_difference(team_power, opponent_power), precision) >= threshold
}
