//! Rating adjustment configuration

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Tunables for the rating adjustment rule
///
/// Loss amounts are stored as positive magnitudes and subtracted by the
/// adjuster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Base gain for a win
    pub win_delta: f64,
    /// Base loss for a defeat
    pub loss_delta: f64,
    /// Amount taken from a streaking winner or given back to a streaking loser
    pub streak_bonus: f64,
    /// Streak length at which the streak correction kicks in
    pub streak_threshold: usize,
    /// Extra gain for winning on the weaker team
    pub underdog_bonus: f64,
    /// Team power gap at which a match counts as lopsided
    pub power_difference_threshold: f64,
    /// Fixed gain for a win when power is at or below zero
    pub recovery_win_delta: f64,
    /// Fixed loss for a defeat when power is at or below zero
    pub recovery_loss_delta: f64,
    /// Number of most recent results inspected for streaks
    pub history_window: usize,
    /// Fractional digits kept on stored ratings
    pub rating_precision: u32,
    /// Power given to newly registered players
    pub default_power: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            win_delta: 1.0,
            loss_delta: 1.0,
            streak_bonus: 0.5,
            streak_threshold: 2,
            underdog_bonus: 1.0,
            power_difference_threshold: 3.0,
            recovery_win_delta: 1.0,
            recovery_loss_delta: 0.5,
            history_window: 3,
            rating_precision: 2,
            default_power: 5.0,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("win_delta", self.win_delta),
            ("loss_delta", self.loss_delta),
            ("streak_bonus", self.streak_bonus),
            ("underdog_bonus", self.underdog_bonus),
            ("power_difference_threshold", self.power_difference_threshold),
            ("recovery_win_delta", self.recovery_win_delta),
            ("recovery_loss_delta", self.recovery_loss_delta),
        ];

        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::ConfigurationError {
                    message: format!("{} must be a non-negative number, got {}", name, value),
                }
                .into());
            }
        }

        if !self.default_power.is_finite() {
            return Err(EngineError::ConfigurationError {
                message: "default_power must be finite".to_string(),
            }
            .into());
        }

        if self.streak_threshold == 0 {
            return Err(EngineError::ConfigurationError {
                message: "streak_threshold must be at least 1".to_string(),
            }
            .into());
        }

        if self.history_window < self.streak_threshold {
            return Err(EngineError::ConfigurationError {
                message: format!(
                    "history_window ({}) cannot be shorter than streak_threshold ({})",
                    self.history_window, self.streak_threshold
                ),
            }
            .into());
        }

        if self.rating_precision > 6 {
            return Err(EngineError::ConfigurationError {
                message: "rating_precision above 6 digits is not supported".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
