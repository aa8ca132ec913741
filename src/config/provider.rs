//! Configuration provider interface
//!
//! The engine reads its tunables through a [`ConfigProvider`] once per
//! operation. Operators can swap values between matches; a settlement that is
//! already running keeps the snapshot it started with.

use crate::config::balancing::BalancingConfig;
use crate::config::rating::RatingConfig;
use crate::error::{EngineError, Result};
use std::sync::RwLock;
use tracing::info;

/// Trait for supplying engine tunables
pub trait ConfigProvider: Send + Sync {
    /// Snapshot of the rating rule parameters
    fn rating_config(&self) -> Result<RatingConfig>;

    /// Snapshot of the balancer settings
    fn balancing_config(&self) -> Result<BalancingConfig>;

    /// Replace the rating parameters; invalid values are rejected
    fn update_rating_config(&self, config: RatingConfig) -> Result<()>;

    /// Replace the balancer settings; invalid values are rejected
    fn update_balancing_config(&self, config: BalancingConfig) -> Result<()>;
}

/// In-process configuration holder
#[derive(Debug)]
pub struct StaticConfigProvider {
    rating: RwLock<RatingConfig>,
    balancing: RwLock<BalancingConfig>,
}

impl StaticConfigProvider {
    /// Create a provider from validated configuration
    pub fn new(rating: RatingConfig, balancing: BalancingConfig) -> Result<Self> {
        rating.validate()?;
        balancing.validate()?;

        Ok(Self {
            rating: RwLock::new(rating),
            balancing: RwLock::new(balancing),
        })
    }
}

impl Default for StaticConfigProvider {
    fn default() -> Self {
        Self {
            rating: RwLock::new(RatingConfig::default()),
            balancing: RwLock::new(BalancingConfig::default()),
        }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn rating_config(&self) -> Result<RatingConfig> {
        let rating = self
            .rating
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire rating config read lock".to_string(),
            })?;

        Ok(rating.clone())
    }

    fn balancing_config(&self) -> Result<BalancingConfig> {
        let balancing = self
            .balancing
            .read()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire balancing config read lock".to_string(),
            })?;

        Ok(balancing.clone())
    }

    fn update_rating_config(&self, config: RatingConfig) -> Result<()> {
        config.validate()?;

        let mut rating = self
            .rating
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire rating config write lock".to_string(),
            })?;

        info!(
            "Rating config updated - win {}, loss {}, streak bonus {}, underdog bonus {}, gap {}",
            config.win_delta,
            config.loss_delta,
            config.streak_bonus,
            config.underdog_bonus,
            config.power_difference_threshold
        );
        *rating = config;
        Ok(())
    }

    fn update_balancing_config(&self, config: BalancingConfig) -> Result<()> {
        config.validate()?;

        let mut balancing = self
            .balancing
            .write()
            .map_err(|_| EngineError::InternalError {
                message: "Failed to acquire balancing config write lock".to_string(),
            })?;

        info!(
            "Balancing config updated - strategy: {}, exact max players: {}",
            config.strategy, config.exact_max_players
        );
        *balancing = config;
        Ok(())
    }
}
