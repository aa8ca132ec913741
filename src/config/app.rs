//! Main application configuration
//!
//! This module defines the top-level configuration for the huddle engine,
//! including environment variable loading, TOML files and validation.

use crate::config::balancing::{BalanceStrategy, BalancingConfig};
use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub balancing: BalancingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "huddle".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Parse an environment variable into `target` if it is set
fn env_override<T: FromStr>(key: &str, target: &mut T) -> Result<()> {
    if let Ok(raw) = env::var(key) {
        *target = raw
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", key, raw))?;
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        env_override("WIN_DELTA", &mut self.rating.win_delta)?;
        env_override("LOSS_DELTA", &mut self.rating.loss_delta)?;
        env_override("STREAK_BONUS", &mut self.rating.streak_bonus)?;
        env_override("STREAK_THRESHOLD", &mut self.rating.streak_threshold)?;
        env_override("UNDERDOG_BONUS", &mut self.rating.underdog_bonus)?;
        env_override(
            "POWER_DIFFERENCE_THRESHOLD",
            &mut self.rating.power_difference_threshold,
        )?;
        env_override("HISTORY_WINDOW", &mut self.rating.history_window)?;
        env_override("DEFAULT_POWER", &mut self.rating.default_power)?;

        // Balancing settings
        if let Ok(strategy) = env::var("BALANCE_STRATEGY") {
            self.balancing.strategy = strategy
                .parse::<BalanceStrategy>()
                .map_err(|e| anyhow!("Invalid BALANCE_STRATEGY value: {}", e))?;
        }
        env_override("EXACT_MAX_PLAYERS", &mut self.balancing.exact_max_players)?;

        Ok(())
    }

    /// Serialize back to TOML, e.g. to print the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.balancing.validate()?;

    Ok(())
}
