//! Team balancing configuration

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which partition search the balancer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStrategy {
    /// Exhaustive search, always optimal
    Exact,
    /// Sorted greedy fill, fast but approximate
    Greedy,
    /// Exact up to `exact_max_players`, greedy above
    Auto,
}

impl fmt::Display for BalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStrategy::Exact => write!(f, "exact"),
            BalanceStrategy::Greedy => write!(f, "greedy"),
            BalanceStrategy::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for BalanceStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(BalanceStrategy::Exact),
            "greedy" => Ok(BalanceStrategy::Greedy),
            "auto" => Ok(BalanceStrategy::Auto),
            other => Err(EngineError::ConfigurationError {
                message: format!("Unknown balance strategy: {}", other),
            }),
        }
    }
}

/// Balancer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingConfig {
    pub strategy: BalanceStrategy,
    /// Largest roster `auto` still solves exhaustively
    pub exact_max_players: usize,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            strategy: BalanceStrategy::Auto,
            exact_max_players: 20,
        }
    }
}

impl BalancingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.exact_max_players < 2 {
            return Err(EngineError::ConfigurationError {
                message: "exact_max_players must be at least 2".to_string(),
            }
            .into());
        }

        if self.exact_max_players > crate::balance::exact::EXACT_HARD_LIMIT {
            return Err(EngineError::ConfigurationError {
                message: format!(
                    "exact_max_players cannot exceed {}",
                    crate::balance::exact::EXACT_HARD_LIMIT
                ),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        let exact: BalanceStrategy = "Exact".parse().unwrap();
        assert_eq!(exact, BalanceStrategy::Exact);
        let greedy: BalanceStrategy = "greedy".parse().unwrap();
        assert_eq!(greedy, BalanceStrategy::Greedy);
        assert!("random".parse::<BalanceStrategy>().is_err());
        assert_eq!(BalanceStrategy::Auto.to_string(), "auto");
    }

    #[test]
    fn test_exact_limit_validation() {
        assert!(BalancingConfig::default().validate().is_ok());

        let too_big = BalancingConfig {
            exact_max_players: 64,
            ..BalancingConfig::default()
        };
        assert!(too_big.validate().is_err());
    }
}
