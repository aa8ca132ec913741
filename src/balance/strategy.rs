//! Balancer trait and strategy selection

use crate::balance::exact::ExactPartition;
use crate::balance::greedy::GreedyPartition;
use crate::balance::partition::Partition;
use crate::config::{BalanceStrategy, BalancingConfig};
use crate::error::Result;
use crate::types::Player;
use tracing::debug;

/// Trait for splitting a roster into two equal-size teams
pub trait TeamBalancer: Send + Sync {
    /// Partition `players` into Team A and Team B
    ///
    /// Fails with `InvalidInput` for empty or odd rosters, duplicate ids and
    /// non-finite power values. Pure: the same input always yields the same
    /// split.
    fn balance(&self, players: &[Player]) -> Result<Partition>;

    /// Short name for logs and metrics
    fn name(&self) -> &'static str;
}

/// Exact search for small rosters, greedy once the roster gets large
#[derive(Debug, Clone)]
pub struct AutoPartition {
    exact: ExactPartition,
    greedy: GreedyPartition,
    exact_max_players: usize,
}

impl AutoPartition {
    pub fn new(exact_max_players: usize) -> Self {
        Self {
            exact: ExactPartition::new(),
            greedy: GreedyPartition::new(),
            exact_max_players,
        }
    }
}

impl TeamBalancer for AutoPartition {
    fn balance(&self, players: &[Player]) -> Result<Partition> {
        if players.len() <= self.exact_max_players {
            self.exact.balance(players)
        } else {
            debug!(
                "Roster of {} exceeds exact limit {}, falling back to greedy",
                players.len(),
                self.exact_max_players
            );
            self.greedy.balance(players)
        }
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}

/// Build the balancer described by `config`
pub fn balancer_for(config: &BalancingConfig) -> Box<dyn TeamBalancer> {
    match config.strategy {
        BalanceStrategy::Exact => Box::new(ExactPartition::new()),
        BalanceStrategy::Greedy => Box::new(GreedyPartition::new()),
        BalanceStrategy::Auto => Box::new(AutoPartition::new(config.exact_max_players)),
    }
}
