//! Sorted greedy balancer
//!
//! Hands players out strongest first to whichever team currently has less
//! power. Linear after the sort, but not always optimal: `[10, 9, 8, 7, 6, 2]`
//! ends 23 vs 19 where an even split exists.

use crate::balance::partition::{validate_roster, Partition};
use crate::balance::strategy::TeamBalancer;
use crate::config::BalanceStrategy;
use crate::error::Result;
use crate::types::Player;
use std::cmp::Ordering;
use tracing::debug;

/// Approximate balancer for large rosters
#[derive(Debug, Clone, Default)]
pub struct GreedyPartition;

impl GreedyPartition {
    pub fn new() -> Self {
        Self
    }
}

impl TeamBalancer for GreedyPartition {
    fn balance(&self, players: &[Player]) -> Result<Partition> {
        validate_roster(players)?;

        let half = players.len() / 2;

        // Stable sort keeps input order among equal powers
        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by(|&a, &b| {
            players[b]
                .power
                .partial_cmp(&players[a].power)
                .unwrap_or(Ordering::Equal)
        });

        let mut in_team_a = vec![false; players.len()];
        let (mut size_a, mut size_b) = (0usize, 0usize);
        let (mut power_a, mut power_b) = (0.0, 0.0);

        for index in order {
            // A full team is closed; otherwise the lighter side (A on ties) takes the player
            let to_a = size_b == half || (size_a < half && power_a <= power_b);
            if to_a {
                in_team_a[index] = true;
                size_a += 1;
                power_a += players[index].power;
            } else {
                size_b += 1;
                power_b += players[index].power;
            }
        }

        let partition = Partition::from_mask(players, &in_team_a, BalanceStrategy::Greedy);
        debug!(
            "Greedy split of {} players, imbalance {}",
            players.len(),
            partition.imbalance
        );

        Ok(partition)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
