//! Exhaustive partition search
//!
//! Tries every way of picking half the roster for Team A and keeps the split
//! with the smallest power difference. Exponential in roster size, so it is
//! capped at [`EXACT_HARD_LIMIT`] players.

use crate::balance::partition::{validate_roster, Partition};
use crate::balance::strategy::TeamBalancer;
use crate::config::BalanceStrategy;
use crate::error::{EngineError, Result};
use crate::types::Player;
use crate::utils::power_difference;
use tracing::debug;

/// Largest roster the exhaustive search accepts
pub const EXACT_HARD_LIMIT: usize = 26;

/// Optimal balancer over lexicographic index combinations
#[derive(Debug, Clone, Default)]
pub struct ExactPartition;

impl ExactPartition {
    pub fn new() -> Self {
        Self
    }
}

impl TeamBalancer for ExactPartition {
    fn balance(&self, players: &[Player]) -> Result<Partition> {
        validate_roster(players)?;

        let n = players.len();
        if n > EXACT_HARD_LIMIT {
            return Err(EngineError::invalid_input(format!(
                "roster of {} players is too large for exhaustive search (limit {})",
                n, EXACT_HARD_LIMIT
            ))
            .into());
        }

        let half = n / 2;
        let powers: Vec<f64> = players.iter().map(|p| p.power).collect();

        // Combinations are visited in lexicographic order. Every split shows up
        // twice (as itself and mirrored), and the copy holding index 0 always
        // comes first, so pinning index 0 to Team A keeps first-found ties.
        let mut combination: Vec<usize> = (0..half).collect();
        let mut mask = vec![false; n];
        let mut best_mask = mask.clone();
        let mut best_imbalance = f64::INFINITY;
        let mut evaluated: u64 = 0;

        loop {
            mask.iter_mut().for_each(|slot| *slot = false);
            for &index in &combination {
                mask[index] = true;
            }

            let (mut power_a, mut power_b) = (0.0, 0.0);
            for (power, &on_a) in powers.iter().zip(&mask) {
                if on_a {
                    power_a += power;
                } else {
                    power_b += power;
                }
            }

            let imbalance = power_difference(power_a, power_b);
            evaluated += 1;
            if imbalance < best_imbalance {
                best_imbalance = imbalance;
                best_mask.copy_from_slice(&mask);
            }

            if !advance(&mut combination, n) {
                break;
            }
        }

        debug!(
            "Exact search over {} players evaluated {} splits, best imbalance {}",
            n, evaluated, best_imbalance
        );

        Ok(Partition::from_mask(players, &best_mask, BalanceStrategy::Exact))
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Step to the next lexicographic combination, leaving position 0 untouched
fn advance(combination: &mut [usize], n: usize) -> bool {
    let k = combination.len();
    let mut position = k;

    while position > 1 {
        position -= 1;
        if combination[position] < n - k + position {
            combination[position] += 1;
            for next in position + 1..k {
                combination[next] = combination[next - 1] + 1;
            }
            return true;
        }
    }

    false
}
