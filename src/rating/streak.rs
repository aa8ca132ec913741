//! Result streak detection over a player's most recent matches

use crate::types::Outcome;
use serde::{Deserialize, Serialize};

/// Leading win and loss runs of a most-recent-first result window
///
/// At most one of the two is non-zero for a real history, but both are
/// always computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub wins: usize,
    pub losses: usize,
}

impl Streaks {
    /// Scan at most `window` results, most recent first
    pub fn from_recent(recent: &[Outcome], window: usize) -> Self {
        let considered = &recent[..recent.len().min(window)];
        Self {
            wins: leading_streak(considered, Outcome::Win),
            losses: leading_streak(considered, Outcome::Loss),
        }
    }
}

/// Count consecutive `outcome` entries from the front until the first mismatch
pub fn leading_streak(recent: &[Outcome], outcome: Outcome) -> usize {
    recent
        .iter()
        .take_while(|&&result| result == outcome)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{Loss, Win};

    #[test]
    fn test_leading_streak() {
        assert_eq!(leading_streak(&[Win, Win, Loss], Win), 2);
        assert_eq!(leading_streak(&[Win, Win, Loss], Loss), 0);
        assert_eq!(leading_streak(&[Loss, Win, Loss], Loss), 1);
        assert_eq!(leading_streak(&[], Win), 0);
    }

    #[test]
    fn test_streaks_from_recent() {
        let streaks = Streaks::from_recent(&[Loss, Loss, Win], 3);
        assert_eq!(streaks, Streaks { wins: 0, losses: 2 });

        let streaks = Streaks::from_recent(&[Win, Win, Win], 3);
        assert_eq!(streaks, Streaks { wins: 3, losses: 0 });
    }

    #[test]
    fn test_short_history_is_fine() {
        let streaks = Streaks::from_recent(&[Win], 3);
        assert_eq!(streaks, Streaks { wins: 1, losses: 0 });
        assert_eq!(Streaks::from_recent(&[], 3), Streaks::default());
    }

    #[test]
    fn test_window_truncates_longer_history() {
        let streaks = Streaks::from_recent(&[Win, Win, Win, Win, Win], 3);
        assert_eq!(streaks.wins, 3);
    }
}
