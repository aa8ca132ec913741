//! Rating adjustment after a match
//!
//! This module provides streak detection and the parameterized adjustment
//! rule applied to every participant of a settled match.

pub mod adjuster;
pub mod streak;

// Re-export commonly used types
pub use adjuster::{is_underdog_win, RatingAdjuster};
pub use streak::{leading_streak, Streaks};
