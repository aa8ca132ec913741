//! Utility functions for the engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique match id
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique ledger record id
pub fn generate_record_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique player id
pub fn generate_player_id() -> String {
    Uuid::new_v4().to_string()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two power totals
pub fn power_difference(power1: f64, power2: f64) -> f64 {
    (power1 - power2).abs()
}

/// Round to a fixed number of fractional digits
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    // keep -0.0 out of stored ratings
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_match_id();
        let id2 = generate_match_id();
        assert_ne!(id1, id2);

        assert_ne!(generate_player_id(), generate_player_id());
        assert_ne!(generate_record_id(), generate_record_id());
    }

    #[test]
    fn test_power_difference() {
        assert_eq!(power_difference(14.0, 10.0), 4.0);
        assert_eq!(power_difference(10.0, 14.0), 4.0);
        assert_eq!(power_difference(3.5, 3.5), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.4 - 0.5, 2), -0.1);
        assert_eq!(round_to(5.5, 2), 5.5);
        assert_eq!(round_to(2.999_999_9, 2), 3.0);
        assert_eq!(round_to(1.234_5, 0), 1.0);

        let zero = round_to(-0.001, 2);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());
    }
}
