//! Team balancing
//!
//! Splits an even roster into two equal-size teams with as little power
//! difference as possible. [`ExactPartition`] is the reference behaviour;
//! [`GreedyPartition`] trades optimality for speed on big rosters.

pub mod exact;
pub mod greedy;
pub mod partition;
pub mod strategy;

// Re-export commonly used types
pub use exact::ExactPartition;
pub use greedy::GreedyPartition;
pub use partition::{validate_roster, Partition, Team};
pub use strategy::{balancer_for, AutoPartition, TeamBalancer};
