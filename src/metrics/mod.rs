//! Metrics for the balancing and rating engine

pub mod collector;

pub use collector::{BalanceMetrics, MatchMetrics, MetricsCollector, MetricsTimer};
