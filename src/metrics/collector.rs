//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for team balancing and match
//! settlement using Prometheus metrics.

use crate::types::TeamLabel;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Balancing metrics
    balance_metrics: BalanceMetrics,

    /// Settlement and rating metrics
    match_metrics: MatchMetrics,

    /// Failures by operation and error kind
    errors_total: IntCounterVec,
}

/// Balancing metrics
#[derive(Clone)]
pub struct BalanceMetrics {
    /// Balance requests by the strategy that produced the split
    pub balance_requests_total: IntCounterVec,

    /// Time spent searching for a split
    pub balance_duration_seconds: Histogram,

    /// Proposals flagged with a large power gap
    pub large_gap_proposals_total: IntCounter,
}

/// Settlement and rating metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Settled matches by winning side
    pub matches_settled_total: IntCounterVec,

    /// Time spent settling a match, including collaborator calls
    pub settlement_duration_seconds: Histogram,

    /// Distribution of applied rating deltas
    pub rating_delta: Histogram,

    /// Players who received the underdog bonus
    pub underdog_bonuses_total: IntCounter,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let balance_metrics = BalanceMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;

        let errors_total = IntCounterVec::new(
            Opts::new("huddle_errors_total", "Engine failures"),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(errors_total.clone()))?;

        Ok(Self {
            registry,
            balance_metrics,
            match_metrics,
            errors_total,
        })
    }

    /// Get balancing metrics
    pub fn balance(&self) -> &BalanceMetrics {
        &self.balance_metrics
    }

    /// Get match metrics
    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    /// Record a finished balance request
    pub fn record_balance(&self, strategy: &str, duration: Duration, large_gap: bool) {
        self.balance_metrics
            .balance_requests_total
            .with_label_values(&[strategy])
            .inc();
        self.balance_metrics
            .balance_duration_seconds
            .observe(duration.as_secs_f64());
        if large_gap {
            self.balance_metrics.large_gap_proposals_total.inc();
        }
    }

    /// Record a settled match
    pub fn record_match_settled(&self, winner: TeamLabel, duration: Duration) {
        let winner_str = match winner {
            TeamLabel::A => "a",
            TeamLabel::B => "b",
        };

        self.match_metrics
            .matches_settled_total
            .with_label_values(&[winner_str])
            .inc();
        self.match_metrics
            .settlement_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record one applied rating change
    pub fn record_rating_delta(&self, delta: f64, underdog_bonus: bool) {
        self.match_metrics.rating_delta.observe(delta);
        if underdog_bonus {
            self.match_metrics.underdog_bonuses_total.inc();
        }
    }

    /// Record a failed operation
    pub fn record_error(&self, operation: &str, kind: &str) {
        self.errors_total
            .with_label_values(&[operation, kind])
            .inc();
    }

    /// Errors recorded so far for an operation and kind
    pub fn error_count(&self, operation: &str, kind: &str) -> u64 {
        self.errors_total
            .with_label_values(&[operation, kind])
            .get()
    }

    /// Render every metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Start a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

impl BalanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let balance_requests_total = IntCounterVec::new(
            Opts::new("huddle_balance_requests_total", "Balance requests"),
            &["strategy"],
        )?;
        registry.register(Box::new(balance_requests_total.clone()))?;

        let balance_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "huddle_balance_duration_seconds",
                "Team balancing search time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1, 1.0, 10.0]),
        )?;
        registry.register(Box::new(balance_duration_seconds.clone()))?;

        let large_gap_proposals_total = IntCounter::new(
            "huddle_large_gap_proposals_total",
            "Team proposals at or above the power difference threshold",
        )?;
        registry.register(Box::new(large_gap_proposals_total.clone()))?;

        Ok(Self {
            balance_requests_total,
            balance_duration_seconds,
            large_gap_proposals_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_settled_total = IntCounterVec::new(
            Opts::new("huddle_matches_settled_total", "Settled matches by winner"),
            &["winner"],
        )?;
        registry.register(Box::new(matches_settled_total.clone()))?;

        let settlement_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "huddle_settlement_duration_seconds",
                "Match settlement time",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(settlement_duration_seconds.clone()))?;

        let rating_delta = Histogram::with_opts(
            HistogramOpts::new("huddle_rating_delta", "Applied rating deltas")
                .buckets(vec![-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5]),
        )?;
        registry.register(Box::new(rating_delta.clone()))?;

        let underdog_bonuses_total = IntCounter::new(
            "huddle_underdog_bonuses_total",
            "Players rewarded for an upset win",
        )?;
        registry.register(Box::new(underdog_bonuses_total.clone()))?;

        Ok(Self {
            matches_settled_total,
            settlement_duration_seconds,
            rating_delta,
            underdog_bonuses_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        let _balance = collector.balance();
        let _matches = collector.matches();
    }

    #[test]
    fn test_balance_recording() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_balance("exact", Duration::from_micros(40), false);
        collector.record_balance("exact", Duration::from_micros(40), true);
        collector.record_balance("greedy", Duration::from_micros(5), false);

        let requests = &collector.balance().balance_requests_total;
        assert_eq!(requests.with_label_values(&["exact"]).get(), 2);
        assert_eq!(requests.with_label_values(&["greedy"]).get(), 1);
        assert_eq!(collector.balance().large_gap_proposals_total.get(), 1);
    }

    #[test]
    fn test_match_recording() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_match_settled(TeamLabel::B, Duration::from_millis(2));
        collector.record_rating_delta(2.0, true);
        collector.record_rating_delta(-1.0, false);
        collector.record_error("settle_match", "dependency_failure");

        assert_eq!(
            collector
                .matches()
                .matches_settled_total
                .with_label_values(&["b"])
                .get(),
            1
        );
        assert_eq!(collector.matches().underdog_bonuses_total.get(), 1);
        assert_eq!(collector.matches().rating_delta.get_sample_count(), 2);
        assert_eq!(
            collector.error_count("settle_match", "dependency_failure"),
            1
        );
    }

    #[test]
    fn test_gather_text() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_balance("auto", Duration::from_micros(1), false);

        let text = collector.gather_text().unwrap();
        assert!(text.contains("huddle_balance_requests_total"));
    }

    #[test]
    fn test_metrics_timer() {
        let collector = MetricsCollector::new().unwrap();
        let timer = collector.start_timer();

        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();

        assert!(duration >= Duration::from_millis(10));
    }
}
