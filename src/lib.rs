//! Huddle - team balancing and rating engine for casual game sessions
//!
//! This crate splits a roster into two teams of near-equal power and, once a
//! match is played, adjusts every participant's power with a streak- and
//! underdog-aware rule, recording the result in an append-only ledger.

pub mod balance;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{EngineError, Result};
pub use types::*;

// Re-export key components
pub use balance::{balancer_for, Partition, TeamBalancer};
pub use rating::RatingAdjuster;
pub use service::{MatchService, TeamProposal};
pub use store::{HistoryStore, InMemoryLedger, InMemoryRoster, LedgerSink, RosterProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
