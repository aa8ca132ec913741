//! Service layer for the balancing and rating engine
//!
//! This module contains the match orchestration that ties the balancer and
//! the rating adjuster to the roster, the ledger and configuration.

pub mod locks;
pub mod matches;

pub use locks::{PlayerGuards, PlayerLocks};
pub use matches::{MatchService, TeamProposal};
