//! Configuration management for the huddle engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, default values and the runtime config provider.

pub mod app;
pub mod balancing;
pub mod provider;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use balancing::{BalanceStrategy, BalancingConfig};
pub use provider::{ConfigProvider, StaticConfigProvider};
pub use rating::RatingConfig;
