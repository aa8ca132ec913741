//! Error types for the balancing and rating engine
//!
//! Engine failures are described by [`EngineError`] and travel through the
//! crate as `anyhow::Error`, so callers classify them with
//! `err.downcast_ref::<EngineError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{dependency} failed: {source}")]
    DependencyFailure {
        dependency: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Wrap a collaborator error without altering its chain
    pub fn dependency(dependency: &'static str, source: anyhow::Error) -> Self {
        Self::DependencyFailure { dependency, source }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::DependencyFailure { .. } => "dependency_failure",
            Self::PlayerNotFound { .. } => "player_not_found",
            Self::ConfigurationError { .. } => "configuration",
            Self::InternalError { .. } => "internal",
        }
    }
}

/// Label for any error surfaced by the engine, `"other"` if it is not ours
pub fn error_kind(error: &anyhow::Error) -> &'static str {
    error
        .downcast_ref::<EngineError>()
        .map(EngineError::kind)
        .unwrap_or("other")
}
