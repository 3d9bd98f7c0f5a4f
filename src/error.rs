//! Error types for WanderAI.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of a single research -> plan run.
///
/// These are logged with their kind and then collapsed into one
/// user-visible notice by the planner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripError {
    #[error("Research request failed: {reason}")]
    Research { reason: String },

    #[error("Planning request failed: {reason}")]
    Planning { reason: String },

    #[error("Plan payload could not be parsed: {reason}")]
    PlanParse { reason: String },
}

impl TripError {
    pub fn research(reason: impl Into<String>) -> Self {
        Self::Research {
            reason: reason.into(),
        }
    }

    pub fn planning(reason: impl Into<String>) -> Self {
        Self::Planning {
            reason: reason.into(),
        }
    }

    pub fn plan_parse(reason: impl Into<String>) -> Self {
        Self::PlanParse {
            reason: reason.into(),
        }
    }

    /// Stable label used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Research { .. } => "research",
            Self::Planning { .. } => "planning",
            Self::PlanParse { .. } => "plan_parse",
        }
    }
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
