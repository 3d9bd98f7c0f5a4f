//! Configuration types.

use reqwest::Url;

use crate::error::ConfigError;

/// Environment variable holding the base URL of the research/plan API.
pub const API_URL_ENV: &str = "WANDER_API_URL";

/// Where the research and planning endpoints live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_URL_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_URL_ENV.to_string()))?;

        Self::new(&raw)
    }

    /// Validate and normalize a base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: API_URL_ENV.to_string(),
            message: format!("{base_url:?} is not a valid URL: {e}"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: API_URL_ENV.to_string(),
                message: format!("unsupported scheme {:?}", url.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn research_url(&self) -> String {
        format!("{}/research", self.base_url)
    }

    pub fn plan_url(&self) -> String {
        format!("{}/plan", self.base_url)
    }
}
