//! Service configuration

use serde::Deserialize;
use std::time::Duration;

use crate::error::HttpError;

/// Environment variable prefix for every setting, e.g. `CLAIMS_API_BASE_URL`
pub const ENV_PREFIX: &str = "CLAIMS";

/// Endpoints and transport settings for the collaborators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the claims backend, including the `/api` prefix
    pub api_base_url: String,
    /// Base URL of the storage service (`.../storage/v1`)
    pub storage_url: Option<String>,
    /// Public API key sent to the storage service
    pub storage_api_key: Option<String>,
    /// Lifetime requested for signed document URLs
    pub signed_url_ttl_secs: u64,
    /// Per-request timeout; unset means the transport default
    pub timeout_secs: Option<u64>,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            storage_url: None,
            storage_api_key: None,
            signed_url_ttl_secs: 3600,
            timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from `CLAIMS_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Reads a `.env` file if present, then loads and validates the environment
    pub fn load() -> Result<Self, HttpError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HttpError> {
        if !is_http_url(&self.api_base_url) {
            return Err(HttpError::invalid_config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if let Some(storage_url) = &self.storage_url {
            if !is_http_url(storage_url) {
                return Err(HttpError::invalid_config(format!(
                    "storage_url must be an http(s) URL, got '{}'",
                    storage_url
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(HttpError::invalid_config("timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn storage_base(&self) -> Option<&str> {
        self.storage_url.as_deref().map(|u| u.trim_end_matches('/'))
    }

    /// Builds the shared `reqwest` client for these settings
    pub fn http_client(&self) -> Result<reqwest::Client, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
