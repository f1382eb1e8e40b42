//! Validation of loaded `AppConfig` values.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `pacing_ms` exceeds one minute
    /// - `user_agent` or `geocode_provider` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.pacing_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "pacing_ms".into(),
                reason: "must not exceed one minute (60000ms)".into(),
            });
        }
        if self.pacing_ms == 0 {
            tracing::warn!("pacing_ms is 0; upstream rate limits will not be respected");
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.geocode_provider.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "geocode_provider".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
