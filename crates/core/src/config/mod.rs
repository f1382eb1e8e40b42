//! Application configuration with layered loading.
//!
//! Configuration is read with figment from, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if FIELDMARK_CONFIG_FILE set)
//! 3. Environment variables (FIELDMARK_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// eBird API token.
    ///
    /// Set via FIELDMARK_EBIRD_API_KEY. Checked only when an eBird client is built.
    #[serde(default)]
    pub ebird_api_key: Option<String>,

    /// Path to the SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests. Nominatim rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay after every live upstream call, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Provider label stored in geocode cache keys.
    #[serde(default = "default_geocode_provider")]
    pub geocode_provider: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./fieldmark-cache.sqlite")
}

fn default_user_agent() -> String {
    "fieldmark/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_pacing_ms() -> u64 {
    1_000
}

fn default_geocode_provider() -> String {
    "Nominatim".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ebird_api_key: None,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            pacing_ms: default_pacing_ms(),
            geocode_provider: default_geocode_provider(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FIELDMARK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FIELDMARK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Deferred check for the eBird token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is unset or blank.
    pub fn require_ebird_api_key(&self) -> Result<&str, ConfigError> {
        self.ebird_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "ebird_api_key".into(),
                hint: "Set FIELDMARK_EBIRD_API_KEY environment variable".into(),
            })
    }
}
