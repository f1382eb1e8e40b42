//! Nominatim (OpenStreetMap) geocoder.
//!
//! Nominatim's usage policy requires an identifying User-Agent and at most
//! one request per second; the orchestrator's pacing covers the latter.

use std::time::Duration;

use async_trait::async_trait;
use fieldmark_core::error::SourceError;
use fieldmark_core::{AppConfig, Geocoder};
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::http::{build_client, endpoint, get_json, parse_base};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base: Url,
    provider: String,
}

impl NominatimClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str, provider: &str) -> Result<Self, ClientError> {
        Ok(Self { http: build_client(timeout, user_agent)?, base: parse_base(base_url)?, provider: provider.to_string() })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL, config.timeout(), &config.user_agent, &config.geocode_provider)
    }

    /// Raw data of the best match, or None when nothing matched.
    pub async fn search(&self, query: &str) -> Result<Option<Value>, ClientError> {
        if query.trim().is_empty() {
            return Err(ClientError::InvalidRequest("geocode query must not be empty".into()));
        }

        let url = endpoint(&self.base, &["search"])?;
        let params = [("q", query), ("format", "json"), ("limit", "1")];
        let payload = get_json(self.http.get(url).query(&params)).await?;

        match payload {
            Value::Array(results) => Ok(results.into_iter().next()),
            other => Err(ClientError::Parse(format!("expected a result list, got {other}"))),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn geocode(&self, query: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.search(query).await?)
    }
}
