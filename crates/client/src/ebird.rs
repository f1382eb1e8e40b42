//! eBird API 2.0 client.
//!
//! - **Endpoint**: `https://api.ebird.org/v2`
//! - **Authentication**: `X-eBirdApiToken` header.
//! - **Format**: hotspot endpoints default to CSV, so every hotspot request
//!   asks for `fmt=json`.
//!
//! The client makes exactly one request per call. Pacing and caching live in
//! the orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use fieldmark_core::error::SourceError;
use fieldmark_core::{AppConfig, Coordinate, EBirdSource};
use serde_json::{Value, json};
use url::Url;

use crate::error::ClientError;
use crate::http::{build_client, endpoint, get_json, parse_base};

pub const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2";

const TOKEN_HEADER: &str = "X-eBirdApiToken";

/// Largest `dist` the nearby hotspot endpoint accepts, in kilometres.
pub const MAX_DIST_KM: u32 = 500;

#[derive(Debug, Clone)]
pub struct EBirdConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl EBirdConfig {
    /// Build from application config.
    ///
    /// Fails with [`ClientError::MissingApiKey`] if no token is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let api_key = config.require_ebird_api_key().map_err(|_| ClientError::MissingApiKey)?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EBirdClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl EBirdClient {
    pub fn new(config: EBirdConfig) -> Result<Self, ClientError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        Ok(Self {
            http: build_client(config.timeout, &config.user_agent)?,
            base: parse_base(&config.base_url)?,
            api_key: config.api_key,
        })
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = endpoint(&self.base, segments)?;
        tracing::debug!(path = url.path(), "calling eBird");
        get_json(self.http.get(url).header(TOKEN_HEADER, &self.api_key).query(query)).await
    }

    /// Hotspots within `dist_km` of `coord`; the radius is capped at 500 km.
    pub async fn nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Value, ClientError> {
        let query = [
            ("lat", coord.latitude.to_string()),
            ("lng", coord.longitude.to_string()),
            ("dist", dist_km.min(MAX_DIST_KM).to_string()),
            ("fmt", "json".to_string()),
        ];
        self.get(&["ref", "hotspot", "geo"], &query).await
    }

    pub async fn region_info(&self, region_code: &str) -> Result<Value, ClientError> {
        self.get(&["ref", "region", "info", region_code], &[]).await
    }

    pub async fn species_list(&self, area_code: &str) -> Result<Value, ClientError> {
        self.get(&["product", "spplist", area_code], &[]).await
    }

    /// Taxonomy entries for several species codes in one request.
    pub async fn taxonomy(&self, species_codes: &[String]) -> Result<Value, ClientError> {
        if species_codes.is_empty() {
            return Ok(json!([]));
        }
        let query = [("species", species_codes.join(",")), ("fmt", "json".to_string())];
        self.get(&["ref", "taxonomy", "ebird"], &query).await
    }

    pub async fn hotspots_in_region(&self, region_code: &str) -> Result<Value, ClientError> {
        self.get(&["ref", "hotspot", region_code], &[("fmt", "json".to_string())])
            .await
    }
}

#[async_trait]
impl EBirdSource for EBirdClient {
    async fn nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Value, SourceError> {
        Ok(EBirdClient::nearby_hotspots(self, coord, dist_km).await?)
    }

    async fn region_info(&self, region_code: &str) -> Result<Value, SourceError> {
        Ok(EBirdClient::region_info(self, region_code).await?)
    }

    async fn species_list(&self, area_code: &str) -> Result<Value, SourceError> {
        Ok(EBirdClient::species_list(self, area_code).await?)
    }

    async fn taxonomy(&self, species_codes: &[String]) -> Result<Value, SourceError> {
        Ok(EBirdClient::taxonomy(self, species_codes).await?)
    }

    async fn hotspots_in_region(&self, region_code: &str) -> Result<Value, SourceError> {
        Ok(EBirdClient::hotspots_in_region(self, region_code).await?)
    }
}
