//! iNaturalist observation search for species photos.

use std::time::Duration;

use async_trait::async_trait;
use fieldmark_core::error::SourceError;
use fieldmark_core::{AppConfig, PhotoSource};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::http::{build_client, endpoint, get_json, parse_base};

pub const DEFAULT_BASE_URL: &str = "https://api.inaturalist.org/v1";

/// Photo licenses whose images may be reused with attribution.
pub const PHOTO_LICENSES: [&str; 7] = ["CC-BY", "CC-BY-NC", "CC-BY-ND", "CC-BY-SA", "CC-BY-NC-ND", "CC-BY-NC-SA", "CC0"];

/// Query for research-grade, wild, photographed observations.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationQuery {
    pub taxon_name: String,
    pub identified: bool,
    pub captive: bool,
    pub photos: bool,
    pub quality_grade: &'static str,
    pub photo_license: String,
    /// Favorited by at least one user.
    pub popular: bool,
    pub day: u8,
}

impl ObservationQuery {
    pub fn new(taxon_name: &str, day_of_month: u8) -> Self {
        Self {
            taxon_name: taxon_name.to_string(),
            identified: true,
            captive: false,
            photos: true,
            quality_grade: "research",
            photo_license: PHOTO_LICENSES.join(","),
            popular: true,
            day: day_of_month,
        }
    }
}

#[derive(Debug, Clone)]
pub struct INaturalistClient {
    http: reqwest::Client,
    base: Url,
}

impl INaturalistClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ClientError> {
        Ok(Self { http: build_client(timeout, user_agent)?, base: parse_base(base_url)? })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL, config.timeout(), &config.user_agent)
    }

    pub async fn observations(&self, query: &ObservationQuery) -> Result<Value, ClientError> {
        let url = endpoint(&self.base, &["observations"])?;
        tracing::debug!(taxon = %query.taxon_name, day = query.day, "calling iNaturalist");
        get_json(self.http.get(url).query(query)).await
    }
}

#[async_trait]
impl PhotoSource for INaturalistClient {
    async fn photo_observations(&self, taxon_name: &str, day_of_month: u8) -> Result<Value, SourceError> {
        Ok(self.observations(&ObservationQuery::new(taxon_name, day_of_month)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_observation_query_params() {
        let server = MockServer::start().await;
        let body = json!({"total_results": 1, "page": 1, "results": [{"id": 7, "photos": []}]});
        Mock::given(method("GET"))
            .and(path("/observations"))
            .and(query_param("taxon_name", "Corvus corax"))
            .and(query_param("identified", "true"))
            .and(query_param("captive", "false"))
            .and(query_param("photos", "true"))
            .and(query_param("quality_grade", "research"))
            .and(query_param("photo_license", "CC-BY,CC-BY-NC,CC-BY-ND,CC-BY-SA,CC-BY-NC-ND,CC-BY-NC-SA,CC0"))
            .and(query_param("popular", "true"))
            .and(query_param("day", "14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = INaturalistClient::new(&server.uri(), Duration::from_secs(5), "fieldmark-test").unwrap();
        let source: &dyn PhotoSource = &client;
        assert_eq!(source.photo_observations("Corvus corax", 14).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = INaturalistClient::new(&server.uri(), Duration::from_secs(5), "fieldmark-test").unwrap();
        let result = client.observations(&ObservationQuery::new("Corvus", 1)).await;
        assert!(matches!(result, Err(ClientError::HttpError { status: 500 })));
    }
}
