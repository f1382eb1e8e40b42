//! Shared request plumbing for the JSON APIs.

use std::time::Duration;

use reqwest::header;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, ClientError> {
    if user_agent.trim().is_empty() {
        return Err(ClientError::InvalidRequest("user agent must not be empty".into()));
    }
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(ClientError::from)
}

pub(crate) fn parse_base(base_url: &str) -> Result<Url, ClientError> {
    Url::parse(base_url).map_err(|e| ClientError::InvalidRequest(format!("base URL '{base_url}': {e}")))
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidRequest(format!("base URL '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a GET request and decode a JSON body, mapping HTTP status codes.
pub(crate) async fn get_json(request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
    let response = request.header(header::ACCEPT, "application/json").send().await?;

    let status = response.status();
    tracing::debug!(%status, url = %response.url(), "upstream response");

    if status == 401 || status == 403 {
        return Err(ClientError::AuthError);
    }

    if status == 429 {
        return Err(ClientError::RateLimited);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(ClientError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = parse_base("https://api.ebird.org/v2").unwrap();
        let url = endpoint(&base, &["ref", "region", "info", "US-MN"]).unwrap();
        assert_eq!(url.as_str(), "https://api.ebird.org/v2/ref/region/info/US-MN");
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let base = parse_base("http://127.0.0.1:8080/").unwrap();
        let url = endpoint(&base, &["search"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/search");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = parse_base("https://api.ebird.org/v2").unwrap();
        let url = endpoint(&base, &["ref", "region", "info", "US/MN"]).unwrap();
        assert_eq!(url.as_str(), "https://api.ebird.org/v2/ref/region/info/US%2FMN");
    }

    #[test]
    fn test_parse_base_invalid() {
        assert!(matches!(parse_base("not a url"), Err(ClientError::InvalidRequest(_))));
    }

    #[test]
    fn test_build_client_requires_user_agent() {
        let result = build_client(Duration::from_secs(1), " ");
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }
}
