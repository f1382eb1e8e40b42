//! MCP tool implementations.
//!
//! Each tool validates its parameters, calls the orchestrator and returns
//! pretty-printed JSON as text content.

pub mod cache;
pub mod location;
pub mod photos;
pub mod region;
pub mod species;

#[cfg(test)]
pub(crate) mod stubs;

use fieldmark_core::{Coordinate, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

pub(crate) fn require_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, Error> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::InvalidInput(format!("latitude {latitude} is outside [-90, 90]")));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::InvalidInput(format!("longitude {longitude} is outside [-180, 180]")));
    }
    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
pub(crate) fn result_json(result: &CallToolResult) -> serde_json::Value {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
