//! Location tools: find_coordinate, nearest_hotspot and find_region_code.

use fieldmark_core::{Coordinate, Hotspot, Orchestrator};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, require_coordinate, require_text};

/// Input parameters for find_coordinate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindCoordinateParams {
    /// Free-text place description, e.g. "Minneapolis, MN".
    pub description: String,
}

/// Output of find_coordinate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindCoordinateOutput {
    pub description: String,
    /// None when the geocoder found no match.
    pub coordinate: Option<Coordinate>,
}

pub async fn find_coordinate_impl(
    orchestrator: &Orchestrator, params: FindCoordinateParams,
) -> Result<CallToolResult, McpError> {
    let description = require_text("description", &params.description)?;
    let coordinate = orchestrator.find_coordinate(description).await?;
    json_result(&FindCoordinateOutput { description: description.to_string(), coordinate })
}

/// Input parameters for nearest_hotspot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NearestHotspotParams {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Output of nearest_hotspot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NearestHotspotOutput {
    /// None when no hotspot lies within 500 km.
    pub hotspot: Option<Hotspot>,
}

pub async fn nearest_hotspot_impl(
    orchestrator: &Orchestrator, params: NearestHotspotParams,
) -> Result<CallToolResult, McpError> {
    let coord = require_coordinate(params.latitude, params.longitude)?;
    let hotspot = orchestrator.find_nearest_hotspot(coord).await?;
    json_result(&NearestHotspotOutput { hotspot })
}

/// Input parameters for find_region_code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindRegionCodeParams {
    /// Region description, e.g. "Minnesota" or "Hennepin County".
    pub description: String,
    /// Latitude of a point inside the region. Geocoded from the description when omitted.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of a point inside the region.
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Output of find_region_code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindRegionCodeOutput {
    pub description: String,
    /// eBird region code, e.g. "US-MN".
    pub region_code: Option<String>,
}

pub async fn find_region_code_impl(
    orchestrator: &Orchestrator, params: FindRegionCodeParams,
) -> Result<CallToolResult, McpError> {
    let description = require_text("description", &params.description)?;

    let region_code = match (params.latitude, params.longitude) {
        (Some(lat), Some(lng)) => {
            let coord = require_coordinate(lat, lng)?;
            orchestrator.find_region_code(description, coord).await?
        }
        (None, None) => orchestrator.find_region_code_for(description).await?,
        _ => {
            return Err(fieldmark_core::Error::InvalidInput(
                "latitude and longitude must be given together".to_string(),
            )
            .into());
        }
    };

    json_result(&FindRegionCodeOutput { description: description.to_string(), region_code })
}
