//! region_hotspots tool implementation.

use fieldmark_core::{Hotspot, Orchestrator};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, require_text};

/// Input parameters for region_hotspots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegionHotspotsParams {
    /// eBird region code, e.g. "US-MN-053".
    pub region_code: String,

    /// Return at most this many hotspots, most species first.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output of region_hotspots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegionHotspotsOutput {
    pub region_code: String,
    /// Hotspots in the region before any limit was applied.
    pub total: usize,
    pub hotspots: Vec<Hotspot>,
}

pub async fn region_hotspots_impl(
    orchestrator: &Orchestrator, params: RegionHotspotsParams,
) -> Result<CallToolResult, McpError> {
    let region_code = require_text("region_code", &params.region_code)?;
    let mut hotspots = orchestrator.retrieve_hotspots_in_region(region_code).await?;
    let total = hotspots.len();

    if let Some(limit) = params.limit {
        hotspots.sort_by(|a, b| b.all_time_species.cmp(&a.all_time_species));
        hotspots.truncate(limit);
    }

    json_result(&RegionHotspotsOutput { region_code: region_code.to_string(), total, hotspots })
}
