//! photo_observations tool implementation.

use fieldmark_core::Orchestrator;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, require_text};

/// Input parameters for photo_observations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhotoObservationsParams {
    /// Scientific or common name of a taxon, e.g. "Corvus corax".
    pub taxon_name: String,

    /// Day of month the observations were made on (1-31, default 1).
    #[serde(default = "default_day")]
    pub day_of_month: u8,
}

fn default_day() -> u8 {
    1
}

pub async fn photo_observations_impl(
    orchestrator: &Orchestrator, params: PhotoObservationsParams,
) -> Result<CallToolResult, McpError> {
    let taxon_name = require_text("taxon_name", &params.taxon_name)?;
    let observations = orchestrator
        .retrieve_photo_observations(taxon_name, params.day_of_month)
        .await?;
    json_result(&observations)
}
