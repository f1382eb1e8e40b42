//! species_in_region tool implementation.
//!
//! Resolves every species ever reported in an eBird region, either as a flat
//! list or grouped into a taxonomic tree.

use fieldmark_core::taxonomy::TaxonomicClass;
use fieldmark_core::{Orchestrator, SpeciesRecord};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, require_text};

/// Input parameters for species_in_region.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInRegionParams {
    /// eBird region code, e.g. "US-MN".
    pub region_code: String,

    /// Group the species into order, family and genus instead of a flat list.
    #[serde(default)]
    pub as_tree: bool,
}

/// Output of species_in_region.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesInRegionOutput {
    pub region_code: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Vec<SpeciesRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<TaxonomicClass>,
}

pub async fn species_in_region_impl(
    orchestrator: &Orchestrator, params: SpeciesInRegionParams,
) -> Result<CallToolResult, McpError> {
    let region_code = require_text("region_code", &params.region_code)?;
    let species = orchestrator.find_species_in_region(region_code).await?;

    let mut output =
        SpeciesInRegionOutput { region_code: region_code.to_string(), count: species.len(), species: None, taxonomy: None };

    if params.as_tree {
        output.taxonomy = Some(species.iter().map(|s| &s.species).collect());
    } else {
        output.species = Some(species.iter().map(SpeciesRecord::from).collect());
    }

    json_result(&output)
}
