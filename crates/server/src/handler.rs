//! MCP server handler implementation.
//!
//! Routes tool calls to the implementations in [`crate::tools`].

use std::sync::Arc;

use fieldmark_core::Orchestrator;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::{
    cache::{CachePurgeParams, purge_impl},
    location::{
        FindCoordinateParams, FindRegionCodeParams, NearestHotspotParams, find_coordinate_impl, find_region_code_impl,
        nearest_hotspot_impl,
    },
    photos::{PhotoObservationsParams, photo_observations_impl},
    region::{RegionHotspotsParams, region_hotspots_impl},
    species::{SpeciesInRegionParams, species_in_region_impl},
};

/// The MCP server handler for mcp-birding.
#[derive(Clone)]
pub struct BirdingServer {
    orchestrator: Arc<Orchestrator>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BirdingServer {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator, tool_router: Self::tool_router() }
    }

    #[tool(description = "Geocode a free-text place description to latitude/longitude. Results are cached for 90 days.")]
    async fn find_coordinate(&self, params: Parameters<FindCoordinateParams>) -> Result<CallToolResult, McpError> {
        find_coordinate_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Find the eBird hotspot closest to a coordinate, searching outward up to 500 km.")]
    async fn nearest_hotspot(&self, params: Parameters<NearestHotspotParams>) -> Result<CallToolResult, McpError> {
        nearest_hotspot_impl(&self.orchestrator, params.0).await
    }

    #[tool(
        description = "Resolve a region description (country, state, county) to an eBird region code such as US-MN. \
                       Uses the given coordinate or geocodes the description."
    )]
    async fn find_region_code(&self, params: Parameters<FindRegionCodeParams>) -> Result<CallToolResult, McpError> {
        find_region_code_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "List every bird species ever reported in an eBird region, flat or as a taxonomic tree.")]
    async fn species_in_region(&self, params: Parameters<SpeciesInRegionParams>) -> Result<CallToolResult, McpError> {
        species_in_region_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "List the eBird hotspots in a region.")]
    async fn region_hotspots(&self, params: Parameters<RegionHotspotsParams>) -> Result<CallToolResult, McpError> {
        region_hotspots_impl(&self.orchestrator, params.0).await
    }

    #[tool(
        description = "Fetch research-grade iNaturalist observations with Creative Commons photos for a taxon on a \
                       given day of the month."
    )]
    async fn photo_observations(
        &self, params: Parameters<PhotoObservationsParams>,
    ) -> Result<CallToolResult, McpError> {
        photo_observations_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Delete expired rows from the local cache, for one table or all tables.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.orchestrator.db(), params.0).await
    }
}

impl ServerHandler for BirdingServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-birding".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
