//! cache_purge tool implementation.
//!
//! Deletes expired rows, from one table or all of them.

use std::str::FromStr;

use fieldmark_core::CacheDb;
use fieldmark_core::cache::{Table, now_epoch};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Only purge this table, e.g. "nearby_hotspots_cache". All tables when omitted.
    #[serde(default)]
    pub table: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of expired rows deleted.
    pub deleted: u64,
}

pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let now = now_epoch();

    let deleted = match params.table.as_deref() {
        Some(name) => cache.purge_expired(Table::from_str(name)?, now).await?,
        None => cache.purge_all_expired(now).await?,
    };

    tracing::info!(deleted, table = params.table.as_deref().unwrap_or("*"), "purged expired cache rows");
    json_result(&CachePurgeOutput { deleted })
}
