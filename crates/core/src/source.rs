//! Traits for the upstream data sources.
//!
//! Implementations return raw JSON exactly as the upstream service sent it.
//! Errors are boxed and travel through [`Error::Source`](crate::Error::Source)
//! untouched, so callers can downcast to the implementation's error type.

use async_trait::async_trait;
use serde_json::Value;

use crate::Coordinate;
use crate::error::SourceError;

/// eBird reference and product endpoints.
#[async_trait]
pub trait EBirdSource: Send + Sync {
    /// Hotspots within `dist_km` of `coord`. A list.
    async fn nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Value, SourceError>;

    /// Region info object with `code` and `result` (display name).
    async fn region_info(&self, region_code: &str) -> Result<Value, SourceError>;

    /// Species codes ever observed in an area. A list of strings.
    async fn species_list(&self, area_code: &str) -> Result<Value, SourceError>;

    /// Taxonomy entries for the given species codes, in one call. A list.
    async fn taxonomy(&self, species_codes: &[String]) -> Result<Value, SourceError>;

    /// Hotspots in a region. A list.
    async fn hotspots_in_region(&self, region_code: &str) -> Result<Value, SourceError>;
}

/// Free-text geocoder.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Label stored in cache keys so results from different providers never mix.
    fn provider(&self) -> &str;

    /// Best match for `query`, or None when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<Value>, SourceError>;
}

/// Photo observation search.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Observations of `taxon_name` with photos, recorded on `day_of_month`. An object.
    async fn photo_observations(&self, taxon_name: &str, day_of_month: u8) -> Result<Value, SourceError>;
}
