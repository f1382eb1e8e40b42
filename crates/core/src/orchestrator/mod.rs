//! Cache-or-fetch orchestration over the upstream sources.
//!
//! Every query shape goes through the same path: derive the cache key, return
//! a valid cached payload if there is one, otherwise call the source, pause for
//! the pacing interval, check the payload shape and write it back.
//!
//! All steps run sequentially; no call here fans out concurrent requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::Error;
use crate::cache::schema::json_type_name;
use crate::cache::{CacheDb, CacheKey, Table, now_epoch};
use crate::coord::{Coordinate, geodesic_km};
use crate::error::SourceError;
use crate::model::{Hotspot, RegionInfo};
use crate::source::{EBirdSource, Geocoder, PhotoSource};

pub mod region;
pub mod search;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod testing;

/// Default delay after each live upstream call.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Distance between two coordinates in kilometres.
pub type DistanceFn = fn(Coordinate, Coordinate) -> f64;

/// Similarity of two strings, higher is more similar.
pub type SimilarityFn = fn(&str, &str) -> f64;

/// Normalized Levenshtein similarity scaled to 0..=100.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Cache-aware front for the eBird, geocoding and photo sources.
pub struct Orchestrator {
    db: CacheDb,
    ebird: Arc<dyn EBirdSource>,
    geocoder: Arc<dyn Geocoder>,
    photos: Arc<dyn PhotoSource>,
    pacing: Duration,
    distance: DistanceFn,
    similarity: SimilarityFn,
}

impl Orchestrator {
    pub fn new(
        db: CacheDb, ebird: Arc<dyn EBirdSource>, geocoder: Arc<dyn Geocoder>, photos: Arc<dyn PhotoSource>,
    ) -> Self {
        Self {
            db,
            ebird,
            geocoder,
            photos,
            pacing: DEFAULT_PACING,
            distance: geodesic_km,
            similarity: name_similarity,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_distance(mut self, distance: DistanceFn) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityFn) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    async fn pace(&self) {
        tokio::time::sleep(self.pacing).await;
    }

    /// Return the cached payload for `key`, or fetch, store and return it.
    async fn cached_or_fetch<F, Fut>(&self, table: Table, key: CacheKey, fetch: F) -> Result<Value, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, SourceError>>,
    {
        self.cached_or_fetch_opt(table, key, move || async move { fetch().await.map(Some) })
            .await?
            .ok_or_else(|| Error::MalformedSourcePayload(format!("{table}: upstream sent nothing")))
    }

    /// Like [`Self::cached_or_fetch`], for sources that may answer "no match".
    ///
    /// A failing fetch is returned as [`Error::Source`] without pacing and
    /// nothing is stored. A "no match" answer is paced but not stored. A live
    /// payload of the wrong shape is rejected with
    /// [`Error::MalformedSourcePayload`] before it reaches the store.
    async fn cached_or_fetch_opt<F, Fut>(&self, table: Table, key: CacheKey, fetch: F) -> Result<Option<Value>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>, SourceError>>,
    {
        if let Some(payload) = self.db.get(table, &key).await? {
            tracing::debug!(table = %table, key = ?key.fields(), "cache hit");
            return Ok(Some(payload));
        }

        let fetched_at = now_epoch();
        tracing::info!(table = %table, key = ?key.fields(), "cache miss, calling upstream");

        let found = fetch().await.map_err(Error::Source)?;
        self.pace().await;

        let Some(payload) = found else {
            tracing::info!(table = %table, key = ?key.fields(), "upstream found no match");
            return Ok(None);
        };

        let shape = table.payload_shape();
        if !shape.matches(&payload) {
            return Err(Error::MalformedSourcePayload(format!(
                "{table}: expected {}, upstream sent {}",
                shape.name(),
                json_type_name(&payload)
            )));
        }

        self.db.put(table, &key, &payload, fetched_at).await?;
        Ok(Some(payload))
    }

    /// Raw nearby-hotspot list, keyed on the quantized coordinate.
    pub async fn nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Value, Error> {
        let cell = coord.cache_key();
        let key = CacheKey::new()
            .with("lat_round", cell.latitude)
            .with("lng_round", cell.longitude)
            .with("dist_km", dist_km);

        self.cached_or_fetch(Table::NearbyHotspots, key, || self.ebird.nearby_hotspots(coord, dist_km))
            .await
    }

    pub async fn retrieve_nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Vec<Hotspot>, Error> {
        let payload = self.nearby_hotspots(coord, dist_km).await?;
        Hotspot::list_from_json(&payload)
    }

    pub async fn retrieve_region_info(&self, region_code: &str) -> Result<RegionInfo, Error> {
        let key = CacheKey::new().with("region_code", region_code);
        let payload = self
            .cached_or_fetch(Table::RegionInfo, key, || self.ebird.region_info(region_code))
            .await?;
        RegionInfo::from_json(&payload)
    }

    /// Species codes ever reported in an area, in eBird taxonomic order.
    pub async fn retrieve_species_list(&self, area_code: &str) -> Result<Vec<String>, Error> {
        let key = CacheKey::new().with("area_code", area_code);
        let payload = self
            .cached_or_fetch(Table::SpeciesList, key, || self.ebird.species_list(area_code))
            .await?;

        payload
            .as_array()
            .into_iter()
            .flatten()
            .map(|code| {
                code.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::MalformedSourcePayload(format!("species list for {area_code}: {code}")))
            })
            .collect()
    }

    pub async fn retrieve_hotspots_in_region(&self, region_code: &str) -> Result<Vec<Hotspot>, Error> {
        let key = CacheKey::new().with("region_code", region_code);
        let payload = self
            .cached_or_fetch(Table::HotspotsInRegion, key, || self.ebird.hotspots_in_region(region_code))
            .await?;
        Hotspot::list_from_json(&payload)
    }

    /// Best geocoder match for `query`.
    ///
    /// A "no match" answer is paced like any live call but never cached.
    pub async fn geocode(&self, query: &str) -> Result<Option<Value>, Error> {
        let key = CacheKey::new()
            .with("provider", self.geocoder.provider())
            .with("query", query);
        self.cached_or_fetch_opt(Table::Geocode, key, || self.geocoder.geocode(query))
            .await
    }

    /// Coordinate for a free-text place description.
    pub async fn find_coordinate(&self, description: &str) -> Result<Option<Coordinate>, Error> {
        match self.geocode(description).await? {
            Some(data) => Coordinate::from_geocode(&data).map(Some),
            None => Ok(None),
        }
    }

    /// Photo observations of a taxon recorded on a given day of the month.
    pub async fn retrieve_photo_observations(&self, taxon_name: &str, day_of_month: u8) -> Result<Value, Error> {
        if !(1..=31).contains(&day_of_month) {
            return Err(Error::InvalidInput(format!("day_of_month must be 1-31, got {day_of_month}")));
        }

        let key = CacheKey::new()
            .with("taxon_name", taxon_name)
            .with("day_of_month", day_of_month);
        self.cached_or_fetch(Table::ObservationPhotos, key, || {
            self.photos.photo_observations(taxon_name, day_of_month)
        })
        .await
    }
}
