//! Recording mock sources for orchestrator tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::Orchestrator;
use crate::cache::CacheDb;
use crate::coord::Coordinate;
use crate::error::SourceError;
use crate::source::{EBirdSource, Geocoder, PhotoSource};

#[derive(Debug, thiserror::Error)]
#[error("mock failure: {0}")]
pub struct MockError(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Nearby(Coordinate, u32),
    RegionInfo(String),
    SpeciesList(String),
    Taxonomy(Vec<String>),
    HotspotsInRegion(String),
}

#[derive(Default)]
pub struct MockEBird {
    nearby: HashMap<u32, Value>,
    regions: HashMap<String, Value>,
    species_lists: HashMap<String, Value>,
    taxonomy: HashMap<String, Value>,
    taxonomy_extra: Vec<Value>,
    region_hotspots: HashMap<String, Value>,
    failure: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockEBird {
    pub fn with_nearby(mut self, dist_km: u32, hotspots: Value) -> Self {
        self.nearby.insert(dist_km, hotspots);
        self
    }

    pub fn with_region(self, code: &str, name: &str) -> Self {
        self.with_region_payload(code, json!({"code": code, "type": "country", "result": name}))
    }

    pub fn with_region_payload(mut self, code: &str, payload: Value) -> Self {
        self.regions.insert(code.into(), payload);
        self
    }

    pub fn with_species_list(mut self, area_code: &str, codes: Value) -> Self {
        self.species_lists.insert(area_code.into(), codes);
        self
    }

    pub fn with_taxon(mut self, code: &str) -> Self {
        self.taxonomy.insert(code.into(), taxon_json(code));
        self
    }

    /// Entries returned by every taxonomy call in addition to the requested ones.
    pub fn with_taxonomy_extra(mut self, entry: Value) -> Self {
        self.taxonomy_extra.push(entry);
        self
    }

    pub fn with_region_hotspots(mut self, code: &str, hotspots: Value) -> Self {
        self.region_hotspots.insert(code.into(), hotspots);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), SourceError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(Box::new(MockError(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EBirdSource for MockEBird {
    async fn nearby_hotspots(&self, coord: Coordinate, dist_km: u32) -> Result<Value, SourceError> {
        self.record(Call::Nearby(coord, dist_km))?;
        Ok(self.nearby.get(&dist_km).cloned().unwrap_or_else(|| json!([])))
    }

    async fn region_info(&self, region_code: &str) -> Result<Value, SourceError> {
        self.record(Call::RegionInfo(region_code.into()))?;
        self.regions
            .get(region_code)
            .cloned()
            .ok_or_else(|| Box::new(MockError(format!("no region {region_code}"))) as SourceError)
    }

    async fn species_list(&self, area_code: &str) -> Result<Value, SourceError> {
        self.record(Call::SpeciesList(area_code.into()))?;
        Ok(self.species_lists.get(area_code).cloned().unwrap_or_else(|| json!([])))
    }

    async fn taxonomy(&self, species_codes: &[String]) -> Result<Value, SourceError> {
        self.record(Call::Taxonomy(species_codes.to_vec()))?;
        let entries = species_codes
            .iter()
            .filter_map(|code| self.taxonomy.get(code).cloned())
            .chain(self.taxonomy_extra.iter().cloned())
            .collect();
        Ok(Value::Array(entries))
    }

    async fn hotspots_in_region(&self, region_code: &str) -> Result<Value, SourceError> {
        self.record(Call::HotspotsInRegion(region_code.into()))?;
        Ok(self.region_hotspots.get(region_code).cloned().unwrap_or_else(|| json!([])))
    }
}

#[derive(Default)]
pub struct MockGeocoder {
    results: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl MockGeocoder {
    pub fn with_result(mut self, query: &str, data: Value) -> Self {
        self.results.insert(query.into(), data);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    fn provider(&self) -> &str {
        "Mock"
    }

    async fn geocode(&self, query: &str) -> Result<Option<Value>, SourceError> {
        self.calls.lock().unwrap().push(query.into());
        Ok(self.results.get(query).cloned())
    }
}

#[derive(Default)]
pub struct MockPhotos {
    results: HashMap<String, Value>,
    calls: Mutex<Vec<(String, u8)>>,
}

impl MockPhotos {
    pub fn with_result(mut self, taxon_name: &str, data: Value) -> Self {
        self.results.insert(taxon_name.into(), data);
        self
    }

    pub fn calls(&self) -> Vec<(String, u8)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoSource for MockPhotos {
    async fn photo_observations(&self, taxon_name: &str, day_of_month: u8) -> Result<Value, SourceError> {
        self.calls.lock().unwrap().push((taxon_name.into(), day_of_month));
        Ok(self
            .results
            .get(taxon_name)
            .cloned()
            .unwrap_or_else(|| json!({"total_results": 0, "results": []})))
    }
}

/// An orchestrator over an in-memory cache with zero pacing, plus handles to its mocks.
pub struct Harness {
    pub orchestrator: Orchestrator,
    pub ebird: Arc<MockEBird>,
    pub geocoder: Arc<MockGeocoder>,
    pub photos: Arc<MockPhotos>,
}

impl Harness {
    pub async fn new(ebird: MockEBird) -> Self {
        Self::with_sources(ebird, MockGeocoder::default(), MockPhotos::default()).await
    }

    pub async fn with_sources(ebird: MockEBird, geocoder: MockGeocoder, photos: MockPhotos) -> Self {
        let db = CacheDb::open_in_memory().await.unwrap();
        let ebird = Arc::new(ebird);
        let geocoder = Arc::new(geocoder);
        let photos = Arc::new(photos);
        let orchestrator =
            Orchestrator::new(db, ebird.clone(), geocoder.clone(), photos.clone()).with_pacing(Duration::ZERO);
        Self { orchestrator, ebird, geocoder, photos }
    }
}

pub fn hotspot_json(id: &str, country: &str, subnat1: Option<&str>, lat: f64, lng: f64) -> Value {
    json!({
        "locId": id,
        "locName": format!("Hotspot {id}"),
        "countryCode": country,
        "subnational1Code": subnat1,
        "lat": lat,
        "lng": lng,
        "numSpeciesAllTime": 100
    })
}

pub fn taxon_json(code: &str) -> Value {
    json!({
        "sciName": format!("Genus {code}"),
        "comName": format!("Bird {code}"),
        "speciesCode": code,
        "order": "Passeriformes",
        "familyComName": "Finches",
        "familySciName": "Fringillidae"
    })
}
