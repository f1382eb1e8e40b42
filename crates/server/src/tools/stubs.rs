//! Canned upstream sources for tool tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fieldmark_core::error::SourceError;
use fieldmark_core::{CacheDb, Coordinate, EBirdSource, Geocoder, Orchestrator, PhotoSource};
use serde_json::{Value, json};

/// Minneapolis, one hotspot within 5 km.
pub struct StubEBird;

#[async_trait]
impl EBirdSource for StubEBird {
    async fn nearby_hotspots(&self, _coord: Coordinate, dist_km: u32) -> Result<Value, SourceError> {
        if dist_km < 5 {
            return Ok(json!([]));
        }
        Ok(json!([{
            "locId": "L166528",
            "locName": "Lake Harriet",
            "countryCode": "US",
            "subnational1Code": "US-MN",
            "subnational2Code": "US-MN-053",
            "lat": 44.9221,
            "lng": -93.3054,
            "numSpeciesAllTime": 250
        }]))
    }

    async fn region_info(&self, region_code: &str) -> Result<Value, SourceError> {
        let name = match region_code {
            "US" => "United States",
            "US-MN" => "Minnesota",
            "US-MN-053" => "Hennepin",
            _ => "Unknown",
        };
        Ok(json!({"code": region_code, "result": name}))
    }

    async fn species_list(&self, _area_code: &str) -> Result<Value, SourceError> {
        Ok(json!(["comrav", "amecro"]))
    }

    async fn taxonomy(&self, species_codes: &[String]) -> Result<Value, SourceError> {
        let entries = species_codes
            .iter()
            .map(|code| {
                let (common, sci) = match code.as_str() {
                    "amecro" => ("American Crow", "Corvus brachyrhynchos"),
                    _ => ("Common Raven", "Corvus corax"),
                };
                json!({
                    "comName": common,
                    "sciName": sci,
                    "speciesCode": code,
                    "order": "Passeriformes",
                    "familyComName": "Crows, Jays, and Magpies",
                    "familySciName": "Corvidae"
                })
            })
            .collect();
        Ok(Value::Array(entries))
    }

    async fn hotspots_in_region(&self, region_code: &str) -> Result<Value, SourceError> {
        self.nearby_hotspots(Coordinate::new(0.0, 0.0), 5)
            .await
            .map(|v| if region_code == "US-MN-053" { v } else { json!([]) })
    }
}

pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    fn provider(&self) -> &str {
        "Stub"
    }

    async fn geocode(&self, query: &str) -> Result<Option<Value>, SourceError> {
        Ok(query
            .contains("Minneapolis")
            .then(|| json!({"lat": "44.9772995", "lon": "-93.2654692", "display_name": "Minneapolis"})))
    }
}

pub struct StubPhotos;

#[async_trait]
impl PhotoSource for StubPhotos {
    async fn photo_observations(&self, taxon_name: &str, day_of_month: u8) -> Result<Value, SourceError> {
        Ok(json!({"total_results": 1, "results": [{"taxon": taxon_name, "day": day_of_month}]}))
    }
}

pub async fn orchestrator() -> Orchestrator {
    let db = CacheDb::open_in_memory().await.unwrap();
    Orchestrator::new(db, Arc::new(StubEBird), Arc::new(StubGeocoder), Arc::new(StubPhotos)).with_pacing(Duration::ZERO)
}
