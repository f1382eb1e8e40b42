//! Region code lookup from a place description.

use super::Orchestrator;
use crate::Error;
use crate::coord::Coordinate;
use crate::model::RegionInfo;

impl Orchestrator {
    /// eBird region code best matching `description` near `coord`.
    ///
    /// Takes the nearest hotspot's country, subnational-1 and subnational-2
    /// codes as candidates and returns the one whose region name is most
    /// similar to `description`. Equal scores keep the coarser region.
    pub async fn find_region_code(&self, description: &str, coord: Coordinate) -> Result<Option<String>, Error> {
        let Some(hotspot) = self.find_nearest_hotspot(coord).await? else {
            return Ok(None);
        };

        let mut best: Option<(f64, RegionInfo)> = None;
        for code in hotspot.location.region_codes() {
            let info = self.retrieve_region_info(code).await?;
            let score = (self.similarity)(description, &info.name);
            tracing::debug!(code, name = %info.name, score, "region candidate");

            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, info));
            }
        }

        Ok(best.map(|(_, info)| info.code))
    }

    /// Region code for a free-text description, geocoding it first.
    pub async fn find_region_code_for(&self, description: &str) -> Result<Option<String>, Error> {
        match self.find_coordinate(description).await? {
            Some(coord) => self.find_region_code(description, coord).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use serde_json::json;

    fn flat_similarity(_a: &str, _b: &str) -> f64 {
        50.0
    }

    fn minnesota() -> MockEBird {
        MockEBird::default()
            .with_nearby(0, json!([hotspot_json("L1", "US", Some("US-MN"), 44.97, -93.26)]))
            .with_region("US", "United States")
            .with_region("US-MN", "Minnesota")
    }

    #[tokio::test]
    async fn test_best_match_wins() {
        let h = Harness::new(minnesota()).await;
        let code = h
            .orchestrator
            .find_region_code("Minnesota", Coordinate::new(44.97, -93.26))
            .await
            .unwrap();
        assert_eq!(code.as_deref(), Some("US-MN"));
    }

    #[tokio::test]
    async fn test_tie_keeps_country() {
        let h = Harness::new(minnesota()).await;
        let orchestrator = h.orchestrator.with_similarity(flat_similarity);

        let code = orchestrator
            .find_region_code("anything", Coordinate::new(44.97, -93.26))
            .await
            .unwrap();
        assert_eq!(code.as_deref(), Some("US"));
        assert_eq!(
            h.ebird.calls()[1..],
            [Call::RegionInfo("US".into()), Call::RegionInfo("US-MN".into())]
        );
    }

    #[tokio::test]
    async fn test_returns_canonical_code() {
        let ebird = MockEBird::default()
            .with_nearby(0, json!([hotspot_json("L1", "GB", None, 51.5, -0.1)]))
            .with_region_payload("GB", json!({"code": "GB", "result": "United Kingdom"}));
        let h = Harness::new(ebird).await;

        let code = h.orchestrator.find_region_code("UK", Coordinate::new(51.5, -0.1)).await.unwrap();
        assert_eq!(code.as_deref(), Some("GB"));
    }

    #[tokio::test]
    async fn test_no_hotspot_no_region() {
        let h = Harness::new(MockEBird::default()).await;
        let code = h.orchestrator.find_region_code("Nowhere", Coordinate::new(0.0, 0.0)).await.unwrap();
        assert!(code.is_none());
        assert!(!h.ebird.calls().iter().any(|c| matches!(c, Call::RegionInfo(_))));
    }

    #[tokio::test]
    async fn test_region_from_description() {
        let geocoder = MockGeocoder::default().with_result("Minnesota", json!({"lat": "44.97", "lon": "-93.26"}));
        let h = Harness::with_sources(minnesota(), geocoder, MockPhotos::default()).await;

        let code = h.orchestrator.find_region_code_for("Minnesota").await.unwrap();
        assert_eq!(code.as_deref(), Some("US-MN"));

        assert!(h.orchestrator.find_region_code_for("Atlantis").await.unwrap().is_none());
    }
}
