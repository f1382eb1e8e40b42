//! Nearest hotspot by widening radius.

use super::Orchestrator;
use crate::Error;
use crate::coord::Coordinate;
use crate::model::Hotspot;

pub const RADIUS_STEP_KM: u32 = 5;

/// Largest radius eBird accepts for nearby hotspot queries.
pub const MAX_RADIUS_KM: u32 = 500;

impl Orchestrator {
    /// Find the hotspot closest to `coord`.
    ///
    /// Probes radii 0, 5, ..., 500 km in order and stops at the first radius
    /// returning any hotspot; each radius is cached independently, empty
    /// results included. Among the hotspots at that radius the one with the
    /// smallest distance wins, ties going to the earlier one.
    pub async fn find_nearest_hotspot(&self, coord: Coordinate) -> Result<Option<Hotspot>, Error> {
        for dist_km in (0..=MAX_RADIUS_KM).step_by(RADIUS_STEP_KM as usize) {
            let hotspots = self.retrieve_nearby_hotspots(coord, dist_km).await?;
            if hotspots.is_empty() {
                continue;
            }

            tracing::debug!(%coord, dist_km, count = hotspots.len(), "hotspots found");
            return Ok(self.closest(coord, hotspots));
        }

        tracing::info!(%coord, max_km = MAX_RADIUS_KM, "no hotspot within search radius");
        Ok(None)
    }

    fn closest(&self, coord: Coordinate, hotspots: Vec<Hotspot>) -> Option<Hotspot> {
        let mut best: Option<(f64, Hotspot)> = None;
        for hotspot in hotspots {
            let distance = (self.distance)(coord, hotspot.location.coord);
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, hotspot));
            }
        }
        best.map(|(_, hotspot)| hotspot)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use serde_json::json;

    // distance read off the hotspot's latitude
    fn latitude_distance(_from: Coordinate, to: Coordinate) -> f64 {
        to.latitude
    }

    #[tokio::test]
    async fn test_picks_closest_at_first_nonempty_radius() {
        let ebird = MockEBird::default()
            .with_nearby(
                10,
                json!([
                    hotspot_json("FAR", "US", None, 8.0, 0.0),
                    hotspot_json("NEAR", "US", None, 3.0, 0.0),
                ]),
            )
            .with_nearby(15, json!([hotspot_json("NEVER", "US", None, 0.0, 0.0)]));
        let h = Harness::new(ebird).await;
        let orchestrator = h.orchestrator.with_distance(latitude_distance);
        let here = Coordinate::new(44.9, -93.2);

        let nearest = orchestrator.find_nearest_hotspot(here).await.unwrap().unwrap();
        assert_eq!(nearest.location.id, "NEAR");
        assert_eq!(
            h.ebird.calls(),
            vec![Call::Nearby(here, 0), Call::Nearby(here, 5), Call::Nearby(here, 10)]
        );
    }

    #[tokio::test]
    async fn test_tie_goes_to_first() {
        let ebird = MockEBird::default().with_nearby(
            0,
            json!([
                hotspot_json("FIRST", "US", None, 2.0, 0.0),
                hotspot_json("SECOND", "US", None, 2.0, 1.0),
            ]),
        );
        let h = Harness::new(ebird).await;
        let orchestrator = h.orchestrator.with_distance(latitude_distance);

        let nearest = orchestrator.find_nearest_hotspot(Coordinate::new(0.0, 0.0)).await.unwrap();
        assert_eq!(nearest.unwrap().location.id, "FIRST");
    }

    #[tokio::test]
    async fn test_geodesic_default() {
        let ebird = MockEBird::default().with_nearby(
            0,
            json!([
                hotspot_json("WEST", "US", None, 45.0, -94.0),
                hotspot_json("HERE", "US", None, 45.0, -93.001),
            ]),
        );
        let h = Harness::new(ebird).await;

        let nearest = h.orchestrator.find_nearest_hotspot(Coordinate::new(45.0, -93.0)).await.unwrap();
        assert_eq!(nearest.unwrap().location.id, "HERE");
    }

    #[tokio::test]
    async fn test_exhausts_all_radii() {
        let h = Harness::new(MockEBird::default()).await;
        let here = Coordinate::new(-77.85, 166.67);

        assert!(h.orchestrator.find_nearest_hotspot(here).await.unwrap().is_none());

        let radii: Vec<u32> = h
            .ebird
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::Nearby(_, dist_km) => dist_km,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(radii.len(), 101);
        assert_eq!(radii, (0..=500).step_by(5).collect::<Vec<u32>>());

        let rows: i64 = h
            .orchestrator
            .db()
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM nearby_hotspots_cache", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(rows, 101);

        // empty results are cached, so a second search makes no live calls
        assert!(h.orchestrator.find_nearest_hotspot(here).await.unwrap().is_none());
        assert_eq!(h.ebird.calls().len(), 101);
    }

    #[tokio::test]
    async fn test_source_error_stops_search() {
        let h = Harness::new(MockEBird::default().failing("rate limited")).await;
        let result = h.orchestrator.find_nearest_hotspot(Coordinate::new(0.0, 0.0)).await;
        assert!(matches!(result, Err(Error::Source(_))));
        assert_eq!(h.ebird.calls().len(), 1);
    }
}
