//! The closed set of cache tables.
//!
//! Each table declares its key fields, the JSON shape of its payload and how
//! long a row stays valid. The physical layout lives in
//! `migrations/001_api_caches.sql` and must agree with [`Table::key_fields`].

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::Error;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Logical cache table, one per supported query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    NearbyHotspots,
    Geocode,
    SpeciesList,
    SpeciesTaxonomy,
    ObservationPhotos,
    RegionInfo,
    HotspotsInRegion,
}

/// JSON shape a table's payload must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Object,
    List,
}

impl PayloadShape {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            PayloadShape::Object => value.is_object(),
            PayloadShape::List => value.is_array(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadShape::Object => "object",
            PayloadShape::List => "list",
        }
    }
}

/// Human-readable JSON type name, used in corruption diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::NearbyHotspots,
        Table::Geocode,
        Table::SpeciesList,
        Table::SpeciesTaxonomy,
        Table::ObservationPhotos,
        Table::RegionInfo,
        Table::HotspotsInRegion,
    ];

    /// Physical table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::NearbyHotspots => "nearby_hotspots_cache",
            Table::Geocode => "geocode_cache",
            Table::SpeciesList => "species_list_cache",
            Table::SpeciesTaxonomy => "species_taxonomy_cache",
            Table::ObservationPhotos => "observation_photos_cache",
            Table::RegionInfo => "region_info_cache",
            Table::HotspotsInRegion => "hotspots_in_region_cache",
        }
    }

    /// Declared key fields, in primary key order.
    pub fn key_fields(self) -> &'static [&'static str] {
        match self {
            Table::NearbyHotspots => &["lat_round", "lng_round", "dist_km"],
            Table::Geocode => &["provider", "query"],
            Table::SpeciesList => &["area_code"],
            Table::SpeciesTaxonomy => &["species_id"],
            Table::ObservationPhotos => &["taxon_name", "day_of_month"],
            Table::RegionInfo | Table::HotspotsInRegion => &["region_code"],
        }
    }

    pub fn payload_shape(self) -> PayloadShape {
        match self {
            Table::NearbyHotspots | Table::SpeciesList | Table::HotspotsInRegion => PayloadShape::List,
            Table::Geocode | Table::SpeciesTaxonomy | Table::ObservationPhotos | Table::RegionInfo => {
                PayloadShape::Object
            }
        }
    }

    /// Time to live in seconds.
    pub fn ttl_seconds(self) -> i64 {
        match self {
            Table::NearbyHotspots | Table::SpeciesList | Table::HotspotsInRegion => 7 * SECONDS_PER_DAY,
            Table::ObservationPhotos => 7 * SECONDS_PER_DAY,
            Table::RegionInfo => 30 * SECONDS_PER_DAY,
            // geocodes and taxonomy change slowly
            Table::Geocode | Table::SpeciesTaxonomy => 90 * SECONDS_PER_DAY,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::InvalidSchema(format!("invalid table name: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_name_roundtrip() {
        for table in Table::ALL {
            assert_eq!(table.name().parse::<Table>().unwrap(), table);
        }
    }

    #[test]
    fn test_unknown_table_name() {
        let result = "sightings_cache".parse::<Table>();
        assert!(matches!(result, Err(Error::InvalidSchema(msg)) if msg.contains("sightings_cache")));
    }

    #[test]
    fn test_ttls() {
        assert_eq!(Table::NearbyHotspots.ttl_seconds(), 604_800);
        assert_eq!(Table::Geocode.ttl_seconds(), 7_776_000);
        assert_eq!(Table::RegionInfo.ttl_seconds(), 2_592_000);
        assert_eq!(Table::ObservationPhotos.ttl_seconds(), 604_800);
    }

    #[test]
    fn test_payload_shape_matches() {
        assert!(Table::SpeciesList.payload_shape().matches(&json!(["amecro"])));
        assert!(!Table::SpeciesList.payload_shape().matches(&json!({"code": "US"})));
        assert!(Table::RegionInfo.payload_shape().matches(&json!({"code": "US"})));
        assert!(!Table::RegionInfo.payload_shape().matches(&json!(null)));
    }

    #[test]
    fn test_migration_declares_every_key_field() {
        let sql = include_str!("../../migrations/001_api_caches.sql");
        for table in Table::ALL {
            let pk = format!("PRIMARY KEY ({})", table.key_fields().join(", "));
            assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table.name())));
            assert!(sql.contains(&pk), "missing {pk}");
        }
    }
}
