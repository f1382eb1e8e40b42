//! Value types rebuilt from cached or live eBird payloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Coordinate, Error};

/// A location in eBird's hierarchical region system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub coord: Coordinate,
    pub country_code: String,
    pub subnat1_code: Option<String>,
    pub subnat1_name: Option<String>,
    pub subnat2_code: Option<String>,
    pub subnat2_name: Option<String>,
}

/// A location with a history of bird observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Hotspot {
    pub location: Location,
    pub all_time_species: Option<u32>,
}

/// Hotspot record as eBird returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotspotRecord {
    loc_id: String,
    loc_name: String,
    lat: f64,
    lng: f64,
    country_code: String,
    #[serde(default, rename = "subnational1Code")]
    subnational1_code: Option<String>,
    #[serde(default, rename = "subnational1Name")]
    subnational1_name: Option<String>,
    #[serde(default, rename = "subnational2Code")]
    subnational2_code: Option<String>,
    #[serde(default, rename = "subnational2Name")]
    subnational2_name: Option<String>,
    #[serde(default)]
    num_species_all_time: Option<u32>,
}

impl Location {
    /// Region codes from coarsest to finest: country, then the subnational levels present.
    pub fn region_codes(&self) -> Vec<&str> {
        std::iter::once(self.country_code.as_str())
            .chain(self.subnat1_code.as_deref())
            .chain(self.subnat2_code.as_deref())
            .collect()
    }
}

impl Hotspot {
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let record: HotspotRecord = serde_json::from_value(value.clone())
            .map_err(|e| Error::MalformedSourcePayload(format!("hotspot: {e}")))?;

        Ok(Hotspot {
            location: Location {
                id: record.loc_id,
                name: record.loc_name,
                coord: Coordinate::new(record.lat, record.lng),
                country_code: record.country_code,
                subnat1_code: record.subnational1_code,
                subnat1_name: record.subnational1_name,
                subnat2_code: record.subnational2_code,
                subnat2_name: record.subnational2_name,
            },
            all_time_species: record.num_species_all_time,
        })
    }

    /// Parse a list payload of hotspot records.
    pub fn list_from_json(payload: &Value) -> Result<Vec<Self>, Error> {
        payload
            .as_array()
            .ok_or_else(|| Error::MalformedSourcePayload("hotspot payload is not a list".into()))?
            .iter()
            .map(Hotspot::from_json)
            .collect()
    }
}

/// A species within the zoological code taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Species {
    pub common_name: String,
    /// Genus, the first part of the binomial.
    pub generic_name: String,
    /// Specific epithet, the rest of the binomial.
    pub specific_name: String,
    pub family_common_name: String,
    pub family: String,
    pub order: String,
}

impl Species {
    /// Binomial name, genus capitalized and epithet lower-cased.
    pub fn scientific_name(&self) -> String {
        let mut chars = self.generic_name.chars();
        let genus = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        };
        format!("{genus} {}", self.specific_name.to_lowercase())
    }
}

/// Split a scientific name into genus and specific epithet.
///
/// The first whitespace-separated token is the genus; the remaining tokens,
/// joined by single spaces, form the epithet.
pub fn split_binomial(scientific_name: &str) -> Result<(String, String), Error> {
    let mut parts = scientific_name.split_whitespace();
    let genus = parts.next();
    let epithet = parts.collect::<Vec<_>>().join(" ");

    match genus {
        Some(genus) if !epithet.is_empty() => Ok((genus.to_string(), epithet)),
        _ => Err(Error::MalformedSourcePayload(format!(
            "scientific name '{scientific_name}' is not a binomial"
        ))),
    }
}

/// A bird species with its eBird species code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EBirdSpecies {
    #[serde(flatten)]
    pub species: Species,
    pub species_code: String,
}

/// Taxonomy entry as eBird returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxonomyRecord {
    com_name: String,
    sci_name: String,
    family_com_name: String,
    family_sci_name: String,
    order: String,
    species_code: String,
}

impl EBirdSpecies {
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let record: TaxonomyRecord = serde_json::from_value(value.clone())
            .map_err(|e| Error::MalformedSourcePayload(format!("taxonomy entry: {e}")))?;
        let (generic_name, specific_name) = split_binomial(&record.sci_name)?;

        Ok(EBirdSpecies {
            species: Species {
                common_name: record.com_name,
                generic_name,
                specific_name,
                family_common_name: record.family_com_name,
                family: record.family_sci_name,
                order: record.order,
            },
            species_code: record.species_code,
        })
    }

    /// Species code carried by a raw taxonomy entry, if any.
    pub fn code_of(value: &Value) -> Option<&str> {
        value.get("speciesCode").and_then(Value::as_str)
    }
}

/// Flat export form of a species, one scientific-name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub family_common_name: String,
    pub family: String,
    pub order: String,
    pub ebird_species_code: String,
}

impl From<&EBirdSpecies> for SpeciesRecord {
    fn from(s: &EBirdSpecies) -> Self {
        SpeciesRecord {
            common_name: s.species.common_name.clone(),
            scientific_name: s.species.scientific_name(),
            family_common_name: s.species.family_common_name.clone(),
            family: s.species.family.clone(),
            order: s.species.order.clone(),
            ebird_species_code: s.species_code.clone(),
        }
    }
}

impl TryFrom<SpeciesRecord> for EBirdSpecies {
    type Error = Error;

    fn try_from(r: SpeciesRecord) -> Result<Self, Self::Error> {
        let (generic_name, specific_name) = split_binomial(&r.scientific_name)?;
        Ok(EBirdSpecies {
            species: Species {
                common_name: r.common_name,
                generic_name,
                specific_name,
                family_common_name: r.family_common_name,
                family: r.family,
                order: r.order,
            },
            species_code: r.ebird_species_code,
        })
    }
}

/// eBird region information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionInfo {
    /// Canonical region code, e.g. `US-MN`.
    pub code: String,
    /// Human-readable region name.
    #[serde(rename = "result")]
    pub name: String,
}

impl RegionInfo {
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        serde_json::from_value(value.clone()).map_err(|e| Error::MalformedSourcePayload(format!("region info: {e}")))
    }
}
