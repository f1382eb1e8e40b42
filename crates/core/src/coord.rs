//! Geographic coordinates and cache-key quantization.
//!
//! `Coordinate` equality is exact. Rounding happens only where a cache key is
//! built, through [`Coordinate::cache_key`] or [`quantize`].

use std::fmt;

use geo::{Distance, Geodesic, Point};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Decimal places kept in coordinate cache keys (about 11 m at the equator).
pub const KEY_PRECISION: u32 = 4;

/// A GPS coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// The coordinate as stored in cache keys.
    pub fn cache_key(self) -> Self {
        quantize(self, KEY_PRECISION)
    }

    /// Read `lat` and `lon` from a geocoder result.
    ///
    /// Nominatim sends both as decimal strings; plain numbers are accepted too.
    pub fn from_geocode(data: &Value) -> Result<Self, Error> {
        let axis = |name: &str| -> Result<f64, Error> {
            match data.get(name) {
                Some(Value::String(s)) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| Error::MalformedSourcePayload(format!("geocode field '{name}': {e}"))),
                Some(Value::Number(n)) => n
                    .as_f64()
                    .ok_or_else(|| Error::MalformedSourcePayload(format!("geocode field '{name}' out of range"))),
                _ => Err(Error::MalformedSourcePayload(format!("geocode result lacks '{name}'"))),
            }
        };
        Ok(Coordinate::new(axis("lat")?, axis("lon")?))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Round each axis to `precision` decimal digits.
///
/// Rounds the exact binary value of each axis, with exact ties going to the
/// even digit. `44.97935` is stored just below the literal, so it becomes
/// `44.9793`, which matches keys written by `round(x, 4)` elsewhere.
pub fn quantize(coord: Coordinate, precision: u32) -> Coordinate {
    let digits = precision as usize;
    let round = |v: f64| format!("{v:.digits$}").parse::<f64>().unwrap_or(v);
    Coordinate::new(round(coord.latitude), round(coord.longitude))
}

/// Geodesic distance in kilometres on the WGS84 ellipsoid.
pub fn geodesic_km(a: Coordinate, b: Coordinate) -> f64 {
    let a = Point::new(a.longitude, a.latitude);
    let b = Point::new(b.longitude, b.latitude);
    Geodesic.distance(a, b) / 1000.0
}
