//! HTTP clients for fieldmark's upstream data sources.
//!
//! Each client implements one of the source traits from `fieldmark-core` and
//! returns the upstream JSON untouched.

pub mod ebird;
pub mod error;
mod http;
pub mod inaturalist;
pub mod nominatim;

pub use ebird::{EBirdClient, EBirdConfig};
pub use error::ClientError;
pub use inaturalist::{INaturalistClient, ObservationQuery};
pub use nominatim::NominatimClient;
