//! Core types and the cache-and-orchestrate layer for fieldmark.
//!
//! This crate provides:
//! - A TTL cache over SQLite with a closed set of tables
//! - Coordinate quantization for cache keys
//! - Source traits for eBird, geocoding and photo lookups
//! - The orchestrator: cache-or-fetch, nearest hotspot search, batch
//!   taxonomy resolution and region code resolution
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod coord;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod source;
pub mod taxonomy;

pub use cache::{CacheDb, CacheKey, Table};
pub use config::{AppConfig, ConfigError};
pub use coord::Coordinate;
pub use error::Error;
pub use model::{EBirdSpecies, Hotspot, Location, RegionInfo, Species, SpeciesRecord};
pub use orchestrator::Orchestrator;
pub use source::{EBirdSource, Geocoder, PhotoSource};
