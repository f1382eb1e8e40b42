//! SQLite-backed cache for external API responses.
//!
//! This module provides a persistent, schema-validated TTL cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - A closed set of tables, each with its own composite key and TTL
//! - Automatic schema migrations
//! - WAL mode for sharing one cache file between processes
//! - Expiry as a read-time filter, plus an explicit purge

pub mod connection;
pub mod key;
pub mod migrations;
pub mod schema;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::{CacheKey, KeyValue};
pub use schema::{PayloadShape, Table};
pub use store::now_epoch;
