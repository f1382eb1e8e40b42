//! Versioned schema setup for the API cache tables.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// `(version, SQL)` in apply order. Tables use `CREATE TABLE IF NOT EXISTS`,
/// so an existing store file with the same layout is adopted as-is.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_api_caches.sql"))];

/// Apply every migration newer than the highest version in `_migrations`.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for &(version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tracing::info!(version, "applied cache migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
