//! Generic get/put over the cache tables.
//!
//! Table and column names are interpolated into SQL only after the key has
//! been validated against [`Table::key_fields`]; values are always bound.

use chrono::Utc;
use serde_json::Value;
use tokio_rusqlite::rusqlite::{self, params_from_iter, types::Value as SqlValue};

use super::connection::CacheDb;
use super::key::CacheKey;
use super::schema::{Table, json_type_name};
use crate::Error;

/// Current time in epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

impl CacheDb {
    /// Get a valid cached payload.
    ///
    /// Returns None if no row matches the key or the row has expired.
    pub async fn get(&self, table: Table, key: &CacheKey) -> Result<Option<Value>, Error> {
        self.get_at(table, key, now_epoch()).await
    }

    /// Like [`CacheDb::get`], evaluated at `now` (epoch seconds).
    ///
    /// A row is valid while `now <= expires_at`.
    pub async fn get_at(&self, table: Table, key: &CacheKey, now: i64) -> Result<Option<Value>, Error> {
        key.validate(table)?;

        let filter = key
            .column_names()
            .map(|col| format!("{col} = ?"))
            .collect::<Vec<_>>()
            .join(" AND ");
        let sql = format!("SELECT response_json FROM {} WHERE {filter} AND expires_at >= ?", table.name());

        let mut values = key.sql_values();
        values.push(SqlValue::Integer(now));

        let raw = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare(&sql)?;
                match stmt.query_row(params_from_iter(values.iter()), |row| row.get(0)) {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let payload: Value = serde_json::from_str(&raw).map_err(|e| Error::CorruptPayload {
            table: table.name(),
            expected: table.payload_shape().name(),
            found: format!("unparsable JSON ({e})"),
        })?;

        let shape = table.payload_shape();
        if !shape.matches(&payload) {
            return Err(Error::CorruptPayload {
                table: table.name(),
                expected: shape.name(),
                found: json_type_name(&payload).to_string(),
            });
        }

        Ok(Some(payload))
    }

    /// Insert or replace a cached payload.
    ///
    /// Uses UPSERT semantics on the table's primary key: a second put for the
    /// same key replaces the payload and restarts the TTL from `fetched_at`.
    pub async fn put(&self, table: Table, key: &CacheKey, payload: &Value, fetched_at: i64) -> Result<(), Error> {
        key.validate(table)?;

        let columns = key.column_names().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; key.fields().len() + 3].join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({columns}, response_json, fetched_at, expires_at) VALUES ({placeholders})",
            table.name()
        );

        let mut values = key.sql_values();
        values.push(SqlValue::Text(payload.to_string()));
        values.push(SqlValue::Integer(fetched_at));
        values.push(SqlValue::Integer(fetched_at + table.ttl_seconds()));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(&sql, params_from_iter(values.iter()))?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete rows of one table that expired before `now`.
    ///
    /// Returns the number of deleted rows.
    pub async fn purge_expired(&self, table: Table, now: i64) -> Result<u64, Error> {
        let sql = format!("DELETE FROM {} WHERE expires_at < ?1", table.name());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(&sql, [now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired rows from every table.
    pub async fn purge_all_expired(&self, now: i64) -> Result<u64, Error> {
        let mut deleted = 0;
        for table in Table::ALL {
            deleted += self.purge_expired(table, now).await?;
        }
        Ok(deleted)
    }
}
