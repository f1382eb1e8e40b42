//! Composite cache keys.

use tokio_rusqlite::rusqlite::types::Value as SqlValue;

use super::schema::Table;
use crate::Error;

/// A scalar key field value.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Text(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Text(v)
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Integer(v)
    }
}

impl From<u32> for KeyValue {
    fn from(v: u32) -> Self {
        KeyValue::Integer(i64::from(v))
    }
}

impl From<u8> for KeyValue {
    fn from(v: u8) -> Self {
        KeyValue::Integer(i64::from(v))
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        KeyValue::Real(v)
    }
}

impl From<&KeyValue> for SqlValue {
    fn from(v: &KeyValue) -> Self {
        match v {
            KeyValue::Text(s) => SqlValue::Text(s.clone()),
            KeyValue::Integer(i) => SqlValue::Integer(*i),
            KeyValue::Real(r) => SqlValue::Real(*r),
        }
    }
}

/// Named key fields identifying one row of a cache table.
///
/// Field order is irrelevant; [`CacheKey::validate`] checks the names against
/// the table's declared set before any query is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheKey {
    fields: Vec<(&'static str, KeyValue)>,
}

impl CacheKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with(mut self, name: &'static str, value: impl Into<KeyValue>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn fields(&self) -> &[(&'static str, KeyValue)] {
        &self.fields
    }

    /// Check that the fields are exactly the table's declared key fields.
    ///
    /// Unknown, duplicated and missing fields are all rejected with
    /// [`Error::InvalidSchema`].
    pub fn validate(&self, table: Table) -> Result<(), Error> {
        let declared = table.key_fields();

        for (i, (name, _)) in self.fields.iter().enumerate() {
            if !declared.contains(name) {
                return Err(Error::InvalidSchema(format!("invalid column '{name}' for table '{table}'")));
            }
            if self.fields[..i].iter().any(|(prev, _)| prev == name) {
                return Err(Error::InvalidSchema(format!("duplicate column '{name}' for table '{table}'")));
            }
        }

        if let Some(missing) = declared
            .iter()
            .find(|d| !self.fields.iter().any(|(name, _)| name == *d))
        {
            return Err(Error::InvalidSchema(format!("missing column '{missing}' for table '{table}'")));
        }

        Ok(())
    }

    pub(crate) fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub(crate) fn sql_values(&self) -> Vec<SqlValue> {
        self.fields.iter().map(|(_, v)| SqlValue::from(v)).collect()
    }
}
