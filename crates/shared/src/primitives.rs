use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(transparent)]
pub struct WrappedUuidV4(uuid::Uuid);

impl Default for WrappedUuidV4 {
    fn default() -> Self {
        Self::new()
    }
}

impl WrappedUuidV4 {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl FromStr for WrappedUuidV4 {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(uuid::Uuid::parse_str(s)?))
    }
}

impl fmt::Display for WrappedUuidV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WrappedUuidV4 {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(uuid::Uuid::parse_str(&value)?))
    }
}

impl libsql::FromValue for WrappedUuidV4 {
    fn from_sql(val: libsql::Value) -> libsql::Result<Self>
    where
        Self: Sized,
    {
        match val {
            libsql::Value::Text(s) => {
                WrappedUuidV4::try_from(s).map_err(|_e| libsql::Error::InvalidColumnType)
            }
            _ => Err(libsql::Error::InvalidColumnType),
        }
    }
}

impl From<WrappedUuidV4> for libsql::Value {
    fn from(val: WrappedUuidV4) -> Self {
        libsql::Value::Text(val.to_string())
    }
}

impl From<&WrappedUuidV4> for libsql::Value {
    fn from(val: &WrappedUuidV4) -> Self {
        libsql::Value::Text(val.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(transparent)]
pub struct WrappedChronoDateTime(chrono::DateTime<chrono::Utc>);

impl WrappedChronoDateTime {
    pub fn get_inner(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }

    pub fn new(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self(value)
    }

    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }
}

fn parse_sqlite_datetime(value: &str) -> Result<chrono::DateTime<chrono::Utc>, anyhow::Error> {
    // SQLite datetime format first, RFC3339 as the fallback
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(value).map(|dt| dt.into()))
        .map_err(|_e| anyhow::anyhow!("invalid datetime value"))
}

impl TryFrom<String> for WrappedChronoDateTime {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(parse_sqlite_datetime(&value)?))
    }
}

impl TryFrom<&str> for WrappedChronoDateTime {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(parse_sqlite_datetime(value)?))
    }
}

impl fmt::Display for WrappedChronoDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for WrappedChronoDateTime {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self(value)
    }
}

impl libsql::FromValue for WrappedChronoDateTime {
    fn from_sql(val: libsql::Value) -> libsql::Result<Self>
    where
        Self: Sized,
    {
        match val {
            libsql::Value::Text(s) => parse_sqlite_datetime(&s)
                .map(WrappedChronoDateTime::new)
                .map_err(|_e| libsql::Error::InvalidColumnType),
            _ => Err(libsql::Error::InvalidColumnType),
        }
    }
}

impl From<WrappedChronoDateTime> for libsql::Value {
    fn from(value: WrappedChronoDateTime) -> Self {
        // SQLite's expected datetime format rather than RFC3339
        libsql::Value::Text(value.0.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

impl From<&WrappedChronoDateTime> for libsql::Value {
    fn from(value: &WrappedChronoDateTime) -> Self {
        libsql::Value::Text(value.0.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

pub trait SqlMigrationLoader {
    fn load_sql_migrations() -> BTreeMap<&'static str, &'static str>;
}

#[cfg(test)]
mod unit_test {
    use super::*;
    use libsql::FromValue;

    #[test]
    fn test_uuid_roundtrip_through_value() {
        let id = WrappedUuidV4::new();
        let value: libsql::Value = id.clone().into();
        let back = WrappedUuidV4::from_sql(value).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_uuid_rejects_garbage() {
        assert!(WrappedUuidV4::try_from("not-a-uuid".to_string()).is_err());
        assert!(WrappedUuidV4::from_sql(libsql::Value::Integer(7)).is_err());
    }

    #[test]
    fn test_datetime_parses_sqlite_format() {
        let dt = WrappedChronoDateTime::try_from("2026-01-15 08:30:00.250").unwrap();
        assert_eq!(dt.get_inner().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_datetime_parses_rfc3339() {
        let dt = WrappedChronoDateTime::try_from("2026-01-15T08:30:00Z").unwrap();
        assert_eq!(
            dt.get_inner().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2026-01-15 08:30:00"
        );
    }

    #[test]
    fn test_datetime_roundtrip_through_value() {
        let now = WrappedChronoDateTime::now();
        let value: libsql::Value = now.into();
        let back = WrappedChronoDateTime::from_sql(value).unwrap();
        // stored precision is sub-second text, so equality holds
        assert_eq!(now, back);
    }
}
