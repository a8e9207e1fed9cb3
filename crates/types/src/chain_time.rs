//! Chain timestamp handling.
//!
//! The node serializes timestamps as `%Y-%m-%dT%H:%M:%S` without a zone
//! suffix; all chain times are UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

pub const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
#[error("invalid chain timestamp {0:?}")]
pub struct ChainTimeError(String);

pub fn parse_chain_time(raw: &str) -> Result<DateTime<Utc>, ChainTimeError> {
    NaiveDateTime::parse_from_str(raw, CHAIN_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ChainTimeError(raw.to_string()))
}

/// Serde adapter for struct fields carrying chain timestamps.
pub mod chain_time_serde {
    use super::*;
    use serde::de::{self, Deserializer};
    use serde::ser::Serializer;
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(CHAIN_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_chain_time(&raw).map_err(de::Error::custom)
    }
}
