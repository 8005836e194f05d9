//! `DateTime<Utc>` fields stored as BSON dates.
//!
//! ```ignore
//! #[serde(with = "database::mongodb::bson_datetime")]
//! pub created_at: DateTime<Utc>,
//! ```
//!
//! Writes through the driver produce BSON dates, so sorting on the field is
//! chronological. Human-readable formats keep chrono's RFC 3339 strings.
//! Either representation is accepted on read.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        value.serialize(serializer)
    } else {
        to_bson_datetime(*value).serialize(serializer)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Bson::deserialize(deserializer)? {
        Bson::DateTime(stored) => DateTime::from_timestamp_millis(stored.timestamp_millis())
            .ok_or_else(|| D::Error::custom("date out of range")),
        Bson::String(text) => DateTime::parse_from_rfc3339(&text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected a date, found {:?}",
            other.element_type()
        ))),
    }
}

/// Millisecond-precision BSON date for `value`.
pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}
