//! Serde helpers for token expiry timestamps. Backends write them either as an RFC 3339 string (a serialized
//! JavaScript `Date`) or as milliseconds since the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

pub(crate) fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    timestamp.to_rfc3339().serialize(serializer)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}"))),

        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(D::Error::custom),
    }
}
