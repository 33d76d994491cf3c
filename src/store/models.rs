use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use image::RgbImage;
use serde::{Deserialize, Deserializer, Serialize};

use crate::compose;
use crate::error::Result;

/// One persisted card. Field names are the on-disk document format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flashcard {
    pub id: String,
    /// Base64 of the PNG-encoded artifact.
    pub image: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn decode_image(&self) -> Result<RgbImage> {
        compose::decode(&self.image)
    }
}

/// Accepts RFC 3339 timestamps and, for documents written by older builds,
/// zone-less ISO-8601 ones which are read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid created_at timestamp '{raw}'"))
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    )
}
