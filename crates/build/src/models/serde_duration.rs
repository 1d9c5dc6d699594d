//! Serde bridge for `Duration` as fractional seconds.
//!
//! Build reports are written by hand and by scripts, so `"duration": 12.5`
//! reads better than serde's default `{"secs": 12, "nanos": 500000000}`.

use serde::{self, Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub(crate) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
