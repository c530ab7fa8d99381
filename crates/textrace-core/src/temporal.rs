//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to millisecond
//! precision with a single fixed textual form.
//!
//! ## Integrity Invariant
//!
//! Block timestamps are part of the digest input. A timestamp must therefore
//! render identically every time it is serialized, including after a
//! deserialize/serialize round trip. `Timestamp` always renders as
//! `YYYY-MM-DDTHH:MM:SS.sssZ` (three fractional digits, `Z` suffix) and
//! never carries sub-millisecond components that the text could not hold.
//!
//! Non-UTC inputs are rejected by [`Timestamp::parse()`]; there is no silent
//! offset conversion on the digest path. Deserialization goes further and
//! accepts only the fixed form itself, so a serialized timestamp that would
//! render differently (extra fractional digits, none at all) is rejected
//! rather than truncated.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const ISO8601_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A UTC-only timestamp, truncated to millisecond precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`.
/// - [`Timestamp::parse()`]: from an RFC 3339 string with `Z` suffix.
/// - [`Timestamp::parse_exact()`]: only from `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`, truncating below milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, even `+00:00`,
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the string is not
    /// RFC 3339 or does not end in `Z`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(format!(
                "must use Z suffix (UTC only), got {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ValidationError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Parse a timestamp that is already in its fixed textual form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] unless `s` re-renders
    /// byte-identically, i.e. has exactly three fractional digits and a `Z`.
    pub fn parse_exact(s: &str) -> Result<Self, ValidationError> {
        let ts = Self::parse(s)?;
        if ts.to_iso8601() != s {
            return Err(ValidationError::InvalidTimestamp(format!(
                "expected YYYY-MM-DDTHH:MM:SS.sssZ, got {s:?}"
            )));
        }
        Ok(ts)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format(ISO8601_MILLIS).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_exact(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis).unwrap_or(dt)
}
