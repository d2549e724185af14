//! Nanosecond timestamps and wall-clock conversion.
//!
//! Timestamps are held as `i128` nanoseconds since the Unix epoch. Every instant
//! chrono can represent, and every `i64` scaled up from seconds, fits without
//! overflow, so repeated unit conversions never lose precision or wrap.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::types::WritePrecision;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// A point in time, stored as nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i128);

impl Timestamp {
    /// Create a timestamp from nanoseconds since the epoch.
    pub fn from_nanos(nanos: i128) -> Self {
        Self(nanos)
    }

    /// Create a timestamp from an integer expressed in `precision` units.
    pub fn from_precision(value: i64, precision: WritePrecision) -> Self {
        Self(i128::from(value) * precision.nanos_per_unit())
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Parse an RFC 3339 timestamp that must be expressed in UTC.
    ///
    /// Both `Z` and a zero offset are accepted; any other offset is rejected
    /// with [`Error::InvalidArgument`].
    pub fn parse_utc(input: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(input).map_err(|e| Error::Parse {
            message: format!("Invalid RFC3339 timestamp '{}': {}", input, e),
        })?;
        if parsed.offset().local_minus_utc() != 0 {
            return Err(Error::invalid_argument(format!(
                "Timestamp must be specified as UTC: {}",
                input
            )));
        }
        Ok(Self::from(parsed))
    }

    /// Nanoseconds since the epoch.
    pub fn nanos(self) -> i128 {
        self.0
    }

    /// The timestamp scaled to `precision`, truncating toward zero.
    pub fn to_precision(self, precision: WritePrecision) -> i128 {
        self.0 / precision.nanos_per_unit()
    }
}

impl From<i64> for Timestamp {
    fn from(nanos: i64) -> Self {
        Self(i128::from(nanos))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self(utc_nanos(&value.with_timezone(&Utc)))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(nano_time(&WallClock::Naive(value)))
    }
}

impl From<WallClock> for Timestamp {
    fn from(value: WallClock) -> Self {
        Self(nano_time(&value))
    }
}

/// Offset from the epoch.
impl From<chrono::Duration> for Timestamp {
    fn from(offset: chrono::Duration) -> Self {
        Self(
            i128::from(offset.num_seconds()) * NANOS_PER_SECOND
                + i128::from(offset.subsec_nanos()),
        )
    }
}

/// Offset from the epoch.
impl From<std::time::Duration> for Timestamp {
    fn from(offset: std::time::Duration) -> Self {
        Self(offset.as_nanos() as i128)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(value: SystemTime) -> Self {
        match value.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::from(after),
            Err(before) => Self(-(before.duration().as_nanos() as i128)),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock value as decoded from a query result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallClock {
    /// An instant in UTC.
    Utc(DateTime<Utc>),
    /// An instant carrying a local offset.
    Zoned(DateTime<FixedOffset>),
    /// Clock numbers without any zone annotation, taken as UTC.
    Naive(NaiveDateTime),
}

impl WallClock {
    /// Normalize to UTC. Zoned values are shifted; naive values are not.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            WallClock::Utc(t) => *t,
            WallClock::Zoned(t) => t.with_timezone(&Utc),
            WallClock::Naive(t) => t.and_utc(),
        }
    }
}

impl std::fmt::Display for WallClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WallClock::Utc(t) => {
                write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            WallClock::Zoned(t) => {
                write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            WallClock::Naive(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// Nanoseconds between the Unix epoch and `value`, after normalizing it to UTC.
pub fn nano_time(value: &WallClock) -> i128 {
    utc_nanos(&value.to_utc())
}

fn utc_nanos(value: &DateTime<Utc>) -> i128 {
    // timestamp() floors, so the sub-second part is always non-negative.
    i128::from(value.timestamp()) * NANOS_PER_SECOND
        + i128::from(value.timestamp_subsec_nanos())
}
