//! The time zone used to turn timestamps into local calendar dates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// Local time zone: an IANA zone with daylight saving rules, or a fixed
/// offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::Named(Tz::UTC)
    }
}

impl LocalZone {
    /// Calendar date of `timestamp` in this zone.
    #[must_use]
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => timestamp.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => timestamp.with_timezone(offset).date_naive(),
        }
    }
}

/// Parses an IANA name (`Europe/Berlin`), `UTC`/`Z`, or an offset such as
/// `+01:00`.
impl FromStr for LocalZone {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self::default());
        }
        let invalid = || ConfigError::InvalidTimeZone(value.to_string());
        if trimmed.starts_with(['+', '-']) {
            return trimmed
                .parse::<FixedOffset>()
                .map(Self::Fixed)
                .map_err(|_| invalid());
        }
        trimmed.parse::<Tz>().map(Self::Named).map_err(|_| invalid())
    }
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
