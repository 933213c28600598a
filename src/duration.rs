//! Duration parsing and the canonical string form used in compiled filters.
//!
//! Durations arrive as seconds, as ISO 8601 durations (`PT1H30M`,
//! `P2DT0.5S`) or in clock form (`1.02:03:04.500`). Whatever the input, the
//! compiled form is always `[-][D.]HH:MM:SS.mmm`.

use chrono::TimeDelta;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>-)?P(?:(?P<weeks>\d+)W)?(?:(?P<days>\d+)D)?(?:T(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("valid iso duration regex")
});
static CLOCK_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>-)?(?:(?P<days>\d+)\.)?(?P<hours>\d{1,2}):(?P<minutes>\d{2}):(?P<seconds>\d{2}(?:\.\d+)?)$",
    )
    .expect("valid clock duration regex")
});

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("Invalid duration: '{0}'. Expected seconds, ISO 8601 (e.g. PT5M) or [D.]HH:MM:SS[.fff]")]
    Invalid(String),

    #[error("Duration out of range: '{0}'")]
    OutOfRange(String),
}

/// Parse a duration from its ISO 8601 or clock representation
pub fn parse_duration(s: &str) -> Result<TimeDelta, DurationError> {
    let trimmed = s.trim();
    let caps = ISO_DURATION_RE
        .captures(trimmed)
        .filter(|_| trimmed.trim_start_matches('-') != "P" && !trimmed.ends_with('T'))
        .or_else(|| CLOCK_DURATION_RE.captures(trimmed))
        .ok_or_else(|| DurationError::Invalid(s.to_string()))?;

    let whole = |name: &str| -> Result<i64, DurationError> {
        caps.name(name)
            .map(|m| m.as_str().parse::<i64>())
            .transpose()
            .map(|v| v.unwrap_or(0))
            .map_err(|_| DurationError::OutOfRange(s.to_string()))
    };

    let seconds_millis = match caps.name("seconds") {
        Some(m) => seconds_to_millis(m.as_str().parse::<f64>().unwrap_or(0.0))
            .ok_or_else(|| DurationError::OutOfRange(s.to_string()))?,
        None => 0,
    };

    let total = [
        (whole("weeks")?, 7 * MILLIS_PER_DAY),
        (whole("days")?, MILLIS_PER_DAY),
        (whole("hours")?, MILLIS_PER_HOUR),
        (whole("minutes")?, MILLIS_PER_MINUTE),
    ]
    .iter()
    .try_fold(seconds_millis, |acc, (count, unit)| {
        count.checked_mul(*unit).and_then(|v| acc.checked_add(v))
    })
    .ok_or_else(|| DurationError::OutOfRange(s.to_string()))?;

    let total = if caps.name("sign").is_some() { -total } else { total };
    TimeDelta::try_milliseconds(total).ok_or_else(|| DurationError::OutOfRange(s.to_string()))
}

/// Build a duration from a (possibly fractional) number of seconds
pub fn duration_from_seconds(seconds: f64) -> Result<TimeDelta, DurationError> {
    seconds_to_millis(seconds)
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| DurationError::OutOfRange(seconds.to_string()))
}

fn seconds_to_millis(seconds: f64) -> Option<i64> {
    let millis = (seconds * MILLIS_PER_SECOND as f64).round();
    (millis.is_finite() && millis.abs() < i64::MAX as f64).then_some(millis as i64)
}

/// Canonical `[-][D.]HH:MM:SS.mmm` form of a duration
pub fn canonical_duration(duration: &TimeDelta) -> String {
    let total = duration.num_milliseconds();
    let sign = if total < 0 { "-" } else { "" };
    let abs = total.unsigned_abs();

    let days = abs / MILLIS_PER_DAY as u64;
    let hours = abs % MILLIS_PER_DAY as u64 / MILLIS_PER_HOUR as u64;
    let minutes = abs % MILLIS_PER_HOUR as u64 / MILLIS_PER_MINUTE as u64;
    let seconds = abs % MILLIS_PER_MINUTE as u64 / MILLIS_PER_SECOND as u64;
    let millis = abs % MILLIS_PER_SECOND as u64;

    if days > 0 {
        format!("{sign}{days}.{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// Serde adapter so AST duration literals can be written as seconds or strings
pub mod serde_duration {
    use super::*;

    pub fn serialize<S: Serializer>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&canonical_duration(duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }

    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = TimeDelta;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a duration in seconds or as an ISO 8601 / clock string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<TimeDelta, E> {
            self.visit_f64(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<TimeDelta, E> {
            self.visit_f64(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<TimeDelta, E> {
            duration_from_seconds(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<TimeDelta, E> {
            parse_duration(v).map_err(E::custom)
        }
    }
}
