//! Time handling for CF-convention model output.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{SnowError, SnowResult};

/// Unit of a CF `"<unit> since <epoch>"` time coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
            TimeUnit::Days => 86400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hours),
            "d" | "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

/// Parsed `units` attribute of a time coordinate, e.g. `hours since 2019-10-01 00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse a CF time units string.
    pub fn parse(units: &str) -> SnowResult<Self> {
        let trimmed = units.trim();
        let (unit_str, epoch_str) = trimmed
            .split_once(" since ")
            .ok_or_else(|| SnowError::InvalidTimeUnits(trimmed.to_string()))?;

        let unit = TimeUnit::parse(unit_str.trim())
            .ok_or_else(|| SnowError::InvalidTimeUnits(trimmed.to_string()))?;
        let epoch = parse_epoch(epoch_str.trim())?;

        Ok(Self { unit, epoch })
    }

    /// Decode a numeric offset into a UTC timestamp (millisecond precision).
    pub fn decode(&self, value: f64) -> SnowResult<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(SnowError::InvalidTime(value.to_string()));
        }
        let millis = (value * self.unit.seconds() * 1000.0).round();
        if millis.abs() > i64::MAX as f64 / 2.0 {
            return Err(SnowError::InvalidTime(value.to_string()));
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(millis as i64))
            .ok_or_else(|| SnowError::InvalidTime(value.to_string()))
    }
}

/// Parse the epoch part of a CF units string.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f][±HH:MM]`, `YYYY-MM-DDTHH:MM:SS` and
/// plain dates. Timestamps without an offset are taken as UTC.
fn parse_epoch(s: &str) -> SnowResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = s.trim_end_matches('Z').trim_end_matches(" UTC");
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(SnowError::InvalidTimeUnits(format!("unparseable epoch '{}'", s)))
}

/// File stem of the frame rendered for a time step: `YYYYMMDD`.
pub fn frame_stem(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%d").to_string()
}

/// Indices of the timestamps falling exactly on `hour:00:00` of their day.
pub fn select_time_of_day(times: &[DateTime<Utc>], hour: u32) -> Vec<usize> {
    times
        .iter()
        .enumerate()
        .filter(|(_, t)| t.hour() == hour && t.minute() == 0 && t.second() == 0)
        .map(|(i, _)| i)
        .collect()
}
