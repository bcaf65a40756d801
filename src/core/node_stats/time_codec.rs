//! Tick encoding for timestamps and durations.
//!
//! A tick is 100 nanoseconds, counted from 0001-01-01T00:00:00Z. Timestamps
//! are treated as microsecond-resolution values; anything finer is carried
//! separately as sub-tick nanoseconds and folded in at the tick grid.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::error::{NodeStatsError, Result};

pub const NANOS_PER_TICK: i64 = 100;
pub const TICKS_PER_MICROSECOND: i64 = 10;
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Seconds between 0001-01-01T00:00:00Z and 1970-01-01T00:00:00Z
const EPOCH_OFFSET_SECS: i64 = 62_135_596_800;

/// The instant that encodes as tick zero.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH - TimeDelta::seconds(EPOCH_OFFSET_SECS)
}

/// Convert a timestamp to ticks since the epoch.
///
/// The timestamp is normalized to UTC first. `sub_tick_nanos` adds precision
/// below the microsecond resolution of the timestamp.
pub fn ticks_from_timestamp<Tz: TimeZone>(
    t: &DateTime<Tz>,
    sub_tick_nanos: Option<i64>,
) -> Result<i64> {
    let utc = t.with_timezone(&Utc);
    let since_epoch = utc
        .signed_duration_since(DateTime::<Utc>::UNIX_EPOCH)
        .checked_add(&TimeDelta::seconds(EPOCH_OFFSET_SECS))
        .ok_or_else(|| {
            NodeStatsError::invalid_argument(format!("timestamp {} is out of range", utc))
        })?;

    ticks_from_duration(since_epoch, sub_tick_nanos)
}

/// Convert a duration to ticks.
///
/// The magnitude is truncated to whole microseconds and the sign re-applied,
/// so truncation is toward zero. A positive `sub_tick_nanos` adds
/// `n / 100` ticks, a negative one subtracts `|n| / 100`.
pub fn ticks_from_duration(d: TimeDelta, sub_tick_nanos: Option<i64>) -> Result<i64> {
    let magnitude = d
        .abs()
        .num_microseconds()
        .and_then(|micros| micros.checked_mul(TICKS_PER_MICROSECOND))
        .ok_or_else(|| {
            NodeStatsError::invalid_argument(format!("duration {} overflows the tick range", d))
        })?;

    let mut ticks = if d < TimeDelta::zero() {
        -magnitude
    } else {
        magnitude
    };

    if let Some(nanos) = sub_tick_nanos {
        // |i64::MIN| / 100 always fits back into i64
        let sub_ticks = (nanos.unsigned_abs() / NANOS_PER_TICK as u64) as i64;
        let adjusted = if nanos < 0 {
            ticks.checked_sub(sub_ticks)
        } else {
            ticks.checked_add(sub_ticks)
        };
        ticks = adjusted.ok_or_else(|| {
            NodeStatsError::invalid_argument(format!(
                "sub-tick nanoseconds {} overflow the tick range",
                nanos
            ))
        })?;
    }

    Ok(ticks)
}

/// Difference `t2 - t1` in ticks.
pub fn ticks_between(t1: &DateTime<Utc>, t2: &DateTime<Utc>) -> Result<i64> {
    ticks_from_duration(t2.signed_duration_since(t1), None)
}

/// Inverse of [`ticks_from_timestamp`], keeping the full 100ns precision.
pub fn timestamp_from_ticks(ticks: i64) -> Result<DateTime<Utc>> {
    let unix_ticks = ticks
        .checked_sub(EPOCH_OFFSET_SECS * TICKS_PER_SECOND)
        .ok_or_else(|| NodeStatsError::invalid_argument(format!("ticks {} out of range", ticks)))?;

    let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;

    DateTime::<Utc>::from_timestamp(secs, nanos)
        .ok_or_else(|| NodeStatsError::invalid_argument(format!("ticks {} out of range", ticks)))
}

/// Convert loosely typed input: an RFC 3339 timestamp and optional integer
/// sub-tick nanoseconds, both as text.
pub fn ticks_from_str(timestamp: &str, sub_tick_nanos: Option<&str>) -> Result<i64> {
    let parsed = DateTime::parse_from_rfc3339(timestamp.trim()).map_err(|e| {
        NodeStatsError::invalid_argument(format!("'{}' is not a timestamp: {}", timestamp, e))
    })?;

    let nanos = match sub_tick_nanos {
        Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
            NodeStatsError::invalid_argument(format!(
                "sub-tick nanoseconds '{}' is not an integer",
                raw
            ))
        })?),
        None => None,
    };

    ticks_from_timestamp(&parsed, nanos)
}
