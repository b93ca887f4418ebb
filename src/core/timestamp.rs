//! Record timestamps
//!
//! Records carry a numeric Unix timestamp, either in seconds or in
//! nanoseconds. The clock is clamped per precision so that timestamps
//! handed out by this process never step backwards, even if the wall
//! clock does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_SECONDS: AtomicI64 = AtomicI64::new(i64::MIN);
static LAST_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Granularity of the `timestamp` field on the wire
///
/// # Examples
///
/// ```
/// use evenscribe::core::TimestampPrecision;
///
/// let secs = TimestampPrecision::Seconds.now();
/// let nanos = TimestampPrecision::Nanoseconds.now();
/// assert!(nanos / 1_000_000_000 >= secs - 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPrecision {
    /// Unix timestamp in seconds: `1736332245`
    Seconds,

    /// Unix timestamp in nanoseconds: `1736332245123456789`
    #[default]
    Nanoseconds,
}

impl TimestampPrecision {
    /// Current time at this precision, never smaller than a previous result
    pub fn now(&self) -> i64 {
        self.stamp(&Utc::now())
    }

    /// Convert a point in time at this precision, clamped to be monotonic
    pub fn stamp(&self, datetime: &DateTime<Utc>) -> i64 {
        match self {
            TimestampPrecision::Seconds => clamp(&LAST_SECONDS, datetime.timestamp()),
            TimestampPrecision::Nanoseconds => {
                // Out of range past the year 2262.
                let nanos = datetime.timestamp_nanos_opt().unwrap_or(i64::MAX);
                clamp(&LAST_NANOS, nanos)
            }
        }
    }

    /// Convert a stored timestamp back to a `DateTime`
    pub fn to_datetime(&self, timestamp: i64) -> Option<DateTime<Utc>> {
        match self {
            TimestampPrecision::Seconds => DateTime::from_timestamp(timestamp, 0),
            TimestampPrecision::Nanoseconds => Some(DateTime::from_timestamp_nanos(timestamp)),
        }
    }
}

fn clamp(last: &AtomicI64, now: i64) -> i64 {
    let previous = last.fetch_max(now, Ordering::AcqRel);
    previous.max(now)
}
