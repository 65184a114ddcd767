//! Timestamp rendering for log lines
//!
//! Every line carries a fixed-width local date-time such as
//! `2025/01/08 - 10:30:45.1230`. The fraction always has four digits, so
//! lines stay aligned even when the sub-second part ends in zeros.

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt;
use std::sync::Arc;

/// strftime layout of the date and whole-second part.
pub const TIMESTAMP_LAYOUT: &str = "%Y/%m/%d - %H:%M:%S";

/// Length of a rendered timestamp, fraction included.
pub const TIMESTAMP_WIDTH: usize = 26;

/// Source of "now" for the format pipeline.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// The wall clock.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Local::now)
}

/// A clock frozen at `instant`, for reproducible output.
#[must_use]
pub fn fixed_clock(instant: DateTime<Local>) -> Clock {
    Arc::new(move || instant)
}

/// Render `datetime` as `YYYY/MM/DD - HH:MM:SS.ffff`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rust_batch_logger::core::timestamp::format_timestamp;
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(format_timestamp(&t), "2025/01/08 - 10:30:45.0000");
/// ```
#[must_use]
pub fn format_timestamp<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    // nanosecond() exceeds 999_999_999 during a leap second
    let ten_thousandths = (datetime.nanosecond() % 1_000_000_000) / 100_000;
    format!("{}.{:04}", datetime.format(TIMESTAMP_LAYOUT), ten_thousandths)
}
