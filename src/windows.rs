//! Calendar window selection
//!
//! Computes the half-open `[start, end)` intervals for "today", "this week",
//! and "this month" relative to an explicit reference instant, with the
//! calendar boundaries evaluated in a configured timezone. Week windows
//! start on a configurable weekday; the dashboard convention is Sunday.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::timezone::TimezoneConfig;
use crate::types::UsageRecord;

/// Default week start used by the dashboard (Sunday through Saturday)
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

/// Calendar unit a window is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    Day,
    Week,
    Month,
}

/// A half-open interval `[start, end)` in wall-clock time
///
/// When the window is the current period, `start <= now < end` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start instant
    pub start: DateTime<Utc>,
    /// Exclusive end instant
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Whether an instant falls inside the window
    ///
    /// The interval is half-open: an instant equal to `end` is outside.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Window length
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// First instant of a calendar day in the given timezone
///
/// Some zones skip midnight on DST transition days; the first valid instant
/// of the day is used in that case.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid wall-clock time");

    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
                .expect("01:00 exists on DST transition days")
        })
        .with_timezone(&Utc)
}

/// Compute the current calendar window containing `now`
///
/// - Day: `[local midnight, +1 day)`
/// - Week: `[most recent week_start midnight at/before now, +7 days)`
/// - Month: `[first instant of the month, first instant of the next month)`
pub fn current_window(
    unit: WindowUnit,
    now: DateTime<Utc>,
    tz: &TimezoneConfig,
    week_start: Weekday,
) -> TimeWindow {
    let local_date = now.with_timezone(&tz.tz).date_naive();

    let (start_date, end_date) = match unit {
        WindowUnit::Day => (local_date, local_date + Days::new(1)),
        WindowUnit::Week => {
            let days_back = (local_date.weekday().num_days_from_sunday() + 7
                - week_start.num_days_from_sunday())
                % 7;
            let start = local_date - Days::new(u64::from(days_back));
            (start, start + Days::new(7))
        }
        WindowUnit::Month => {
            let first = local_date
                .with_day(1)
                .expect("day 1 is valid in every month");
            (first, first + Months::new(1))
        }
    };

    TimeWindow {
        start: local_midnight(tz.tz, start_date),
        end: local_midnight(tz.tz, end_date),
    }
}

/// Keep the records whose timestamp satisfies `start <= t < end`
pub fn filter_records<'a>(records: &'a [UsageRecord], window: &TimeWindow) -> Vec<&'a UsageRecord> {
    records
        .iter()
        .filter(|record| window.contains(record.created_at))
        .collect()
}
