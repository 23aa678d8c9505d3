//! Pre-filtering of usage records
//!
//! Mirrors the dashboard's source selector and date-range picker: records
//! can be narrowed to one source and/or an inclusive calendar date range
//! before aggregation. All filters are optional and combinable.
//!
//! # Examples
//!
//! ```
//! use tokdash::filters::UsageFilter;
//! use tokdash::types::SourceId;
//! use chrono::NaiveDate;
//!
//! let filter = UsageFilter::new()
//!     .with_source(SourceId::new("claude-code"))
//!     .with_since(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
//!     .with_until(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
//! ```

use chrono::NaiveDate;

use crate::timezone::TimezoneConfig;
use crate::types::{SourceId, UsageRecord};

/// Filter configuration for usage records
#[derive(Debug, Clone)]
pub struct UsageFilter {
    /// Source filter
    pub source_id: Option<SourceId>,
    /// Start date filter (inclusive)
    pub since_date: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub until_date: Option<NaiveDate>,
    /// Timezone used to turn record timestamps into calendar dates
    pub timezone: TimezoneConfig,
}

impl Default for UsageFilter {
    fn default() -> Self {
        Self {
            source_id: None,
            since_date: None,
            until_date: None,
            timezone: TimezoneConfig::utc(),
        }
    }
}

impl UsageFilter {
    /// Create a new filter with no restrictions, dates evaluated in UTC
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single source
    pub fn with_source(mut self, source_id: SourceId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    /// Set the start date filter
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since_date = Some(date);
        self
    }

    /// Set the end date filter
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until_date = Some(date);
        self
    }

    /// Evaluate date filters in the given timezone
    pub fn with_timezone(mut self, timezone: TimezoneConfig) -> Self {
        self.timezone = timezone;
        self
    }

    /// Check whether a record passes the filter
    pub fn matches(&self, record: &UsageRecord) -> bool {
        if let Some(source) = &self.source_id
            && &record.source_id != source
        {
            return false;
        }

        let record_date = record.created_at.with_timezone(&self.timezone.tz).date_naive();

        if let Some(since) = &self.since_date
            && &record_date < since
        {
            return false;
        }

        if let Some(until) = &self.until_date
            && &record_date > until
        {
            return false;
        }

        true
    }

    /// Keep the records that pass the filter
    pub fn apply<'a>(&self, records: &'a [UsageRecord]) -> Vec<&'a UsageRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
