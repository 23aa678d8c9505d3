//! Aggregation of usage records into derived statistics
//!
//! All functions here are pure, synchronous, and total: an empty input
//! yields the all-zero [`UsageStats`] rather than an error, and the result
//! never depends on input ordering (the reduction is a sum of independent
//! counters). Derived structures are freshly allocated per invocation, so
//! re-running on every tick or render is safe.
//!
//! Per-model and per-source groupings clone their key out of each record;
//! there are only a handful of distinct models and sources, so interning is
//! not worth the complexity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::timezone::TimezoneConfig;
use crate::types::{ClaudeModel, SourceId, UsageRecord, UsageStats};

/// Usage for a single calendar day, for charting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Calendar date in the aggregation timezone
    pub date: NaiveDate,
    /// Aggregate for that day
    pub stats: UsageStats,
}

/// Reduce records into a single aggregate
///
/// # Examples
/// ```
/// use tokdash::aggregation::aggregate;
/// use tokdash::types::UsageRecord;
///
/// let records: Vec<UsageRecord> = vec![];
/// let stats = aggregate(&records);
/// assert_eq!(stats.request_count, 0);
/// assert_eq!(stats.total_cost, 0.0);
/// ```
pub fn aggregate<'a, I>(records: I) -> UsageStats
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut stats = UsageStats::default();
    for record in records {
        stats.add_record(record);
    }
    stats
}

/// Aggregate within each model partition
///
/// Keys are present only for models with at least one record; absent models
/// are not zero-filled.
pub fn aggregate_by_model<'a, I>(records: I) -> BTreeMap<ClaudeModel, UsageStats>
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut map: BTreeMap<ClaudeModel, UsageStats> = BTreeMap::new();
    for record in records {
        map.entry(record.model).or_default().add_record(record);
    }
    map
}

/// Aggregate within each source partition
pub fn aggregate_by_source<'a, I>(records: I) -> BTreeMap<SourceId, UsageStats>
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut map: BTreeMap<SourceId, UsageStats> = BTreeMap::new();
    for record in records {
        map.entry(record.source_id.clone())
            .or_default()
            .add_record(record);
    }
    map
}

/// Bucket records by calendar day in the configured timezone
///
/// Returns one entry per day with at least one record, ascending by date.
pub fn aggregate_daily<'a, I>(records: I, tz: &TimezoneConfig) -> Vec<DailyUsage>
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut daily_map: BTreeMap<NaiveDate, UsageStats> = BTreeMap::new();
    for record in records {
        let date = record.created_at.with_timezone(&tz.tz).date_naive();
        daily_map.entry(date).or_default().add_record(record);
    }

    daily_map
        .into_iter()
        .map(|(date, stats)| DailyUsage { date, stats })
        .collect()
}
