//! tokdash - usage aggregation and alerting engine for LLM token dashboards
//!
//! This library takes a sequence of immutable usage records (tokens, cost,
//! timestamp, model, source) plus user configuration and derives:
//!
//! - time-windowed statistics (today, this week, this month)
//! - per-model, per-source, and per-day breakdowns
//! - threshold alert evaluation with edge-triggered notification gating
//! - billing-cycle reset instants and live countdowns
//!
//! It performs no I/O: records and configuration arrive already resolved
//! from external collaborators, and every time-dependent computation takes
//! the current instant as an explicit argument, so everything is testable
//! with fixed clocks.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tokdash::{
//!     aggregation::aggregate,
//!     alerts::{Severity, evaluate},
//!     timezone::TimezoneConfig,
//!     types::{ClaudeModel, SourceId, TokenCounts, UsageRecord},
//!     windows::{DEFAULT_WEEK_START, WindowUnit, current_window, filter_records},
//! };
//!
//! let now = Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap();
//! let records = vec![UsageRecord::new(
//!     SourceId::new("claude-code"),
//!     ClaudeModel::Sonnet,
//!     now - chrono::Duration::hours(1),
//!     TokenCounts::new(1200, 800),
//!     0.0156,
//! )];
//!
//! let tz = TimezoneConfig::utc();
//! let today = current_window(WindowUnit::Day, now, &tz, DEFAULT_WEEK_START);
//! let stats = aggregate(filter_records(&records, &today));
//! assert_eq!(stats.total_tokens, 2000);
//!
//! let status = evaluate(stats.total_cost, 10.0, 80.0);
//! assert_eq!(status.severity, Severity::Normal);
//! ```

pub mod aggregation;
pub mod alerts;
pub mod billing;
pub mod error;
pub mod filters;
pub mod monitor;
pub mod pricing;
pub mod timezone;
pub mod types;
pub mod windows;

// Re-export commonly used types
pub use error::{Result, TokdashError};
pub use types::{ClaudeModel, RecordId, SourceId, TokenCounts, UsageRecord, UsageStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
