//! Timezone configuration for window-boundary math
//!
//! Day, week, and month boundaries depend on a wall-clock timezone. That
//! zone is always explicit: callers build a [`TimezoneConfig`] once and pass
//! it into the aggregation and window functions, so results are
//! deterministic and testable with pinned zones. `Default` detects the host
//! zone and falls back to UTC.

use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, TokdashError};

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone used for calendar-boundary operations
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self::new(detect_host_timezone())
    }
}

impl TimezoneConfig {
    /// Create a configuration for an explicit timezone
    pub fn new(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// UTC configuration
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Parse an IANA timezone name, e.g. "Asia/Taipei"
    pub fn from_name(name: &str) -> Result<Self> {
        let tz = Tz::from_str(name).map_err(|_| {
            TokdashError::InvalidTimezone(format!(
                "'{name}'. Use format like 'America/New_York', 'Asia/Taipei', or 'UTC'"
            ))
        })?;
        Ok(Self::new(tz))
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }
}

/// Detect the host timezone, falling back to UTC
///
/// Checks the `TZ` environment variable first, then asks `iana-time-zone`.
fn detect_host_timezone() -> Tz {
    if let Ok(tz_str) = std::env::var("TZ")
        && let Ok(tz) = Tz::from_str(&tz_str)
    {
        debug!("Using timezone from TZ environment variable: {}", tz_str);
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using host timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect host timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}
