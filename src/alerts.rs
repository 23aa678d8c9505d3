//! Alert evaluation and notification gating
//!
//! [`evaluate`] compares aggregated spend against a configured limit and a
//! threshold percentage, producing a tri-state severity. The severity
//! decision always uses the raw spend/limit ratio; the `percentage` carried
//! on the result is clamped to 100 for display only, so spend far beyond the
//! limit still evaluates distinctly from spend exactly at it.
//!
//! [`NotificationGate`] turns the per-tick severity stream into
//! edge-triggered firings: one notification per contiguous breach, re-armed
//! when the breach clears. The gate only decides; delivering the message is
//! the job of whatever implements [`Notifier`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TokdashError};
use crate::windows::WindowUnit;

/// User-owned alert configuration
///
/// Defaults apply on first use; edits come from the settings form and are
/// persisted externally. A limit of zero means "no limit configured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Percentage of limit at which severity becomes error (1-100);
    /// warning triggers at 70% of this value
    pub threshold_percentage: f64,
    pub daily_limit_usd: f64,
    pub weekly_limit_usd: f64,
    pub monthly_limit_usd: f64,
    pub notification_enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_percentage: 80.0,
            daily_limit_usd: 10.0,
            weekly_limit_usd: 70.0,
            monthly_limit_usd: 300.0,
            notification_enabled: true,
        }
    }
}

impl AlertConfig {
    /// Reject out-of-range values; for the settings-editing layer
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_percentage.is_finite()
            || !(1.0..=100.0).contains(&self.threshold_percentage)
        {
            return Err(TokdashError::Config(format!(
                "threshold percentage must be between 1 and 100, got {}",
                self.threshold_percentage
            )));
        }
        for (name, limit) in [
            ("daily", self.daily_limit_usd),
            ("weekly", self.weekly_limit_usd),
            ("monthly", self.monthly_limit_usd),
        ] {
            if limit.is_nan() || limit < 0.0 {
                return Err(TokdashError::Config(format!(
                    "{name} limit must be non-negative, got {limit}"
                )));
            }
        }
        Ok(())
    }

    /// Clamp values into their defined ranges
    ///
    /// The evaluation core assumes validated input but clamps defensively:
    /// threshold into [1, 100], negative or NaN limits to zero.
    pub fn sanitized(&self) -> Self {
        let threshold = if self.threshold_percentage.is_finite() {
            self.threshold_percentage.clamp(1.0, 100.0)
        } else {
            100.0
        };
        Self {
            threshold_percentage: threshold,
            daily_limit_usd: self.daily_limit_usd.max(0.0),
            weekly_limit_usd: self.weekly_limit_usd.max(0.0),
            monthly_limit_usd: self.monthly_limit_usd.max(0.0),
            notification_enabled: self.notification_enabled,
        }
    }

    /// The USD limit that applies to a window unit
    pub fn limit_for(&self, unit: WindowUnit) -> f64 {
        match unit {
            WindowUnit::Day => self.daily_limit_usd,
            WindowUnit::Week => self.weekly_limit_usd,
            WindowUnit::Month => self.monthly_limit_usd,
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Error,
}

impl Severity {
    /// Whether this severity counts as a breach (warning or error)
    pub fn is_breach(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Derived, ephemeral alert state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStatus {
    pub severity: Severity,
    /// Human-readable message; empty when severity is normal
    pub message: String,
    /// Usage percentage clamped to [0, 100] for display
    pub percentage: f64,
}

impl AlertStatus {
    fn normal(percentage: f64) -> Self {
        Self {
            severity: Severity::Normal,
            message: String::new(),
            percentage,
        }
    }

    /// Whether the status is a breach (warning or error)
    pub fn is_breach(&self) -> bool {
        self.severity.is_breach()
    }
}

/// Evaluate spend against a limit and threshold percentage
///
/// A limit that is zero, negative, or non-finite means unlimited: the result
/// is normal with percentage 0 (never a division by zero). The threshold is
/// defensively clamped into [1, 100].
pub fn evaluate(spend: f64, limit: f64, threshold_pct: f64) -> AlertStatus {
    if !limit.is_finite() || limit <= 0.0 {
        return AlertStatus::normal(0.0);
    }

    let threshold = if threshold_pct.is_finite() {
        threshold_pct.clamp(1.0, 100.0)
    } else {
        100.0
    };
    let warning_threshold = threshold * 0.7;

    // Decisions use the raw ratio; only the returned percentage is clamped.
    let percentage = spend / limit * 100.0;
    let display = percentage.clamp(0.0, 100.0);

    if percentage >= threshold {
        AlertStatus {
            severity: Severity::Error,
            message: format!(
                "⚠️ Spend has reached {percentage:.1}% of the limit, over the configured {threshold}% threshold"
            ),
            percentage: display,
        }
    } else if percentage >= warning_threshold {
        AlertStatus {
            severity: Severity::Warning,
            message: format!(
                "⚠️ Spend has reached {percentage:.1}% of the limit, approaching the {threshold}% threshold"
            ),
            percentage: display,
        }
    } else {
        AlertStatus::normal(display)
    }
}

/// Evaluate spend against the config limit for a window unit
pub fn evaluate_window(config: &AlertConfig, unit: WindowUnit, spend: f64) -> AlertStatus {
    let config = config.sanitized();
    evaluate(spend, config.limit_for(unit), config.threshold_percentage)
}

/// Capability for delivering a notification
///
/// The engine decides *whether* to fire; the collaborator behind this trait
/// performs the side effect (desktop notification, webhook, log line).
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Edge-triggered notification deduplication
///
/// One firing per contiguous breach interval; re-armed when the status
/// returns to normal or notifications are disabled. Owned by a single
/// evaluation context, so repeated ticks are safe.
#[derive(Debug, Default)]
pub struct NotificationGate {
    has_notified: bool,
}

impl NotificationGate {
    /// Create a gate in the armed state
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether this status should fire a notification
    pub fn should_fire(&mut self, status: &AlertStatus, enabled: bool) -> bool {
        if !enabled || !status.is_breach() {
            self.has_notified = false;
            return false;
        }

        if self.has_notified {
            debug!("Suppressing repeat notification for ongoing breach");
            return false;
        }

        self.has_notified = true;
        true
    }

    /// Whether the current breach has already fired
    pub fn has_notified(&self) -> bool {
        self.has_notified
    }
}
