//! Subscription plans and the billing-cycle clock
//!
//! A subscription carries a plan tier with fixed limits and a recurring
//! billing cycle. `next_reset_date` always points at the first instant of
//! the next cycle; it is never advanced implicitly. Once `now` passes it,
//! the owner triggers [`Subscription::recompute_next_reset`] explicitly
//! (scheduled job, next login) so a skipped tick can never silently skip a
//! cycle.
//!
//! [`countdown`] decomposes the time left until a target instant for live
//! display. It is recomputed on a periodic tick (see [`crate::monitor`]);
//! the computation is idempotent and side-effect-free.

use chrono::{DateTime, Months, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subscription plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Fixed plan information for this tier
    pub fn info(self) -> &'static PlanInfo {
        &PLAN_CONFIGS[&self]
    }
}

/// Token and USD ceilings per period
///
/// `u64::MAX` / `f64::INFINITY` mean unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub daily_tokens: u64,
    pub weekly_tokens: u64,
    pub monthly_tokens: u64,
    pub daily_usd: f64,
    pub weekly_usd: f64,
    pub monthly_usd: f64,
}

/// A plan tier with its limits and feature list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub tier: PlanTier,
    pub name: String,
    pub limits: PlanLimits,
    pub features: Vec<String>,
}

static PLAN_CONFIGS: Lazy<BTreeMap<PlanTier, PlanInfo>> = Lazy::new(|| {
    let mut plans = BTreeMap::new();
    plans.insert(
        PlanTier::Free,
        PlanInfo {
            tier: PlanTier::Free,
            name: "Free Plan".to_string(),
            limits: PlanLimits {
                daily_tokens: 100_000,
                weekly_tokens: 500_000,
                monthly_tokens: 2_000_000,
                daily_usd: 5.0,
                weekly_usd: 30.0,
                monthly_usd: 100.0,
            },
            features: vec![
                "Basic monitoring".to_string(),
                "30-day history".to_string(),
            ],
        },
    );
    plans.insert(
        PlanTier::Pro,
        PlanInfo {
            tier: PlanTier::Pro,
            name: "Pro Plan".to_string(),
            limits: PlanLimits {
                daily_tokens: 500_000,
                weekly_tokens: 3_000_000,
                monthly_tokens: 10_000_000,
                daily_usd: 30.0,
                weekly_usd: 180.0,
                monthly_usd: 600.0,
            },
            features: vec![
                "Real-time monitoring".to_string(),
                "Unlimited history".to_string(),
                "Data export".to_string(),
                "Alert notifications".to_string(),
            ],
        },
    );
    plans.insert(
        PlanTier::Enterprise,
        PlanInfo {
            tier: PlanTier::Enterprise,
            name: "Enterprise Plan".to_string(),
            limits: PlanLimits {
                daily_tokens: u64::MAX,
                weekly_tokens: u64::MAX,
                monthly_tokens: u64::MAX,
                daily_usd: f64::INFINITY,
                weekly_usd: f64::INFINITY,
                monthly_usd: f64::INFINITY,
            },
            features: vec![
                "Everything in Pro".to_string(),
                "Unlimited usage".to_string(),
                "Dedicated support".to_string(),
                "API integration".to_string(),
            ],
        },
    );
    plans
});

/// Recurring billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    fn advance(self, instant: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Monthly => instant + Months::new(1),
            Self::Annual => instant + Months::new(12),
        }
    }
}

/// A user's subscription state, owned by the external persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: PlanInfo,
    pub start_date: DateTime<Utc>,
    pub billing_cycle: BillingCycle,
    /// First instant of the next cycle; stale once `now` passes it
    pub next_reset_date: DateTime<Utc>,
    pub auto_renew: bool,
}

impl Subscription {
    /// Create a subscription starting a fresh cycle at `start_date`
    pub fn new(
        tier: PlanTier,
        start_date: DateTime<Utc>,
        billing_cycle: BillingCycle,
        auto_renew: bool,
    ) -> Self {
        Self {
            plan: tier.info().clone(),
            start_date,
            billing_cycle,
            next_reset_date: billing_cycle.advance(start_date),
            auto_renew,
        }
    }

    /// The stored next reset instant
    ///
    /// Never auto-advances; callers trigger [`Self::recompute_next_reset`]
    /// once `now >= next_reset()`.
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.next_reset_date
    }

    /// Advance the stored reset date by whole cycles until it lies strictly
    /// after `now`
    pub fn recompute_next_reset(&mut self, now: DateTime<Utc>) {
        while self.next_reset_date <= now {
            self.next_reset_date = self.billing_cycle.advance(self.next_reset_date);
        }
    }
}

/// Time remaining until a target instant, decomposed for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// Whole seconds until the target, never negative
    pub total_seconds: i64,
    /// `"{days}天 HH:MM:SS"` when days > 0, otherwise `"HH:MM:SS"`
    pub formatted: String,
}

/// Compute the live countdown from `now` to `target`
///
/// Saturates at zero once the target has passed.
pub fn countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let total_seconds = (target - now).num_seconds().max(0);

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let formatted = if days > 0 {
        format!("{days}天 {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };

    Countdown {
        days,
        hours,
        minutes,
        seconds,
        total_seconds,
        formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_plan_limits() {
        let free = PlanTier::Free.info();
        assert_eq!(free.limits.monthly_usd, 100.0);
        assert_eq!(free.features.len(), 2);

        let enterprise = PlanTier::Enterprise.info();
        assert!(enterprise.limits.monthly_usd.is_infinite());
        assert_eq!(enterprise.limits.daily_tokens, u64::MAX);
    }

    #[test]
    fn test_new_subscription_reset_is_one_cycle_out() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let sub = Subscription::new(PlanTier::Pro, start, BillingCycle::Monthly, true);
        assert_eq!(
            sub.next_reset(),
            Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_reset_does_not_auto_advance() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let sub = Subscription::new(PlanTier::Pro, start, BillingCycle::Monthly, true);

        // Reading the reset date long after it passed returns it unchanged
        let stale = sub.next_reset();
        assert_eq!(sub.next_reset(), stale);
    }

    #[test]
    fn test_recompute_skips_missed_cycles() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let mut sub = Subscription::new(PlanTier::Pro, start, BillingCycle::Monthly, true);

        // Three months pass without a recompute
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap();
        sub.recompute_next_reset(now);
        assert_eq!(
            sub.next_reset(),
            Utc.with_ymd_and_hms(2026, 5, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_annual_cycle() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let sub = Subscription::new(PlanTier::Enterprise, start, BillingCycle::Annual, false);
        assert_eq!(
            sub.next_reset(),
            Utc.with_ymd_and_hms(2027, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_countdown_decomposition() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let target = now + Duration::days(3) + Duration::hours(14) + Duration::minutes(32)
            + Duration::seconds(15);

        let cd = countdown(target, now);
        assert_eq!(cd.days, 3);
        assert_eq!(cd.hours, 14);
        assert_eq!(cd.minutes, 32);
        assert_eq!(cd.seconds, 15);
        assert_eq!(cd.formatted, "3天 14:32:15");
    }

    #[test]
    fn test_countdown_same_day_format() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let target = now + Duration::hours(2) + Duration::minutes(5) + Duration::seconds(9);

        let cd = countdown(target, now);
        assert_eq!(cd.days, 0);
        assert_eq!(cd.formatted, "02:05:09");
    }

    #[test]
    fn test_countdown_never_negative() {
        let target = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let now = target + Duration::hours(5);

        let cd = countdown(target, now);
        assert_eq!(cd.total_seconds, 0);
        assert_eq!(cd.formatted, "00:00:00");
    }

    #[test]
    fn test_countdown_at_target_is_zero() {
        let target = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let cd = countdown(target, target);
        assert_eq!(cd.total_seconds, 0);
    }
}
