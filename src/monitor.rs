//! Tick scheduling for live recomputation
//!
//! Two periodic drivers exist in a dashboard session: a 1-second tick that
//! recomputes countdowns, and a data-change refresh that re-runs aggregation
//! and alert evaluation. Both are expressible as a [`RecurringTask`]: a
//! cancelable repeating timer that invokes a pure recompute callback. Tasks
//! must be canceled (or dropped) when the owning view is torn down so no
//! ticks leak.
//!
//! [`AlertFeed`] is the single evaluation context that owns the notification
//! gate: each observation evaluates spend, consults the gate, and delivers
//! through the injected [`Notifier`] at most once per breach.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};

use crate::alerts::{AlertConfig, AlertStatus, NotificationGate, Notifier, evaluate_window};
use crate::windows::WindowUnit;

/// A cancelable repeating timer driving a recompute callback
///
/// The callback runs once per period, starting one period after spawn. Late
/// ticks are skipped rather than bursted. Dropping the task aborts it;
/// [`RecurringTask::cancel`] shuts it down gracefully.
pub struct RecurringTask {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    /// Spawn a task invoking `on_tick` every `period`
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, mut rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => on_tick(),
                    _ = rx.changed() => break,
                }
            }
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for the task to finish
    pub async fn cancel(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && e.is_panic()
        {
            warn!("Tick task panicked during shutdown: {:?}", e);
        }
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// Evaluation context tying alert evaluation, gating, and delivery together
pub struct AlertFeed {
    config: AlertConfig,
    gate: NotificationGate,
    notifier: Box<dyn Notifier + Send>,
}

impl AlertFeed {
    /// Create a feed with a sanitized copy of the configuration
    pub fn new(config: AlertConfig, notifier: Box<dyn Notifier + Send>) -> Self {
        Self {
            config: config.sanitized(),
            gate: NotificationGate::new(),
            notifier,
        }
    }

    /// Replace the configuration, e.g. after a settings edit
    pub fn update_config(&mut self, config: AlertConfig) {
        self.config = config.sanitized();
    }

    /// Evaluate the latest spend for a window and notify on a new breach
    pub fn observe(&mut self, unit: WindowUnit, spend: f64) -> AlertStatus {
        let status = evaluate_window(&self.config, unit, spend);

        if self
            .gate
            .should_fire(&status, self.config.notification_enabled)
        {
            info!(
                severity = ?status.severity,
                percentage = status.percentage,
                "Firing usage alert"
            );
            self.notifier.notify(&status.message);
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Severity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recurring_task_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_task = count.clone();

        let task = RecurringTask::spawn(Duration::from_secs(1), move || {
            count_task.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let ticks = count.load(Ordering::SeqCst);
        assert_eq!(ticks, 3);

        task.cancel().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), ticks, "ticks after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recurring_task_drop_aborts() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_task = count.clone();

        let task = RecurringTask::spawn(Duration::from_secs(1), move || {
            count_task.fetch_add(1, Ordering::SeqCst);
        });
        drop(task);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_alert_feed_notifies_once_per_breach() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            messages: messages.clone(),
        };
        let mut feed = AlertFeed::new(AlertConfig::default(), Box::new(notifier));

        // Default monthly limit is 300 with an 80% threshold
        assert_eq!(feed.observe(WindowUnit::Month, 10.0).severity, Severity::Normal);
        assert_eq!(feed.observe(WindowUnit::Month, 290.0).severity, Severity::Error);
        assert_eq!(feed.observe(WindowUnit::Month, 295.0).severity, Severity::Error);
        assert_eq!(feed.observe(WindowUnit::Month, 10.0).severity, Severity::Normal);
        assert_eq!(feed.observe(WindowUnit::Month, 290.0).severity, Severity::Error);

        assert_eq!(messages.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_alert_feed_respects_disabled_notifications() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            messages: messages.clone(),
        };
        let config = AlertConfig {
            notification_enabled: false,
            ..Default::default()
        };
        let mut feed = AlertFeed::new(config, Box::new(notifier));

        let status = feed.observe(WindowUnit::Month, 290.0);
        assert_eq!(status.severity, Severity::Error);
        assert!(messages.lock().unwrap().is_empty());
    }
}
