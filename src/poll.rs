//! Poll loop
//!
//! Fixed-interval background refresh. The first tick fires one period after
//! start. Each tick runs on its own task, so a slow response never delays the
//! schedule; superseded list responses are dropped by the controller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::controller::DashboardController;

/// Running poll schedule. Stopping or dropping it cancels future ticks.
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    period: Duration,
}

impl PollHandle {
    /// Spawn the schedule on the current runtime.
    ///
    /// A zero period schedules nothing and the handle reports not running.
    pub fn start(controller: DashboardController, period: Duration) -> Self {
        let ticks = Arc::new(AtomicU64::new(0));

        if period.is_zero() {
            tracing::error!("Poll interval is zero, polling disabled");
            return Self {
                task: None,
                running: Arc::new(AtomicBool::new(false)),
                ticks,
                period,
            };
        }

        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn({
            let ticks = Arc::clone(&ticks);
            async move {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    interval.tick().await;
                    let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::debug!(tick = n, "Poll tick");

                    let controller = controller.clone();
                    tokio::spawn(async move { controller.poll_tick().await });
                }
            }
        });

        tracing::info!(period_ms = period.as_millis() as u64, "Polling started");

        Self {
            task: Some(task),
            running,
            ticks,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        if self.running.swap(false, Ordering::Relaxed) {
            if let Some(task) = &self.task {
                task.abort();
            }
            tracing::info!(ticks = self.ticks(), "Polling stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
