//! The single periodic tick driving an engine

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::engine::TimerEngine;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// Owns the background tick task. Stopping is idempotent and also
/// happens on drop.
pub struct Clock {
    task: Option<JoinHandle<()>>,
}

impl Clock {
    /// Spawn the tick task on the current tokio runtime.
    ///
    /// The first tick lands one full `period` after start.
    pub fn start(engine: TimerEngine, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let first = time::Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let completed = engine.tick();
                if !completed.is_empty() {
                    debug!(count = completed.len(), "tick completed timers");
                }
            }
        });
        info!(period_ms = period.as_millis() as u64, "clock started");
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("clock stopped");
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}
