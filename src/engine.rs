//! Shared countdown engine
//!
//! A `TimerEngine` owns the ordered collection of timers. Every consumer
//! (the timer tab, a cooking session, the clock task) holds a clone of the
//! same handle, so a timer created by one is visible to all of them
//! immediately.
//!
//! # Ordering
//!
//! All operations, including the tick pass, run under a single lock. A
//! mutation that lands between two ticks is therefore fully applied before
//! the next pass reads the collection, and subscribers never observe a timer
//! half way through an update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::error::TimerError;
use crate::timer::{NewTimer, Timer, TimerId, TimerStatus};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Raised once when a running timer reaches zero on a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub id: TimerId,
    pub name: String,
    pub emoji: String,
}

/// Raised when a timer is created, by whichever consumer created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Started {
    pub id: TimerId,
    pub name: String,
    pub emoji: String,
    pub total_seconds: u64,
}

/// Current collection plus the aggregates screens display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub timers: Vec<Timer>,
    pub running_count: usize,
    pub has_any: bool,
}

impl Snapshot {
    fn of(timers: &[Timer]) -> Self {
        Self {
            timers: timers.to_vec(),
            running_count: timers.iter().filter(|t| t.is_running()).count(),
            has_any: !timers.is_empty(),
        }
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }
}

struct Shared {
    timers: Mutex<Vec<Timer>>,
    next_id: AtomicU64,
    snapshots: watch::Sender<Snapshot>,
    completions: broadcast::Sender<Completion>,
    starts: broadcast::Sender<Started>,
}

/// Handle to the shared timer collection. Cloning is cheap.
#[derive(Clone)]
pub struct TimerEngine {
    shared: Arc<Shared>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// `event_capacity` bounds how many completions a slow listener may lag behind
    pub fn with_capacity(event_capacity: usize) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::default());
        let (completions, _) = broadcast::channel(event_capacity.max(1));
        let (starts, _) = broadcast::channel(event_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                timers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                snapshots,
                completions,
                starts,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a running timer and return its id
    pub fn create(&self, new: NewTimer) -> Result<TimerId, TimerError> {
        if new.total_seconds == 0 {
            return Err(TimerError::InvalidDuration);
        }

        // Allocate under the lock so id order matches display order
        let mut timers = self.lock();
        let id = TimerId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let started = Started {
            id,
            name: new.name.clone(),
            emoji: new.emoji.clone(),
            total_seconds: new.total_seconds,
        };
        timers.push(Timer {
            id,
            name: new.name,
            total_seconds: new.total_seconds,
            remaining_seconds: new.total_seconds,
            status: TimerStatus::Running,
            priority: new.priority,
            emoji: new.emoji,
        });
        debug!(%id, seconds = new.total_seconds, "timer created");
        self.publish(&timers);
        let _ = self.shared.starts.send(started);
        Ok(id)
    }

    /// Flip running/paused. Returns false if the id is unknown.
    pub fn toggle(&self, id: TimerId) -> bool {
        self.update(id, |timer| {
            timer.status = timer.status.toggled();
            debug!(%id, status = ?timer.status, "timer toggled");
        })
    }

    /// Pause or resume explicitly. Asking for the current status changes
    /// nothing. Returns false if the id is unknown.
    pub fn set_status(&self, id: TimerId, status: TimerStatus) -> bool {
        self.update(id, |timer| {
            if timer.status != status {
                timer.status = status;
                debug!(%id, ?status, "timer status set");
            }
        })
    }

    /// Delete the timer outright. Removing an unknown id is a no-op.
    pub fn remove(&self, id: TimerId) -> bool {
        let mut timers = self.lock();
        let before = timers.len();
        timers.retain(|t| t.id != id);
        if timers.len() == before {
            return false;
        }
        debug!(%id, "timer removed");
        self.publish(&timers);
        true
    }

    /// Add (or with a negative delta, subtract) time.
    ///
    /// Remaining time clamps at zero. The total only grows, so progress never
    /// jumps backwards when time is taken off an extended timer.
    pub fn adjust_remaining(&self, id: TimerId, delta_seconds: i64) -> bool {
        self.update(id, |timer| {
            let magnitude = delta_seconds.unsigned_abs();
            if delta_seconds >= 0 {
                timer.remaining_seconds = timer.remaining_seconds.saturating_add(magnitude);
                timer.total_seconds = timer.total_seconds.saturating_add(magnitude);
            } else {
                timer.remaining_seconds = timer.remaining_seconds.saturating_sub(magnitude);
            }
            debug!(
                %id,
                delta_seconds,
                remaining = timer.remaining_seconds,
                total = timer.total_seconds,
                "timer adjusted"
            );
        })
    }

    /// Advance every running timer by one second.
    ///
    /// Timers that hit zero on this pass are returned and broadcast as
    /// completions before the call returns. They stay in the collection.
    pub fn tick(&self) -> Vec<Completion> {
        let mut timers = self.lock();
        let mut completed = Vec::new();
        let mut changed = false;

        for timer in timers.iter_mut() {
            if timer.status != TimerStatus::Running || timer.remaining_seconds == 0 {
                continue;
            }
            timer.remaining_seconds = timer.remaining_seconds.saturating_sub(1);
            changed = true;
            if timer.remaining_seconds == 0 {
                completed.push(Completion {
                    id: timer.id,
                    name: timer.name.clone(),
                    emoji: timer.emoji.clone(),
                });
            }
        }

        if changed {
            self.publish(&timers);
        }
        for completion in &completed {
            info!(id = %completion.id, name = %completion.name, "timer finished");
            // No listeners is fine; the event is still returned to the caller.
            let _ = self.shared.completions.send(completion.clone());
        }
        completed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.lock())
    }

    pub fn get(&self, id: TimerId) -> Option<Timer> {
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    pub fn running_count(&self) -> usize {
        self.lock().iter().filter(|t| t.is_running()).count()
    }

    pub fn has_any(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Receives a fresh snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Receives one event per timer reaching zero
    pub fn completions(&self) -> broadcast::Receiver<Completion> {
        self.shared.completions.subscribe()
    }

    /// Receives one event per created timer
    pub fn starts(&self) -> broadcast::Receiver<Started> {
        self.shared.starts.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn update(&self, id: TimerId, apply: impl FnOnce(&mut Timer)) -> bool {
        let mut timers = self.lock();
        let Some(timer) = timers.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "ignoring update for unknown timer");
            return false;
        };
        apply(timer);
        self.publish(&timers);
        true
    }

    // A panic while holding the lock cannot leave a timer half written
    // (every field update is a plain store), so keep serving the data.
    fn lock(&self) -> MutexGuard<'_, Vec<Timer>> {
        self.shared
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, timers: &[Timer]) {
        self.shared.snapshots.send_replace(Snapshot::of(timers));
    }
}
