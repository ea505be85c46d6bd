/// Timer records shared between the engine and its consumers
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque timer identifier, unique for the lifetime of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TimerId)
    }
}

/// Whether the tick decrements a timer.
///
/// Removal is the only way out of either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Paused,
}

impl TimerStatus {
    pub fn toggled(self) -> Self {
        match self {
            TimerStatus::Running => TimerStatus::Paused,
            TimerStatus::Paused => TimerStatus::Running,
        }
    }
}

/// Caller-assigned display classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Warning,
    Active,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::Warning => "WARNING",
            Priority::Active => "ACTIVE",
        }
    }
}

/// A countdown timer as seen by consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    /// Duration the timer was started with, raised when time is added
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub status: TimerStatus,
    pub priority: Priority,
    pub emoji: String,
}

impl Timer {
    /// Elapsed fraction in `[0, 1]`; zero for a zero-length timer
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.total_seconds.saturating_sub(self.remaining_seconds);
        (elapsed as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

/// Parameters for a timer about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimer {
    pub name: String,
    pub total_seconds: u64,
    pub emoji: String,
    pub priority: Priority,
}

impl NewTimer {
    pub fn new(name: impl Into<String>, total_seconds: u64) -> Self {
        Self {
            name: name.into(),
            total_seconds,
            emoji: "⏰".to_string(),
            priority: Priority::Active,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// `MM:SS`, minutes are not folded into hours
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Text progress bar in the style of the terminal display
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
