//! Ready-made timer requests used by the timer tab and cooking mode

use crate::error::TimerError;
use crate::timer::{NewTimer, Priority};

pub const CUSTOM_EMOJI: &str = "⏰";
pub const STEP_EMOJI: &str = "👨‍🍳";
pub const DEFAULT_CUSTOM_MINUTES: u64 = 5;

/// One entry of the quick-start grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStart {
    pub name: &'static str,
    pub minutes: u64,
    pub emoji: &'static str,
}

pub static QUICK_START: [QuickStart; 6] = [
    QuickStart {
        name: "Quick",
        minutes: 3,
        emoji: "⚡",
    },
    QuickStart {
        name: "Pasta",
        minutes: 8,
        emoji: "🍝",
    },
    QuickStart {
        name: "Eggs",
        minutes: 10,
        emoji: "🥚",
    },
    QuickStart {
        name: "Veggies",
        minutes: 15,
        emoji: "🥬",
    },
    QuickStart {
        name: "Chicken",
        minutes: 20,
        emoji: "🍗",
    },
    QuickStart {
        name: "Bread",
        minutes: 30,
        emoji: "🍞",
    },
];

impl QuickStart {
    pub fn to_new_timer(&self) -> NewTimer {
        NewTimer::new(self.name, self.minutes * 60)
            .emoji(self.emoji)
            .priority(Priority::Active)
    }
}

/// Case-insensitive lookup in the quick-start grid
pub fn find_quick_start(name: &str) -> Option<&'static QuickStart> {
    let name = name.trim();
    QUICK_START
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// State of the custom timer form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTimer {
    pub name: String,
    pub minutes: u64,
}

impl Default for CustomTimer {
    fn default() -> Self {
        Self {
            name: String::new(),
            minutes: DEFAULT_CUSTOM_MINUTES,
        }
    }
}

impl CustomTimer {
    pub fn increment(&mut self) {
        self.minutes = self.minutes.saturating_add(1);
    }

    /// The form never goes below one minute
    pub fn decrement(&mut self) {
        self.minutes = self.minutes.saturating_sub(1).max(1);
    }

    /// Build the request, resetting the form on success
    pub fn submit(&mut self) -> Result<NewTimer, TimerError> {
        let timer = custom_timer(&self.name, self.minutes.saturating_mul(60))?;
        *self = Self::default();
        Ok(timer)
    }
}

/// A user-named timer of arbitrary length
pub fn custom_timer(name: &str, seconds: u64) -> Result<NewTimer, TimerError> {
    if seconds == 0 {
        return Err(TimerError::InvalidDuration);
    }
    Ok(NewTimer::new(name.trim(), seconds)
        .emoji(CUSTOM_EMOJI)
        .priority(Priority::Active))
}

/// Timer for a recipe step; `step` is zero-based
pub fn step_timer(step: usize, seconds: u64, custom_name: Option<&str>) -> NewTimer {
    let name = match custom_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Step {}", step + 1),
    };
    NewTimer::new(name, seconds)
        .emoji(STEP_EMOJI)
        .priority(Priority::Critical)
}
