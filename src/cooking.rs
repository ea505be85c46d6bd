//! Step-by-step cooking mode
//!
//! A `CookingSession` walks through a recipe's instructions and can start a
//! timer for the step on screen. The timer lives in the shared engine, so the
//! timer tab sees it too; the session only remembers which timer belongs to
//! which step.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::TimerEngine;
use crate::error::{ConfigError, TimerError};
use crate::presets::step_timer;
use crate::timer::{Timer, TimerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub instruction_text: String,
    /// Suggested timer length in seconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub timer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub instructions: Vec<RecipeStep>,
}

impl Recipe {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The three commands the voice assistant can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Next,
    Previous,
    Repeat,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepChange {
    /// Moved to a new step; carries its announcement
    Moved(String),
    /// Stayed on the current step
    Unchanged,
    /// Asked for the step after the last one
    Finished,
    /// Re-read the current step
    Repeated(String),
}

pub struct CookingSession {
    recipe: Recipe,
    engine: TimerEngine,
    current: usize,
    step_timers: HashMap<usize, TimerId>,
}

impl CookingSession {
    pub fn new(recipe: Recipe, engine: TimerEngine) -> Self {
        info!(title = %recipe.title, steps = recipe.instructions.len(), "cooking session started");
        Self {
            recipe,
            engine,
            current: 0,
            step_timers: HashMap::new(),
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Zero-based index of the step on screen
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.recipe.instructions.len()
    }

    pub fn current_step_data(&self) -> Option<&RecipeStep> {
        self.recipe.instructions.get(self.current)
    }

    /// Fraction of steps reached, counting the current one
    pub fn progress(&self) -> f64 {
        match self.step_count() {
            0 => 0.0,
            count => (self.current + 1) as f64 / count as f64,
        }
    }

    /// `Step N: instruction` for the current step
    pub fn announcement(&self) -> String {
        let text = self
            .current_step_data()
            .map(|step| step.instruction_text.as_str())
            .unwrap_or("No instruction available");
        format!("Step {}: {}", self.current + 1, text)
    }

    pub fn next_step(&mut self) -> StepChange {
        if self.current + 1 < self.step_count() {
            self.current += 1;
            debug!(step = self.current, "next step");
            StepChange::Moved(self.announcement())
        } else {
            StepChange::Finished
        }
    }

    pub fn previous_step(&mut self) -> StepChange {
        if self.current == 0 {
            return StepChange::Unchanged;
        }
        self.current -= 1;
        debug!(step = self.current, "previous step");
        StepChange::Moved(self.announcement())
    }

    pub fn repeat_step(&self) -> StepChange {
        StepChange::Repeated(self.announcement())
    }

    pub fn handle_voice(&mut self, command: VoiceCommand) -> StepChange {
        match command {
            VoiceCommand::Next => self.next_step(),
            VoiceCommand::Previous => self.previous_step(),
            VoiceCommand::Repeat => self.repeat_step(),
        }
    }

    /// Start the current step's suggested timer
    pub fn start_step_timer(&mut self) -> Result<TimerId, TimerError> {
        let step = self.current;
        let data = self
            .current_step_data()
            .ok_or(TimerError::NoStepDuration { step })?;
        let seconds = data.duration.ok_or(TimerError::NoStepDuration { step })?;
        let request = step_timer(step, seconds, data.timer_name.as_deref());
        self.start_timer_for_step(step, request.total_seconds, Some(request.name))
    }

    /// Start a timer of the given length bound to the current step
    pub fn start_custom_step_timer(
        &mut self,
        seconds: u64,
        name: Option<&str>,
    ) -> Result<TimerId, TimerError> {
        self.start_timer_for_step(self.current, seconds, name.map(str::to_string))
    }

    fn start_timer_for_step(
        &mut self,
        step: usize,
        seconds: u64,
        name: Option<String>,
    ) -> Result<TimerId, TimerError> {
        let id = self.engine.create(step_timer(step, seconds, name.as_deref()))?;
        self.step_timers.insert(step, id);
        info!(step, %id, seconds, "step timer started");
        Ok(id)
    }

    /// The timer started for the current step, if it is still alive
    pub fn current_step_timer(&self) -> Option<Timer> {
        let id = self.step_timers.get(&self.current)?;
        self.engine.get(*id)
    }
}
