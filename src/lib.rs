//! Kitchen timers
//!
//! A shared countdown engine for a cooking app: any number of named timers
//! advanced by one clock, with pause/resume, time adjustment, completion
//! events and a cooking mode that ties timers to recipe steps.

pub mod clock;
pub mod config;
pub mod cooking;
pub mod duration;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notify;
pub mod presets;
pub mod shell;
pub mod timer;

pub use clock::Clock;
pub use config::Config;
pub use cooking::{CookingSession, Recipe, RecipeStep, StepChange, VoiceCommand};
pub use engine::{Completion, Snapshot, Started, TimerEngine};
pub use error::{ConfigError, DurationError, TimerError};
pub use timer::{NewTimer, Priority, Timer, TimerId, TimerStatus};
