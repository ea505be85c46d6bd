//! Error types for timer, duration and configuration handling

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when starting timers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer duration must be greater than 0 seconds")]
    InvalidDuration,

    #[error("step {step} has no duration to time")]
    NoStepDuration { step: usize },
}

/// Errors while parsing human durations like `1m30s`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration format, use formats like: 25m, 30s, 1m30s")]
    MissingNumber,

    #[error("invalid number in duration")]
    InvalidNumber,

    #[error("invalid character '{0}' in duration, use formats like: 25m, 30s, 1m30s")]
    InvalidCharacter(char),

    #[error("duration must end with 'm' (minutes) or 's' (seconds)")]
    MissingUnit,

    #[error("duration must be greater than 0")]
    Zero,
}

/// Errors during configuration and recipe file handling
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
