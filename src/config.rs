/// Configuration file for the timer CLI
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Length of one tick in milliseconds
    pub tick_millis: u64,
    /// Play a system sound when a timer finishes
    pub beep: bool,
    pub hooks: Hooks,
}

/// Shell commands run on timer events. A leading `#` disables a hook.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Hooks {
    pub on_start: Option<String>,
    pub on_complete: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            beep: true,
            hooks: Hooks::default(),
        }
    }
}

impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    /// Defaults written to a fresh config file, hooks commented out
    pub fn template() -> Self {
        Self {
            hooks: Hooks {
                on_start: Some("# echo \"started $KTIMER_NAME\"".to_string()),
                on_complete: Some("# notify-send \"$KTIMER_NAME is done!\"".to_string()),
            },
            ..Self::default()
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)
    }

    /// Load the config, creating the template if missing.
    ///
    /// Unreadable or invalid files fall back to defaults with a warning.
    pub fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            let template = Self::template();
            if let Err(err) = template.save_to(path) {
                warn!(error = %err, "could not write default config");
            }
            return template;
        }

        Self::load_from(path).unwrap_or_else(|err| {
            warn!(error = %err, "using default configuration");
            Self::default()
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("ktimer")
            .join("config.json")
    } else {
        PathBuf::from("ktimer-config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_creates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_or_create(&path);
        assert_eq!(config, Config::template());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), Config::template());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "beep": false }"#).unwrap();

        let config = Config::load_or_create(&path);
        assert!(!config.beep);
        assert_eq!(config.tick_millis, 1000);
        assert_eq!(config.hooks, Hooks::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(Config::load_or_create(&path), Config::default());
    }

    #[test]
    fn test_tick_period_never_zero() {
        let config = Config {
            tick_millis: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(1));
    }
}
