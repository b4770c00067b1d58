use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;

use crate::config::{ RegistryOptions, DEFAULT_AUTO_TRANSFER_DAYS };

pub const ENV_STATE_PATH: &str = "ESTATE_STATE_PATH";
pub const ENV_EVENT_LOG: &str = "ESTATE_EVENT_LOG";
pub const ENV_AUTO_TRANSFER_DAYS: &str = "ESTATE_AUTO_TRANSFER_DAYS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EstateConfig {
    /// JSON file holding the registry snapshot
    pub state_path: PathBuf,

    /// Optional JSON-lines journal that every emitted event is appended to
    pub event_log_path: Option<PathBuf>,

    /// Days after the last renewal before auto-transfer becomes possible
    pub auto_transfer_after_days: u64,
}

impl Default for EstateConfig {
    fn default() -> Self {
        EstateConfig {
            state_path: PathBuf::from("estate.json"),
            event_log_path: None,
            auto_transfer_after_days: DEFAULT_AUTO_TRANSFER_DAYS,
        }
    }
}

impl EstateConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: EstateConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults, then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        EstateConfig::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`EstateConfig::load`], with overrides taken from `lookup`
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        use log::debug;

        let config = match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                EstateConfig::from_file(path)?
            }
            None => {
                debug!("No config file given, using defaults");
                EstateConfig::default()
            }
        };

        config.with_overrides(lookup)
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        use log::debug;

        if let Some(path) = lookup(ENV_STATE_PATH) {
            debug!("{} overrides state path", ENV_STATE_PATH);
            self.state_path = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_EVENT_LOG) {
            debug!("{} overrides event log path", ENV_EVENT_LOG);
            self.event_log_path = if path.trim().is_empty() { None } else { Some(PathBuf::from(path)) };
        }

        if let Some(days) = lookup(ENV_AUTO_TRANSFER_DAYS) {
            self.auto_transfer_after_days = days.trim().parse().map_err(|e| {
                ConfigError::InvalidValue {
                    key: ENV_AUTO_TRANSFER_DAYS.to_string(),
                    message: format!("{}", e),
                }
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_transfer_after_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "auto_transfer_after_days".to_string(),
                message: "must be at least one day".to_string(),
            });
        }
        if self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "state_path".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions::with_auto_transfer_days(self.auto_transfer_after_days)
    }
}
