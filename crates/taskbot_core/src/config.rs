//! Front-end configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the task file path and logging settings for CLI/GUI front-ends.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Core operations never read the environment; front-ends pass the
//!   resolved values explicitly.

use crate::logging::{default_log_level, parse_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "TASKBOT_DATA_PATH";
pub const LOG_LEVEL_VAR: &str = "TASKBOT_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKBOT_LOG_DIR";
pub const DEFAULT_DATA_PATH: &str = "data/tasks.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the front-ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => parse_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => defaults.log_level,
        };

        Ok(Self {
            data_path: read(DATA_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            log_level,
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        })
    }
}
