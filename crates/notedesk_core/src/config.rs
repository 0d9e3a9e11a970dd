//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Name every environment variable in one place.
//! - Resolve the notes file path, store capacity and logging settings.
//!
//! # Invariants
//! - Resolution never panics; malformed values surface as `ConfigError`.
//! - Unset variables fall back to `defaults`.

use crate::logging::default_log_level;
use crate::repo::note_file::NoteFile;
use crate::store::note_store::MAX_NOTES;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable names.
pub mod env_vars {
    /// Path of the notes file.
    pub const DATA_FILE: &str = "NOTEDESK_DATA_FILE";
    /// One of `trace|debug|info|warn|error`.
    pub const LOG_LEVEL: &str = "NOTEDESK_LOG_LEVEL";
    /// Absolute directory for rolling logs. Logging stays off when unset.
    pub const LOG_DIR: &str = "NOTEDESK_LOG_DIR";
    /// Maximum number of notes held in memory, `1..=MAX_NOTES`.
    pub const CAPACITY: &str = "NOTEDESK_CAPACITY";
}

/// Default values.
pub mod defaults {
    pub const DATA_FILE: &str = "notes_data.txt";
    pub const CAPACITY: usize = super::MAX_NOTES;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidCapacity(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCapacity(value) => write!(
                f,
                "{} must be an integer in 1..={MAX_NOTES}, got `{value}`",
                env_vars::CAPACITY
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_file: PathBuf,
    pub capacity: usize,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(defaults::DATA_FILE),
            capacity: defaults::CAPACITY,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = non_blank(env_vars::DATA_FILE) {
            config.data_file = PathBuf::from(path.trim());
        }
        if let Some(level) = non_blank(env_vars::LOG_LEVEL) {
            config.log_level = level.trim().to_string();
        }
        if let Some(dir) = non_blank(env_vars::LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(raw) = non_blank(env_vars::CAPACITY) {
            config.capacity = match raw.trim().parse::<usize>() {
                Ok(capacity) if (1..=MAX_NOTES).contains(&capacity) => capacity,
                _ => return Err(ConfigError::InvalidCapacity(raw)),
            };
        }

        Ok(config)
    }

    /// Notes file repository for these settings.
    pub fn note_file(&self) -> NoteFile {
        NoteFile::with_capacity(self.data_file.clone(), self.capacity)
    }
}
