//! Runtime configuration resolution.
//!
//! Values come from environment variables; blank values count as unset.
//!
//! - `SURVEY_SEED_PATH`: seed JSON file.
//! - `SURVEY_LOG_LEVEL`: `trace|debug|info|warn|error`.
//! - `SURVEY_LOG_DIR`: absolute directory for rolling log files.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const SEED_PATH_ENV: &str = "SURVEY_SEED_PATH";
pub const LOG_LEVEL_ENV: &str = "SURVEY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SURVEY_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Seed document; `None` starts with an empty repository.
    pub seed_path: Option<PathBuf>,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, for callers that carry
    /// their own variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            seed_path: read(SEED_PATH_ENV).map(PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV),
        }
    }

    /// Overrides the seed path, e.g. from a command-line argument.
    pub fn with_seed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }
}
