//! Configuration management and validation.
//!
//! Provides the run configuration for the importer: store location, audit
//! log directory, batching and progress settings. Values are layered from
//! defaults, an optional TOML file, environment variables and finally the
//! command line.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BATCH_SIZE, DEFAULT_DATABASE_PATH,
    DEFAULT_LOG_DIR, DEFAULT_PROGRESS_INTERVAL, ENV_BATCH_SIZE, ENV_DATABASE_PATH, ENV_LOG_DIR,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How the relational schema is prepared before an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Drop all importer tables and create them afresh
    #[default]
    Recreate,
    /// Keep existing tables and rows, creating only what is missing
    Preserve,
}

/// Importer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Directory receiving the per-run audit log
    pub log_dir: PathBuf,

    /// Successfully processed rows per committed transaction
    pub batch_size: usize,

    /// Processed rows between progress snapshots
    pub progress_interval: usize,

    /// Schema preparation before the run
    pub schema_mode: SchemaMode,

    /// Show a console progress bar
    pub show_progress: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            schema_mode: SchemaMode::default(),
            show_progress: true,
        }
    }
}

impl ImportConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_schema_mode(mut self, mode: SchemaMode) -> Self {
        self.schema_mode = mode;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Default config file location: `<user config dir>/flight-importer/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a configuration from TOML text; absent keys keep their defaults
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_parse(origin, e))
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Load defaults, then the config file, then environment overrides
    ///
    /// Without an explicit file the default location is used when it exists.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let default_file = match config_file {
            Some(_) => None,
            None => Self::default_config_path().ok().filter(|path| path.is_file()),
        };

        let mut config = match config_file.or(default_file.as_deref()) {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            debug!("{} overrides database path: {}", ENV_DATABASE_PATH, path);
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            debug!("{} overrides log directory: {}", ENV_LOG_DIR, dir);
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            self.batch_size = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_BATCH_SIZE, raw
                ))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::configuration(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.progress_interval == 0 {
            return Err(Error::configuration(
                "Progress interval must be greater than 0".to_string(),
            ));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(Error::configuration(
                "Database path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
