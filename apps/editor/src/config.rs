//! # Editor Configuration
//!
//! Where the catalog lives and how much the editor logs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CATALOG_DB_PATH=/srv/catalog.db                                    │
//! │     CATALOG_DB_MAX_CONNECTIONS=4                                       │
//! │     CATALOG_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/catalog-editor/editor.toml (Linux)                       │
//! │     ~/Library/Application Support/com.catalog.editor/editor.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     catalog.db in the platform data directory                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # editor.toml
//! [database]
//! path = "/home/me/catalog.db"   # ":memory:" for a throwaway catalog
//! max_connections = 5
//! acquire_timeout_secs = 30
//!
//! [logging]
//! filter = "info,catalog=debug,sqlx=warn"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use catalog_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Path value that selects an in-memory catalog.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,catalog=debug,sqlx=warn";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range or a required path cannot be resolved.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

/// Storage location and pool sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` resolves to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Editor Config
// =============================================================================

/// Where a loaded configuration came from.
///
/// Loading runs before tracing is initialized, so it records what it did
/// here and [`ConfigSource::log`] reports it once a subscriber exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    /// Config file that was read, if any.
    pub file: Option<PathBuf>,
    /// Config file that was looked for but not found.
    pub missing_file: Option<PathBuf>,
    /// Environment variables that overrode a setting.
    pub env_overrides: Vec<String>,
    /// Environment variables that were set but could not be used.
    pub ignored: Vec<String>,
}

impl ConfigSource {
    pub fn log(&self) {
        match (&self.file, &self.missing_file) {
            (Some(path), _) => info!(?path, "Loaded editor config from file"),
            (None, Some(path)) => debug!(?path, "Config file not found, using defaults"),
            (None, None) => debug!("No config file location, using defaults"),
        }
        for key in &self.env_overrides {
            debug!(key = %key, "Setting overridden from environment");
        }
        for key in &self.ignored {
            warn!(key = %key, "Ignoring unusable environment override");
        }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Filled in by [`EditorConfig::load`]; never written to the file.
    #[serde(skip)]
    pub source: ConfigSource,
}

impl EditorConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (editor.toml)
    /// 3. Environment variables
    ///
    /// Nothing is logged here; call `config.source.log()` after tracing is
    /// initialized.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
                config.source.file = Some(path);
            } else {
                config.source.missing_file = Some(path);
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load editor config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Editor config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log filter must not be empty".into()));
        }

        if let Some(ref path) = self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CATALOG_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
            self.source.env_overrides.push("CATALOG_DB_PATH".into());
        }

        if let Some(max) = lookup("CATALOG_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => {
                    self.database.max_connections = n;
                    self.source
                        .env_overrides
                        .push("CATALOG_DB_MAX_CONNECTIONS".into());
                }
                Err(_) => self.source.ignored.push("CATALOG_DB_MAX_CONNECTIONS".into()),
            }
        }

        if let Some(filter) = lookup("CATALOG_LOG") {
            self.logging.filter = filter;
            self.source.env_overrides.push("CATALOG_LOG".into());
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "catalog", "editor")
            .map(|dirs| dirs.config_dir().join("editor.toml"))
    }

    /// Returns the default database path, creating its directory.
    fn default_database_path() -> ConfigResult<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "catalog", "editor").ok_or_else(|| {
            ConfigError::Invalid("Could not determine the platform data directory".into())
        })?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("catalog.db"))
    }

    /// Builds the storage configuration.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        let path = match &self.database.path {
            Some(path) if path.as_os_str() == MEMORY_DATABASE => {
                return Ok(DbConfig::in_memory());
            }
            Some(path) => path.clone(),
            None => Self::default_database_path()?,
        };

        Ok(DbConfig::new(path)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.acquire_timeout_secs)))
    }
}
