//! Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

/// Configuration for the todo store binary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// JSON file the store is persisted to
    pub data_file: PathBuf,

    /// Directory one-shot exports are written into
    pub export_dir: PathBuf,

    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("todos.json"),
            export_dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration persisting to `data_file`
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            ..Default::default()
        }
    }

    /// Load configuration from file, environment variables, or defaults
    pub fn load() -> crate::Result<Self> {
        if let Ok(config_path) = env::var("TODO_STORE_CONFIG") {
            info!("Loading config from TODO_STORE_CONFIG: {}", config_path);
            return Self::from_file(&config_path);
        }

        let default_paths = [
            "todo-store.yaml",
            "todo-store.toml",
            "config/todo-store.yaml",
            "config/todo-store.toml",
        ];

        for path in default_paths {
            if Path::new(path).exists() {
                info!("Loading config from: {}", path);
                return Self::from_file(path);
            }
        }

        if let Some(config) = Self::from_env()? {
            info!("Loaded config from environment variables");
            return Ok(config);
        }

        warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a file (YAML or TOML, extension optional)
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| {
                crate::TodoStoreError::ConfigError(format!("Failed to load config file: {}", e))
            })?;

        let config: Config = settings.try_deserialize().map_err(|e| {
            crate::TodoStoreError::ConfigError(format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `TODO_STORE_*` environment variables.
    ///
    /// Returns `Ok(None)` when none of them is set.
    pub fn from_env() -> crate::Result<Option<Self>> {
        let mut config = Self::default();
        let mut found_any = false;

        if let Ok(val) = env::var("TODO_STORE_DATA_FILE") {
            config.data_file = PathBuf::from(val);
            found_any = true;
        }

        if let Ok(val) = env::var("TODO_STORE_EXPORT_DIR") {
            config.export_dir = PathBuf::from(val);
            found_any = true;
        }

        if let Ok(val) = env::var("TODO_STORE_LOG_LEVEL") {
            config.log_level = val;
            found_any = true;
        }

        if !found_any {
            return Ok(None);
        }

        config.validate()?;
        Ok(Some(config))
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(crate::TodoStoreError::ConfigError(
                "Data file path must not be empty".to_string(),
            ));
        }

        self.level()?;
        Ok(())
    }

    /// Parsed log level
    pub fn level(&self) -> crate::Result<Level> {
        self.log_level.parse::<Level>().map_err(|_| {
            crate::TodoStoreError::ConfigError(format!("Invalid log level: {}", self.log_level))
        })
    }
}
