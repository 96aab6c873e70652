//! Configuration management.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::TraitPath;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Trait loaded from a docs directory when none is configured.
pub const DEFAULT_TRAIT_PATH: &str = "core::ops::deref::DerefMut";

/// Default `EnvFilter` directive for the application shell.
pub const DEFAULT_LOG_FILTER: &str = "info,implementors=debug";

/// Main application configuration.
///
/// This is loaded from `~/.config/implementors/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where implementor tables come from
    pub source: SourceConfig,
    /// Registration host behavior
    pub host: HostConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, falling back to defaults if
    /// it doesn't exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `IMPLEMENTORS_DOCS_DIR`: Override the generated docs directory
    /// - `IMPLEMENTORS_DEFER_HOST`: Override deferred host registration (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("IMPLEMENTORS_DOCS_DIR") {
            if val.is_empty() {
                self.source.docs_dir = None;
            } else {
                tracing::debug!("Override source.docs_dir from env: {}", val);
                self.source.docs_dir = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("IMPLEMENTORS_DEFER_HOST") {
            if let Ok(defer) = val.parse() {
                self.host.defer_registration = defer;
                tracing::debug!("Override host.defer_registration from env: {}", defer);
            }
        }
    }

    /// Check cross-field constraints serde can't express.
    pub fn validate(&self) -> ConfigResult<()> {
        TraitPath::new(self.source.trait_path.clone()).map_err(|e| {
            ConfigError::InvalidValue {
                field: "source.trait_path".to_string(),
                reason: e.to_string(),
            }
        })?;

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter".to_string(),
                reason: "filter cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/implementors/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "implementors", "implementors")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Source of implementor tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Generated `implementors/` directory; the embedded table is used when unset
    pub docs_dir: Option<PathBuf>,
    /// Trait to load from `docs_dir`
    pub trait_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            docs_dir: None,
            trait_path: DEFAULT_TRAIT_PATH.to_string(),
        }
    }
}

/// Registration host settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Start without a host so the registry lands in the pending slot
    pub defer_registration: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
