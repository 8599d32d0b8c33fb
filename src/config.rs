//! Configuration module for `malla`

use crate::core::store::validate_storage_key;
use crate::error::{MallaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$MALLA";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const CONFIG_KEYS: [&str; 7] = [
    "level",
    "file",
    "verbose",
    "curriculum",
    "data_dir",
    "reports_dir",
    "storage_key",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Curriculum file used when `--curriculum` is not given
    #[serde(default)]
    pub curriculum: String,
    /// Directory holding persisted progress
    #[serde(default)]
    pub data_dir: String,
    /// Directory for rendered HTML maps
    #[serde(default)]
    pub reports_dir: String,
}

/// Progress storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Key the Completed-set is stored under
    #[serde(default)]
    pub storage_key: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Progress storage settings
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override curriculum file
    pub curriculum: Option<String>,
    /// Override progress directory
    pub data_dir: Option<String>,
    /// Override reports directory
    pub reports_dir: Option<String>,
    /// Override storage key
    pub storage_key: Option<String>,
}

impl Config {
    /// Get the `$MALLA` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/malla`
    /// - macOS: `~/Library/Application Support/malla`
    /// - Windows: `%APPDATA%\malla`
    #[must_use]
    pub fn get_malla_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("malla")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_malla_dir().join(CONFIG_FILE_NAME)
    }

    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let malla_dir = Self::get_malla_dir();
            value.replace(DIR_VARIABLE, &malla_dir.to_string_lossy())
        } else {
            value.to_string()
        }
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` change, so
    /// upgrading adds new settings without touching user choices.
    ///
    /// # Returns
    /// `true` if any field was filled in
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        let pairs: [(&mut String, &String); 6] = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.curriculum, &defaults.paths.curriculum),
            (&mut self.paths.data_dir, &defaults.paths.data_dir),
            (&mut self.paths.reports_dir, &defaults.paths.reports_dir),
            (&mut self.progress.storage_key, &defaults.progress.storage_key),
        ];
        for (value, default) in pairs {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Initialize config from a TOML string, expanding `$MALLA` in values
    ///
    /// Missing fields use their serde defaults (empty strings or false).
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the schema
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.curriculum = Self::expand_variables(&config.paths.curriculum);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from the compiled-in defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML.
    /// The defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it on first run
    ///
    /// Falls back to defaults if the file exists but cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from `config_file`
    ///
    /// - Existing file: parsed, missing fields merged from defaults and written back
    /// - Missing file: defaults are written to it and returned
    /// - Unreadable or invalid file: defaults are returned, the file is left alone
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save_to(config_file);
            return defaults;
        }

        let Ok(content) = fs::read_to_string(config_file) else {
            return defaults;
        };
        match Self::from_toml(&content) {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save_to(config_file);
                }
                config
            }
            Err(_) => defaults,
        }
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to `config_file`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails
    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).map_err(|e| MallaError::io(parent, e))?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| MallaError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(config_file, toml_str).map_err(|e| MallaError::io(config_file, e))
    }

    /// Get a configuration value by key
    ///
    /// Keys are listed in [`CONFIG_KEYS`]; dashes are accepted in place of
    /// underscores (`data-dir`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "curriculum" => Some(self.paths.curriculum.clone()),
            "data_dir" => Some(self.paths.data_dir.clone()),
            "reports_dir" => Some(self.paths.reports_dir.clone()),
            "storage_key" => Some(self.progress.storage_key.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns [`MallaError::Config`] for unknown keys and invalid values
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "level" => {
                if crate::logger::Level::parse(value).is_none() {
                    return Err(MallaError::Config(format!(
                        "Invalid log level '{value}' (expected error, warn, info or debug)"
                    )));
                }
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value.parse::<bool>().map_err(|_| {
                    MallaError::Config(format!("Invalid boolean value for 'verbose': '{value}'"))
                })?;
            }
            "curriculum" => self.paths.curriculum = Self::expand_variables(value),
            "data_dir" => self.paths.data_dir = Self::expand_variables(value),
            "reports_dir" => self.paths.reports_dir = Self::expand_variables(value),
            "storage_key" => {
                validate_storage_key(value)?;
                self.progress.storage_key = value.to_string();
            }
            _ => return Err(MallaError::Config(format!("Unknown config key: '{key}'"))),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// # Errors
    /// Returns [`MallaError::Config`] if the key is not recognized
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<()> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "curriculum" => self.paths.curriculum.clone_from(&defaults.paths.curriculum),
            "data_dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "reports_dir" => self.paths.reports_dir.clone_from(&defaults.paths.reports_dir),
            "storage_key" => self
                .progress
                .storage_key
                .clone_from(&defaults.progress.storage_key),
            _ => return Err(MallaError::Config(format!("Unknown config key: '{key}'"))),
        }
        Ok(())
    }

    /// Apply CLI overrides on top of the loaded values
    ///
    /// # Errors
    /// Returns [`MallaError::Config`] if the storage key override is not a
    /// valid key; nothing is changed in that case
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(key) = &overrides.storage_key {
            validate_storage_key(key)?;
        }
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(curriculum) = &overrides.curriculum {
            self.paths.curriculum = Self::expand_variables(curriculum);
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir = Self::expand_variables(data_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir = Self::expand_variables(reports_dir);
        }
        if let Some(key) = &overrides.storage_key {
            self.progress.storage_key.clone_from(key);
        }
        Ok(())
    }

    /// Delete the user config file so the next [`load()`](Config::load) recreates it
    ///
    /// Succeeds without doing anything if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<()> {
        Self::reset_at(&Self::get_config_file_path())
    }

    /// Delete the config file at `config_file`, if present
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset_at(config_file: &Path) -> Result<()> {
        if config_file.exists() {
            fs::remove_file(config_file).map_err(|e| MallaError::io(config_file, e))?;
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  curriculum = \"{}\"", self.paths.curriculum)?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[progress]")?;
        writeln!(f, "  storage_key = \"{}\"", self.progress.storage_key)?;

        Ok(())
    }
}
