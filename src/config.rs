//! Configuration file support for KPAT.
//!
//! This module provides serialization and deserialization of user
//! preferences: the auto-save policy, the active annotation format, history
//! depth, drag threshold, and display options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRAG_THRESHOLD, DEFAULT_MAX_UNDO_STEPS};
use crate::format::AnnotationFormat;
use crate::render::MarkerStyle;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

fn default_app_name() -> String {
    "KPAT".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Save the current image's annotations when navigating away or closing
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,

    /// Format annotations are loaded from and saved to
    #[serde(default)]
    pub annotation_format: AnnotationFormat,

    /// Depth of the undo and redo stacks
    #[serde(default = "default_max_undo_steps")]
    pub max_undo_steps: usize,

    /// Net drag distance in image pixels before a drag counts as a move
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    /// Marker drawn for each landmark
    #[serde(default)]
    pub marker_style: MarkerStyle,

    /// Draw the landmark id next to each marker
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Reference image shown as a placement guide
    #[serde(default)]
    pub reference_image: Option<PathBuf>,
}

fn default_auto_save() -> bool {
    true
}

fn default_max_undo_steps() -> usize {
    DEFAULT_MAX_UNDO_STEPS
}

fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD
}

fn default_show_labels() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            auto_save: default_auto_save(),
            annotation_format: AnnotationFormat::default(),
            max_undo_steps: default_max_undo_steps(),
            drag_threshold: default_drag_threshold(),
            marker_style: MarkerStyle::default(),
            show_labels: default_show_labels(),
            log_level: LogLevel::default(),
            reference_image: None,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "kpat-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("kpat").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("kpat")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load_from(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }

        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(Some(config))
    }

    /// Load configuration from the default path.
    /// Returns `Ok(None)` if there is no config directory or no file in it.
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
