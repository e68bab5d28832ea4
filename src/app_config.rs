use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::formats::SubtitleFormat;
use crate::style_engine::StyleOptions;
use crate::theme::{DEFAULT_THEME_NAME, Theme, ThemeRegistry, VerticalPosition};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Styling applied when the caller does not ask for anything else
    #[serde(default)]
    pub style: StyleDefaults,

    /// Custom themes, registered over the built-in catalogue
    #[serde(default)]
    pub themes: Vec<Theme>,

    /// Folder conversion settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Default styling options
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleDefaults {
    /// Theme used when none is requested
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Font size override
    #[serde(default)]
    pub font_size: Option<u32>,

    /// Vertical position override
    #[serde(default)]
    pub position: Option<VerticalPosition>,

    /// Whether to draw a background box
    #[serde(default)]
    pub add_background: bool,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: None,
            position: None,
            add_background: false,
        }
    }
}

impl StyleDefaults {
    /// Fill unset fields of `options` from these defaults
    pub fn merge_into(&self, options: &StyleOptions) -> StyleOptions {
        StyleOptions {
            theme: options.theme.clone().or_else(|| Some(self.theme.clone())),
            font_size: options.font_size.or(self.font_size),
            position: options.position.or(self.position),
            add_background: options.add_background.or(Some(self.add_background)),
        }
    }
}

/// Folder conversion settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Files converted at the same time
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Target format when none is given on the command line
    #[serde(default = "default_output_format")]
    pub default_output_format: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrent_files: default_concurrent_files(),
            default_output_format: default_output_format(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_theme() -> String {
    DEFAULT_THEME_NAME.to_string()
}

fn default_concurrent_files() -> usize {
    4
}

fn default_output_format() -> String {
    "srt".to_string()
}

impl Config {
    /// Load the configuration file, or create it with defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load the configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Theme registry holding the built-ins plus the configured themes
    pub fn theme_registry(&self) -> Result<ThemeRegistry> {
        ThemeRegistry::with_themes(&self.themes).context("Invalid custom theme")
    }

    /// Target format used by folder conversion when none is given
    pub fn default_output_format(&self) -> Result<SubtitleFormat> {
        Ok(SubtitleFormat::from_name(&self.batch.default_output_format)?)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.theme_registry()?
            .get(&self.style.theme)
            .context("Default theme is not available")?;

        if self.style.font_size == Some(0) {
            return Err(anyhow!("Default font size must be positive"));
        }

        self.default_output_format()
            .context("Invalid default output format")?;

        if self.batch.concurrent_files == 0 {
            return Err(anyhow!("batch.concurrent_files must be at least 1"));
        }

        Ok(())
    }
}
