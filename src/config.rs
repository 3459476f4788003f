//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/logshift/config.toml` or `$XDG_CONFIG_HOME/logshift/config.toml`)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{Cli, ColorMode};
use crate::error::LogShiftError;

/// Default label prefixed to every replacement offset.
pub const DEFAULT_DURATION_TAG: &str = "(DURATION)";

/// Default suffix appended to the input file name to name the output file.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".Shifted";

/// Settings that shape how stamps are read and rewritten. Fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftConfig {
    /// Label written in front of every formatted offset.
    pub duration_tag: String,
    /// Of the two non-year date components, the left one is the month.
    pub month_first: bool,
    /// With no component above 59, the leading component is the year.
    pub year_first: bool,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            duration_tag: DEFAULT_DURATION_TAG.to_string(),
            month_first: true,
            year_first: true,
        }
    }
}

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults (useful in tests and benchmarks).
#[derive(Debug, Clone)]
pub struct Config {
    pub shift: ShiftConfig,
    /// Color mode for console status text (banner, progress).
    pub color_mode: ColorMode,
    /// Suffix for the derived output file name.
    pub output_suffix: String,
    /// Suppress banner and progress output.
    pub quiet: bool,
    /// Emit debug-level diagnostics.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shift: ShiftConfig::default(),
            color_mode: ColorMode::Auto,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            quiet: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, LogShiftError> {
        let mut config = Self::default();

        let config_path = cli.config.clone().unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            let file_config = FileConfig::load(&config_path)?;
            config.apply_file_config(file_config);
        } else if cli.config.is_some() {
            return Err(LogShiftError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        }

        if let Some(ref tag) = cli.tag {
            config.shift.duration_tag.clone_from(tag);
        }
        if let Some(month_first) = cli.month_first_override() {
            config.shift.month_first = month_first;
        }
        if let Some(year_first) = cli.year_first_override() {
            config.shift.year_first = year_first;
        }
        if let Some(color) = cli.color {
            config.color_mode = color;
        }
        if let Some(ref suffix) = cli.suffix {
            if suffix.is_empty() {
                return Err(LogShiftError::Config(
                    "output suffix must not be empty".to_string(),
                ));
            }
            config.output_suffix.clone_from(suffix);
        }

        config.quiet = cli.quiet;
        config.verbose = cli.verbose;

        Ok(config)
    }

    /// Default config file path: `$XDG_CONFIG_HOME/logshift/config.toml` or `~/.config/logshift/config.toml`.
    fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("logshift").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("logshift")
                .join("config.toml")
        } else {
            PathBuf::from(".config/logshift/config.toml")
        }
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) {
        if let Some(tag) = file.tag {
            self.shift.duration_tag = tag;
        }
        if let Some(month_first) = file.month_first {
            self.shift.month_first = month_first;
        }
        if let Some(year_first) = file.year_first {
            self.shift.year_first = year_first;
        }
        if let Some(suffix) = file.suffix
            && !suffix.is_empty()
        {
            self.output_suffix = suffix;
        }
        if let Some(color) = file.color {
            self.color_mode = match color.as_str() {
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                _ => ColorMode::Auto,
            };
        }
    }

    /// Output path derived from the input path: `app.log` → `app.log.Shifted`.
    pub fn derived_output_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(&self.output_suffix);
        PathBuf::from(name)
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    tag: Option<String>,
    month_first: Option<bool>,
    year_first: Option<bool>,
    suffix: Option<String>,
    color: Option<String>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, LogShiftError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LogShiftError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
