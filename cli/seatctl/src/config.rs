//! Layered CLI settings.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `settings.toml` in the platform config directory, or the file passed
//!   with `--settings`
//! - `SEATPLAN_*` environment variables
//! - command-line flags (applied by the caller)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "SEATPLAN";

/// Get the config directory path.
fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "seatplan", "seatctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Default output format.
    pub format: OutputFormat,

    /// Include the built-in blocked-seat table unless a plan says otherwise.
    pub builtin_blocked: bool,

    /// Sub-identifier that tags day-program students in the summary.
    pub day_marker: String,
}

impl Settings {
    /// Load settings from every layer.
    ///
    /// An explicit path must exist; the default settings file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some(File::from(path.to_path_buf()).required(true)),
            None => config_dir().map(|dir| File::from(dir.join(SETTINGS_FILE)).required(false)),
        };
        Self::load_from(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(
        file: Option<File<config::FileSourceFile, config::FileFormat>>,
        env: Environment,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("log_level", "warn")?
            .set_default("log_format", "compact")?
            .set_default("format", "table")?
            .set_default("builtin_blocked", true)?
            .set_default("day_marker", "38")?;
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder
            .add_source(env)
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_from(None, env_from(&[])).unwrap();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert_eq!(settings.format, OutputFormat::Table);
        assert!(settings.builtin_blocked);
        assert_eq!(settings.day_marker, "38");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let settings = Settings::load_from(
            None,
            env_from(&[
                ("SEATPLAN_LOG_LEVEL", "debug"),
                ("SEATPLAN_FORMAT", "json"),
                ("SEATPLAN_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/seatctl/settings.toml");
        assert!(Settings::load(Some(missing)).is_err());
    }
}
