//! Runtime settings for the CLI and embedding applications.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::history::DEFAULT_HISTORY_LIMIT;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Settings loaded from an optional TOML file plus `SITEWATCH_*` environment
/// variables (environment wins).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Maximum history entries kept per monitor.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Default analytics window in hours; `None` covers the full history.
    #[serde(default)]
    pub window_hours: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            window_hours: None,
        }
    }
}

impl Settings {
    /// Load settings, layering defaults, the optional file, and environment
    /// variables (e.g. `SITEWATCH_HISTORY_LIMIT=500`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("SITEWATCH"));

        let config = builder.build().context("failed to load settings")?;
        config.try_deserialize().context("invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(settings.window_hours, None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "history_limit = 42\nwindow_hours = 24").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.history_limit, 42);
        assert_eq!(settings.window_hours, Some(24));
    }
}
