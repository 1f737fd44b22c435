// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for procctl.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. procctl.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. PROCCTL_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! PROCCTL_GLOBAL__OUTPUT_LOG_LEVEL=4  → global.output_log_level = 4
//! PROCCTL_RUN__TIMEOUT_SECS=30        → run.timeout_secs = 30
//! PROCCTL_RUN__ENV=A=1,B=2            → run.env = ["A=1", "B=2"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::env::split_entry;
use crate::error::Result;

use loader::ConfigLoader;
use types::{GlobalConfig, RunConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Defaults for `procctl run`.
    pub run: RunConfig,
}

impl Config {
    /// Starts a layered load.
    ///
    /// ```no_run
    /// use procctl::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("procctl.toml")
    ///     .with_env_prefix("PROCCTL")
    ///     .apply_overrides(["run.timeout_secs=30"])?
    ///     .build()?;
    /// assert!(config.run.timeout().is_some());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Loads one TOML file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or a value fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// # Errors
    ///
    /// Same as [`Config::from_file`].
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown `run.stop_signal` or a malformed
    /// `run.env` entry.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.run.stop_signal()?;
        self.run.validate_env()?;
        Ok(())
    }

    /// `section.key = value` lines for `procctl options`, sorted by key.
    ///
    /// `run.env` lists only the variable names, never their values.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, fields) in sections {
                let serde_json::Value::Object(fields) = fields else {
                    continue;
                };
                for (key, value) in fields {
                    let key = format!("{section}.{key}");
                    let shown = if key == "run.env" {
                        self.env_keys()
                    } else {
                        render_value(&value)
                    };
                    options.insert(key, shown);
                }
            }
        }

        let width = options.keys().map(String::len).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| format!("{key:<width$} = {value}"))
            .collect()
    }

    fn env_keys(&self) -> String {
        let keys: Vec<&str> = self
            .run
            .env
            .iter()
            .filter_map(|entry| split_entry(entry).map(|(key, _)| key))
            .collect();
        format!("[{}]", keys.join(", "))
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
