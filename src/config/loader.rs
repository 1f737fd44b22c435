// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered loading.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("procctl.toml")
//!   .add_toml_file(--config)          repeatable, must exist
//!   .with_env_prefix("PROCCTL")       PROCCTL_RUN__TIMEOUT_SECS
//!   .apply_overrides(--set, -l, ...)  section.key=value
//!        |
//!        v
//!    build() --> deserialize --> resolve_and_validate --> Config
//! ```
//!
//! Later layers win. Environment variables are added in `build()`, after every
//! file but before the overrides, whatever order the builder calls came in.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// Keys read from the environment as comma-separated lists.
const LIST_KEYS: &[&str] = &["run.env"];

/// Where a layer came from, for `procctl configs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A `--config` file. Missing is an error.
    Required(PathBuf),
    /// `procctl.toml`. Only listed when it exists.
    Optional(PathBuf),
    /// TOML passed as a string.
    Inline,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(path) => write!(f, "[file] {}", path.display()),
            Self::Optional(path) => write!(f, "[optional] {}", path.display()),
            Self::Inline => f.write_str("[string] <inline>"),
        }
    }
}

/// Builder for a [`Config`] assembled from several sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    overrides: Vec<(String, String)>,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            overrides: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist when `build()` runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(ConfigSource::Required(path.to_path_buf()));
        self
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        if path.is_file() {
            self.sources.push(ConfigSource::Optional(path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(ConfigSource::Inline);
        self
    }

    /// Reads `PREFIX_SECTION__KEY` variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a single dotted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be parsed as a config path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("invalid config key '{key}'"))?;
        Ok(self)
    }

    /// Queues `section.key=value` (or `section/key=value`) overrides. They are
    /// applied last, above the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOverride` for an entry without `=` or key.
    pub fn apply_overrides<I, S>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for option in overrides {
            let option = option.as_ref();
            let (key, value) = split_override(option).ok_or_else(|| ConfigError::InvalidOverride {
                option: option.to_string(),
            })?;
            self.overrides.push((key, value.to_string()));
        }
        Ok(self)
    }

    /// Merges every layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or malformed, a value
    /// has the wrong type, or validation rejects a value.
    pub fn build(self) -> Result<Config> {
        let mut builder = self.builder;
        if let Some(prefix) = &self.env_prefix {
            let env = LIST_KEYS.iter().fold(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(","),
                |env, key| env.with_list_parse_key(key),
            );
            builder = builder.add_source(env);
        }
        for (key, value) in self.overrides {
            builder = builder
                .set_override(&key, value)
                .with_context(|| format!("invalid config key '{key}'"))?;
        }

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Numbered lines for `procctl configs`.
    #[must_use]
    pub fn format_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits an override into its dotted key and value.
///
/// `section/key=value` and `section.key=value` are both accepted.
#[must_use]
pub fn split_override(option: &str) -> Option<(String, &str)> {
    let (key, value) = option.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.replace('/', "."), value))
}
