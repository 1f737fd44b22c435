// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for procctl.
//!
//! ```text
//! [global]  output_log_level, file_log_level, log_file, log_json
//! [run]     timeout_secs (0 = none), stop_signal, grace_secs (0 = none),
//!           clear_env, env = ["KEY=VALUE", ..]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::env::{EnvPolicy, split_entry};
use crate::core::process::{Signal, StopPolicy};
use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub log_json: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_json: false,
        }
    }
}

/// Defaults for `procctl run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seconds before the child is stopped. 0 waits forever.
    pub timeout_secs: u64,
    /// Signal sent when the timeout elapses.
    pub stop_signal: String,
    /// Seconds between `stop_signal` and a kill. 0 never escalates.
    pub grace_secs: u64,
    /// Start the child with only `env`, not the caller's environment.
    pub clear_env: bool,
    /// `KEY=VALUE` entries added to the child's environment.
    pub env: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            stop_signal: Signal::Kill.name().to_string(),
            grace_secs: 0,
            clear_env: false,
            env: Vec::new(),
        }
    }
}

impl RunConfig {
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        secs_or_none(self.timeout_secs)
    }

    #[must_use]
    pub const fn grace(&self) -> Option<Duration> {
        secs_or_none(self.grace_secs)
    }

    /// Parses `stop_signal`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown signal name.
    pub fn stop_signal(&self) -> Result<Signal, ConfigError> {
        self.stop_signal
            .parse()
            .map_err(|e: crate::core::process::ParseSignalError| ConfigError::InvalidValue {
                section: "run".to_string(),
                key: "stop_signal".to_string(),
                message: e.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown signal name.
    pub fn stop_policy(&self) -> Result<StopPolicy, ConfigError> {
        Ok(StopPolicy {
            signal: self.stop_signal()?,
            grace: self.grace(),
        })
    }

    /// Environment policy for the child.
    ///
    /// `clear_env` with no entries falls back to inheriting, since an empty
    /// replacement list means inherit.
    #[must_use]
    pub fn env_policy(&self) -> EnvPolicy {
        if self.clear_env {
            EnvPolicy::replace(self.env.iter().cloned())
        } else {
            EnvPolicy::overlay(self.env.iter().cloned())
        }
    }

    /// Checks every `env` entry has the `KEY=VALUE` shape.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first malformed entry.
    pub fn validate_env(&self) -> Result<(), ConfigError> {
        match self.env.iter().find(|e| split_entry(e).is_none()) {
            Some(bad) => Err(ConfigError::InvalidValue {
                section: "run".to_string(),
                key: "env".to_string(),
                message: format!("expected KEY=VALUE, got '{bad}'"),
            }),
            None => Ok(()),
        }
    }
}

const fn secs_or_none(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
