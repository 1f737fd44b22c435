// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              AppError (boxed, small on the stack)
//!                     |
//!       +--------+----+-----+--------+
//!       v        v          v        v
//!    Bailed   Process    Config     Io
//!     Box<str>  Box        Box       Box
//!
//! ProcessError (library surface, typed)
//!   NotImplemented   op + platform, never works on this host
//!   SpawnFailed      "fork/exec <path>: <cause>", no child exists
//!   ExecutableNotFound  PATH lookup miss
//!   NoSuchProcess    already reaped / ESRCH
//!   AlreadyWaited    second wait() on one controller
//!   SignalFailed     other kill(2) failures (EPERM, ...)
//!   WaitFailed       other wait failures
//!
//! ConfigError (procctl.toml / PROCCTL_* / --set)
//!   InvalidValue, InvalidOverride
//!
//! Application glue: anyhow::Result with .context()
//! ```

use thiserror::Error;

use crate::core::process::pid::Pid;
use crate::core::process::signal::Signal;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`AppError`].
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Operation name carried by every spawn failure.
pub const FORK_EXEC: &str = "fork/exec";

/// Top-level application error type.
///
/// Sub-errors are boxed to keep this enum small.
#[derive(Debug, Error)]
pub enum AppError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Process spawning or control failed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Create a fatal [`AppError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> AppError {
    AppError::Bailed(message.into().into_boxed_str())
}

/// Generates `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for AppError {
                fn from(err: $error) -> Self {
                    AppError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Process Errors ---

/// Process spawning and control errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The operation has not been ported to this platform.
    #[error("{op}: not implemented on {platform}")]
    NotImplemented {
        op: &'static str,
        platform: &'static str,
    },

    /// The child could not be created. No process was left behind.
    #[error("{op} {path}: {source}")]
    SpawnFailed {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// The process was already reaped or never existed.
    #[error("process {pid}: no such process")]
    NoSuchProcess { pid: Pid },

    /// `wait` already produced a state for this controller.
    #[error("process {pid}: already waited")]
    AlreadyWaited { pid: Pid },

    /// The OS refused to deliver a signal for a reason other than ESRCH.
    #[error("failed to send {signal} to process {pid}: {source}")]
    SignalFailed {
        pid: Pid,
        signal: Signal,
        #[source]
        source: std::io::Error,
    },

    /// The OS wait primitive failed for a reason other than ECHILD.
    #[error("failed to wait for process {pid}: {source}")]
    WaitFailed {
        pid: Pid,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Builds the contextual spawn error: operation, subject path, cause.
    pub fn spawn_failed(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            op: FORK_EXEC,
            path: path.display().to_string(),
            source,
        }
    }

    /// Builds a [`ProcessError::NotImplemented`] for the running platform.
    #[must_use]
    pub const fn not_implemented(op: &'static str) -> Self {
        Self::NotImplemented {
            op,
            platform: std::env::consts::OS,
        }
    }

    /// Returns true if this is a [`ProcessError::NotImplemented`].
    #[must_use]
    pub const fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    /// Returns true if the target process no longer exists.
    #[must_use]
    pub const fn is_no_such_process(&self) -> bool {
        matches!(self, Self::NoSuchProcess { .. })
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// A `--set` entry that is not `section.key=value`.
    #[error("invalid option '{option}', expected section.key=value")]
    InvalidOverride { option: String },
}
