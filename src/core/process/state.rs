// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Snapshot of a terminated process.
//!
//! ```text
//! ProcessState (created once by wait(), never mutated)
//!   pid, status, user_time, system_time
//!
//! ExitStatus
//!   Exited   { code }                 "exit status 3"
//!   Signaled { signal, core_dumped }  "signal: killed (core dumped)"
//! ```

use std::time::Duration;

use serde::Serialize;

use super::pid::Pid;
use super::signal::Signal;

/// How a process terminated, as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitStatus {
    /// The process called `exit` (or returned from `main`).
    Exited { code: i32 },
    /// The process was terminated by a signal it did not handle.
    Signaled { signal: i32, core_dumped: bool },
}

/// Immutable record of a reaped process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessState {
    pid: Pid,
    status: ExitStatus,
    user_time: Duration,
    system_time: Duration,
}

impl ProcessState {
    pub(crate) const fn new(
        pid: Pid,
        status: ExitStatus,
        user_time: Duration,
        system_time: Duration,
    ) -> Self {
        Self {
            pid,
            status,
            user_time,
            system_time,
        }
    }

    #[must_use]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    #[must_use]
    pub const fn status(&self) -> ExitStatus {
        self.status
    }

    /// Returns true if the process exited with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, ExitStatus::Exited { code: 0 })
    }

    /// Returns true if the process exited on its own rather than by a signal.
    #[must_use]
    pub const fn exited(&self) -> bool {
        matches!(self.status, ExitStatus::Exited { .. })
    }

    /// Exit code, or `None` if the process was terminated by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self.status {
            ExitStatus::Exited { code } => Some(code),
            ExitStatus::Signaled { .. } => None,
        }
    }

    /// Exit code, or `-1` when the process was terminated by a signal.
    #[must_use]
    pub const fn exit_code_or_sentinel(&self) -> i32 {
        match self.exit_code() {
            Some(code) => code,
            None => -1,
        }
    }

    /// Raw number of the terminating signal, if any.
    #[must_use]
    pub const fn signal_number(&self) -> Option<i32> {
        match self.status {
            ExitStatus::Signaled { signal, .. } => Some(signal),
            ExitStatus::Exited { .. } => None,
        }
    }

    /// Terminating signal, if it is one [`Signal`] knows about.
    #[must_use]
    pub fn signal(&self) -> Option<Signal> {
        self.signal_number().and_then(Signal::from_number)
    }

    /// CPU time spent in user mode.
    #[must_use]
    pub const fn user_time(&self) -> Duration {
        self.user_time
    }

    /// CPU time spent in the kernel on behalf of the process.
    #[must_use]
    pub const fn system_time(&self) -> Duration {
        self.system_time
    }

    /// Human-readable summary, same text as `Display`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            ExitStatus::Exited { code } => write!(f, "exit status {code}"),
            ExitStatus::Signaled {
                signal,
                core_dumped,
            } => {
                match Signal::from_number(signal) {
                    Some(known) => write!(f, "signal: {known}")?,
                    None => write!(f, "signal: signal {signal}")?,
                }
                if core_dumped {
                    f.write_str(" (core dumped)")?;
                }
                Ok(())
            }
        }
    }
}
