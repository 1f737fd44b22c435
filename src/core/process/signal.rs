// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signals deliverable to a child process.
//!
//! ```text
//! Signal (closed set)
//!   Display   "terminated", "killed", ...      (strsignal wording)
//!   name()    "SIGTERM", "SIGKILL", ...
//!   FromStr   SIGTERM | TERM | term | terminated | 15
//!   number()  --> sys: POSIX number, None on Windows
//!
//! Windows delivers Kill (TerminateProcess) and Interrupt (CTRL_BREAK) only;
//! everything else is NotImplemented there.
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::sys;

/// A termination or notification signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Hangup,
    Interrupt,
    Quit,
    Abort,
    /// The strongest termination the host offers. Cannot be caught.
    Kill,
    User1,
    User2,
    Pipe,
    Alarm,
    Terminate,
}

/// Error returned when a signal name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signal '{0}'")]
pub struct ParseSignalError(String);

impl Signal {
    /// Every signal, in POSIX numbering order.
    pub const ALL: [Self; 10] = [
        Self::Hangup,
        Self::Interrupt,
        Self::Quit,
        Self::Abort,
        Self::Kill,
        Self::User1,
        Self::User2,
        Self::Pipe,
        Self::Alarm,
        Self::Terminate,
    ];

    /// Conventional upper-case name, e.g. `SIGTERM`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hangup => "SIGHUP",
            Self::Interrupt => "SIGINT",
            Self::Quit => "SIGQUIT",
            Self::Abort => "SIGABRT",
            Self::Kill => "SIGKILL",
            Self::User1 => "SIGUSR1",
            Self::User2 => "SIGUSR2",
            Self::Pipe => "SIGPIPE",
            Self::Alarm => "SIGALRM",
            Self::Terminate => "SIGTERM",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Hangup => "hangup",
            Self::Interrupt => "interrupt",
            Self::Quit => "quit",
            Self::Abort => "aborted",
            Self::Kill => "killed",
            Self::User1 => "user defined signal 1",
            Self::User2 => "user defined signal 2",
            Self::Pipe => "broken pipe",
            Self::Alarm => "alarm clock",
            Self::Terminate => "terminated",
        }
    }

    /// Host signal number, or `None` where the host has no numbering.
    #[must_use]
    pub fn number(self) -> Option<i32> {
        sys::signal_number(self)
    }

    /// Maps a host signal number back to a [`Signal`].
    #[must_use]
    pub fn from_number(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == Some(raw))
    }

    /// Whether the host can deliver this signal to a child.
    #[must_use]
    pub fn is_supported(self) -> bool {
        sys::signal_supported(self)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl std::str::FromStr for Signal {
    type Err = ParseSignalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(raw) = trimmed.parse::<i32>() {
            return Self::from_number(raw).ok_or_else(|| ParseSignalError(s.to_string()));
        }

        let upper = trimmed.to_ascii_uppercase();
        let short = upper.strip_prefix("SIG").unwrap_or(&upper);

        Self::ALL
            .into_iter()
            .find(|sig| {
                &sig.name()[3..] == short || sig.description().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ParseSignalError(s.to_string()))
    }
}

impl Serialize for Signal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
