// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process identity.
//!
//! ```text
//! Pid(i32)   OS-assigned, unique only while the process lives
//! Pid::UNAVAILABLE (-1)   host cannot answer the query
//!
//! current_pid() / parent_pid()  --> sys (getpid/getppid, std::process::id)
//! ```

use serde::Serialize;

use super::sys;

/// An OS process identifier.
///
/// Identifiers are recycled once a process has been reaped, so a `Pid` must not
/// outlive the [`Process`](super::controller::Process) it came from as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pid(i32);

impl Pid {
    /// Sentinel returned when the host does not support an identity query.
    pub const UNAVAILABLE: Self = Self(-1);

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Converts an unsigned identifier (as returned by `std::process`).
    #[must_use]
    pub fn from_u32(raw: u32) -> Self {
        i32::try_from(raw).map_or(Self::UNAVAILABLE, Self)
    }

    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Returns false for [`Pid::UNAVAILABLE`].
    #[must_use]
    pub const fn is_available(self) -> bool {
        self.0 >= 0
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the calling process, or [`Pid::UNAVAILABLE`].
#[must_use]
pub fn current_pid() -> Pid {
    sys::current_pid()
}

/// Identifier of the calling process's parent, or [`Pid::UNAVAILABLE`] where the
/// host cannot report it.
#[must_use]
pub fn parent_pid() -> Pid {
    sys::parent_pid()
}
