// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform backends.
//!
//! ```text
//!            sys
//!   +---------+-----------+
//!   v         v           v
//!  unix    windows    unsupported
//!  fork/execve        every operation
//!  + dup2, error pipe NotImplemented,
//!  waitid/wait4       ids UNAVAILABLE
//!  kill(2)
//!            \        /
//!     std Command + HANDLE
//!     WaitForSingleObject
//!     TerminateProcess / CTRL_BREAK
//! ```
//!
//! Each backend exports the same surface: `spawn`, `ProcessHandle`
//! (`wait_exited`, `reap`, `send`), `SysAttributes`, identity reads and
//! signal mapping.

/// Re-exports one backend's surface under a common path.
macro_rules! use_backend {
    ($backend:ident) => {
        pub use $backend::SysAttributes;
        pub(crate) use $backend::{
            ProcessHandle, WAITS_WITHOUT_REAPING, current_pid, descriptor_is_open, parent_pid,
            signal_number, signal_supported, spawn,
        };
    };
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use_backend!(unix);

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use_backend!(windows);

#[cfg(not(any(unix, windows)))]
mod unsupported;
#[cfg(not(any(unix, windows)))]
use_backend!(unsupported);
