// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross-platform process spawning and control.
//!
//! ```text
//! start("/bin/sh", ["sh", "-c", "exit 3"], &ProcAttr::new().dir("/tmp"))
//!   --> Process { pid, lifecycle: Running }
//!         .signal(Signal::Terminate) / .kill()
//!         .wait()  --> ProcessState "exit status 3"
//!         .wait()  --> AlreadyWaited
//!
//! wait_timeout(Arc<Process>, timeout, StopPolicy, CancellationToken)  (async)
//! current_pid() / parent_pid()  --> Pid (UNAVAILABLE = -1 when unsupported)
//! ```

pub mod attr;
pub mod controller;
pub mod handle;
pub mod pid;
pub mod signal;
pub mod spawn;
pub mod state;
pub mod supervise;
mod sys;

#[cfg(test)]
mod tests;

pub use attr::ProcAttr;
pub use controller::{Lifecycle, Process};
pub use handle::{InheritedHandle, RawDescriptor};
pub use pid::{Pid, current_pid, parent_pid};
pub use signal::{ParseSignalError, Signal};
pub use spawn::{lookup_path, start};
pub use state::{ExitStatus, ProcessState};
pub use supervise::{StopPolicy, WaitOutcome, wait_timeout};
pub use sys::SysAttributes;
