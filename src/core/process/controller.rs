// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handle to a started child.
//!
//! ```text
//!            start()
//!   Created ---------> Running --wait()--> Exited  (exit code)
//!   (inside start)        |          \--> Killed  (terminated by a signal)
//!                         |
//!                 signal()/kill()  ok while Running
//!                                  NoSuchProcess once reaped
//!
//! wait():  claim flag (AtomicBool)   second call --> AlreadyWaited
//!          wait_exited()             blocks, lock NOT held (Linux, Windows)
//!          write lock + reap()       non-blocking once exited
//! signal(): read lock, refuse if reaped, send
//! ```
//!
//! The lock makes sure a signal is never sent to a PID that has already been
//! reaped and possibly reused. On Unix hosts without `waitid(WNOWAIT)` the
//! reap itself blocks, so it happens outside the lock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, trace};

use super::pid::Pid;
use super::signal::Signal;
use super::state::{ExitStatus, ProcessState};
use super::sys::{self, ProcessHandle};
use crate::error::ProcessError;

/// Observable lifecycle of a [`Process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Started and not yet reaped.
    Running,
    /// Reaped after exiting on its own.
    Exited,
    /// Reaped after being terminated by a signal.
    Killed,
}

impl Lifecycle {
    /// True once the process has been reaped.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    const fn from_state(state: &ProcessState) -> Self {
        match state.status() {
            ExitStatus::Exited { .. } => Self::Exited,
            ExitStatus::Signaled { .. } => Self::Killed,
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Killed => "killed",
        })
    }
}

/// A child started by [`start`](super::spawn::start).
///
/// `Process` is `Send + Sync`; share it with an `Arc` to signal it from one
/// thread while another waits. Dropping it does not kill the child.
#[derive(Debug)]
pub struct Process {
    pid: Pid,
    program: PathBuf,
    handle: ProcessHandle,
    lifecycle: RwLock<Lifecycle>,
    wait_claimed: AtomicBool,
}

impl Process {
    pub(super) fn new(pid: Pid, program: PathBuf, handle: ProcessHandle) -> Self {
        Self {
            pid,
            program,
            handle,
            lifecycle: RwLock::new(Lifecycle::Running),
            wait_claimed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    /// The path the child was started from.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        *self.read_lifecycle()
    }

    /// Blocks until the child exits, then reaps it and returns its state.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::AlreadyWaited`] if `wait` was already called on this
    ///   controller, including from another thread that is still blocked.
    /// - [`ProcessError::NoSuchProcess`] if the child was reaped elsewhere.
    /// - [`ProcessError::WaitFailed`] for any other OS failure; the claim is
    ///   released so the call may be retried.
    pub fn wait(&self) -> Result<ProcessState, ProcessError> {
        if self.wait_claimed.swap(true, Ordering::AcqRel) {
            return Err(ProcessError::AlreadyWaited { pid: self.pid });
        }

        match self.wait_and_reap() {
            Ok(state) => {
                trace!(pid = %self.pid, status = %state, "reaped");
                Ok(state)
            }
            Err(e @ ProcessError::NoSuchProcess { .. }) => {
                *self.write_lifecycle() = Lifecycle::Exited;
                Err(e)
            }
            Err(e) => {
                self.wait_claimed.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn wait_and_reap(&self) -> Result<ProcessState, ProcessError> {
        if sys::WAITS_WITHOUT_REAPING {
            self.handle.wait_exited(self.pid)?;
            let mut lifecycle = self.write_lifecycle();
            let state = self.handle.reap(self.pid)?;
            *lifecycle = Lifecycle::from_state(&state);
            Ok(state)
        } else {
            let state = self.handle.reap(self.pid)?;
            *self.write_lifecycle() = Lifecycle::from_state(&state);
            Ok(state)
        }
    }

    /// Forces the child to stop. Same as `signal(Signal::Kill)`.
    ///
    /// # Errors
    ///
    /// See [`Process::signal`].
    pub fn kill(&self) -> Result<(), ProcessError> {
        self.signal(Signal::Kill)
    }

    /// Sends `signal` to the child. Never blocks on the child.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::NoSuchProcess`] once the child has been reaped.
    /// - [`ProcessError::NotImplemented`] if the host cannot express `signal`.
    /// - [`ProcessError::SignalFailed`] if the OS refuses delivery.
    pub fn signal(&self, signal: Signal) -> Result<(), ProcessError> {
        let lifecycle = self.read_lifecycle();
        if lifecycle.is_terminal() {
            return Err(ProcessError::NoSuchProcess { pid: self.pid });
        }

        self.handle.send(self.pid, signal)?;
        debug!(pid = %self.pid, signal = signal.name(), "signal sent");
        Ok(())
    }

    fn read_lifecycle(&self) -> RwLockReadGuard<'_, Lifecycle> {
        self.lifecycle.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lifecycle(&self) -> RwLockWriteGuard<'_, Lifecycle> {
        self.lifecycle.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        let lifecycle = *self.lifecycle.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !lifecycle.is_terminal() && !*self.wait_claimed.get_mut() {
            debug!(
                pid = %self.pid,
                program = %self.program.display(),
                "dropping un-waited process; child keeps running"
            );
        }
    }
}
