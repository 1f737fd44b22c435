// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Windows backend.
//!
//! ```text
//! spawn()        std Command + creation flags --> process HANDLE
//! wait_exited()  WaitForSingleObject(INFINITE)   (handle stays valid)
//! reap()         GetExitCodeProcess + GetProcessTimes
//! send()         Kill      --> TerminateProcess(h, 1)
//!                Interrupt --> CTRL_BREAK_EVENT to the child's group,
//!                              NotImplemented without CREATE_NEW_PROCESS_GROUP
//!                other     --> NotImplemented
//! ```
//!
//! Only descriptor slots 0-2 can be provided; they become the child's
//! standard handles.

use std::ffi::OsStr;
use std::os::windows::io::{AsRawHandle, BorrowedHandle, OwnedHandle};
use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use windows::Win32::Foundation::{
    FILETIME, GetHandleInformation, HANDLE, WAIT_FAILED, WAIT_OBJECT_0,
};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};
use windows::Win32::System::Threading::{
    GetCurrentProcessId, GetExitCodeProcess, GetProcessTimes, INFINITE, TerminateProcess,
    WaitForSingleObject,
};

use crate::core::process::attr::ProcAttr;
use crate::core::process::handle::RawDescriptor;
use crate::core::process::pid::Pid;
use crate::core::process::signal::Signal;
use crate::core::process::state::{ExitStatus, ProcessState};
use crate::error::ProcessError;

/// A process handle can be waited on any number of times.
pub(crate) const WAITS_WITHOUT_REAPING: bool = true;

/// Exit code `GetExitCodeProcess` reports while the process runs.
const STILL_ACTIVE: u32 = 259;

/// Exit code given to a process stopped with [`Signal::Kill`].
const KILLED_EXIT_CODE: u32 = 1;

/// `CREATE_NEW_PROCESS_GROUP`. Without it a CTRL_BREAK would reach every
/// process on the console, this one included.
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Extra attributes understood by the Windows backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysAttributes {
    /// `dwCreationFlags` passed to `CreateProcessW`.
    pub creation_flags: u32,
}

/// Owns the child's process handle.
#[derive(Debug)]
pub(crate) struct ProcessHandle {
    handle: OwnedHandle,
    /// The child leads its own process group and can take CTRL_BREAK.
    own_group: bool,
}

impl ProcessHandle {
    fn raw(&self) -> HANDLE {
        HANDLE(self.handle.as_raw_handle())
    }

    fn exit_code(&self) -> std::io::Result<u32> {
        let mut code = 0u32;
        // SAFETY: the handle is owned by self and `code` is a valid out-pointer.
        unsafe { GetExitCodeProcess(self.raw(), &raw mut code) }
            .map_err(std::io::Error::from)?;
        Ok(code)
    }

    pub(crate) fn wait_exited(&self, pid: Pid) -> Result<(), ProcessError> {
        // SAFETY: the handle is owned by self and outlives the call.
        let event = unsafe { WaitForSingleObject(self.raw(), INFINITE) };
        if event == WAIT_OBJECT_0 {
            Ok(())
        } else if event == WAIT_FAILED {
            Err(ProcessError::WaitFailed {
                pid,
                source: std::io::Error::last_os_error(),
            })
        } else {
            Err(ProcessError::WaitFailed {
                pid,
                source: std::io::Error::other(format!("unexpected wait result {}", event.0)),
            })
        }
    }

    pub(crate) fn reap(&self, pid: Pid) -> Result<ProcessState, ProcessError> {
        self.wait_exited(pid)?;
        let code = self
            .exit_code()
            .map_err(|source| ProcessError::WaitFailed { pid, source })?;

        let (mut created, mut exited, mut kernel, mut user) = (
            FILETIME::default(),
            FILETIME::default(),
            FILETIME::default(),
            FILETIME::default(),
        );
        // SAFETY: all four out-pointers are valid for the duration of the call.
        let times = unsafe {
            GetProcessTimes(
                self.raw(),
                &raw mut created,
                &raw mut exited,
                &raw mut kernel,
                &raw mut user,
            )
        };
        let (user_time, system_time) = if times.is_ok() {
            (duration_from_filetime(user), duration_from_filetime(kernel))
        } else {
            (Duration::ZERO, Duration::ZERO)
        };

        Ok(ProcessState::new(
            pid,
            ExitStatus::Exited {
                code: code.cast_signed(),
            },
            user_time,
            system_time,
        ))
    }

    pub(crate) fn send(&self, pid: Pid, signal: Signal) -> Result<(), ProcessError> {
        let result = match signal {
            // SAFETY: the handle is owned by self.
            Signal::Kill => unsafe { TerminateProcess(self.raw(), KILLED_EXIT_CODE) },
            Signal::Interrupt if !self.own_group => {
                return Err(ProcessError::not_implemented(
                    "interrupt without CREATE_NEW_PROCESS_GROUP",
                ));
            }
            Signal::Interrupt => {
                let group = u32::try_from(pid.as_raw())
                    .map_err(|_| ProcessError::NoSuchProcess { pid })?;
                // SAFETY: GenerateConsoleCtrlEvent takes plain integers.
                unsafe { GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, group) }
            }
            _ => return Err(ProcessError::not_implemented("signal")),
        };

        result.map_err(|e| {
            if self.exit_code().is_ok_and(|code| code != STILL_ACTIVE) {
                ProcessError::NoSuchProcess { pid }
            } else {
                ProcessError::SignalFailed {
                    pid,
                    signal,
                    source: e.into(),
                }
            }
        })
    }
}

pub(crate) fn spawn(
    program: &Path,
    argv: &[&OsStr],
    attr: &ProcAttr,
) -> Result<(Pid, ProcessHandle), ProcessError> {
    let mut command = Command::new(program);

    // CreateProcessW derives argv[0] from the command line; the program path
    // stands in for it.
    if let Some((_, rest)) = argv.split_first() {
        command.args(rest);
    }

    if let Some(dir) = attr.working_dir() {
        command.current_dir(dir);
    }

    attr.environment().apply(&mut command);
    apply_files(&mut command, attr, program)?;
    let flags = attr.sys_attributes().creation_flags;
    command.creation_flags(flags);

    let child = command
        .spawn()
        .map_err(|e| ProcessError::spawn_failed(program, e))?;

    let pid = Pid::from_u32(child.id());
    Ok((
        pid,
        ProcessHandle {
            handle: OwnedHandle::from(child),
            own_group: flags & CREATE_NEW_PROCESS_GROUP != 0,
        },
    ))
}

fn apply_files(command: &mut Command, attr: &ProcAttr, program: &Path) -> Result<(), ProcessError> {
    let files = attr.files();
    if files.is_empty() {
        return Ok(());
    }

    if files.iter().skip(3).any(Option::is_some) {
        return Err(ProcessError::not_implemented("inherit extra handles"));
    }

    for slot in 0..3 {
        let stdio = match files.get(slot).and_then(Option::as_ref) {
            Some(handle) => {
                // SAFETY: validate() checked the handle is open and the caller
                // keeps it alive for the duration of the spawn.
                let borrowed = unsafe { BorrowedHandle::borrow_raw(handle.raw_descriptor()) };
                let owned = borrowed
                    .try_clone_to_owned()
                    .map_err(|e| ProcessError::spawn_failed(program, e))?;
                Stdio::from(owned)
            }
            None => Stdio::null(),
        };
        match slot {
            0 => command.stdin(stdio),
            1 => command.stdout(stdio),
            _ => command.stderr(stdio),
        };
    }

    Ok(())
}

fn duration_from_filetime(ft: FILETIME) -> Duration {
    let ticks = (u64::from(ft.dwHighDateTime) << 32) | u64::from(ft.dwLowDateTime);
    // FILETIME counts 100ns intervals.
    Duration::from_nanos(ticks.saturating_mul(100))
}

/// Windows has no signal numbers; the POSIX ones are used for naming only.
#[allow(clippy::unnecessary_wraps)]
pub(crate) const fn signal_number(signal: Signal) -> Option<i32> {
    Some(match signal {
        Signal::Hangup => 1,
        Signal::Interrupt => 2,
        Signal::Quit => 3,
        Signal::Abort => 6,
        Signal::Kill => 9,
        Signal::User1 => 10,
        Signal::User2 => 12,
        Signal::Pipe => 13,
        Signal::Alarm => 14,
        Signal::Terminate => 15,
    })
}

pub(crate) const fn signal_supported(signal: Signal) -> bool {
    matches!(signal, Signal::Kill | Signal::Interrupt)
}

pub(crate) fn current_pid() -> Pid {
    // SAFETY: GetCurrentProcessId has no preconditions.
    Pid::from_u32(unsafe { GetCurrentProcessId() })
}

/// Windows does not track the parent cheaply.
pub(crate) const fn parent_pid() -> Pid {
    Pid::UNAVAILABLE
}

pub(crate) fn descriptor_is_open(handle: RawDescriptor) -> bool {
    let mut flags = 0u32;
    // SAFETY: GetHandleInformation fails cleanly on invalid handles.
    unsafe { GetHandleInformation(HANDLE(handle), &raw mut flags) }.is_ok()
}
