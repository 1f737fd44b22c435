// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fallback for hosts without process support. Every operation reports
//! `NotImplemented`; identity reads return [`Pid::UNAVAILABLE`].

use std::ffi::OsStr;
use std::path::Path;

use crate::core::process::attr::ProcAttr;
use crate::core::process::handle::RawDescriptor;
use crate::core::process::pid::Pid;
use crate::core::process::signal::Signal;
use crate::core::process::state::ProcessState;
use crate::error::ProcessError;

pub(crate) const WAITS_WITHOUT_REAPING: bool = false;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysAttributes {}

/// No value of this type can exist.
#[derive(Debug)]
pub(crate) enum ProcessHandle {}

impl ProcessHandle {
    pub(crate) fn wait_exited(&self, _pid: Pid) -> Result<(), ProcessError> {
        match *self {}
    }

    pub(crate) fn reap(&self, _pid: Pid) -> Result<ProcessState, ProcessError> {
        match *self {}
    }

    pub(crate) fn send(&self, _pid: Pid, _signal: Signal) -> Result<(), ProcessError> {
        match *self {}
    }
}

pub(crate) fn spawn(
    _program: &Path,
    _argv: &[&OsStr],
    _attr: &ProcAttr,
) -> Result<(Pid, ProcessHandle), ProcessError> {
    Err(ProcessError::not_implemented("fork/exec"))
}

pub(crate) const fn signal_number(_signal: Signal) -> Option<i32> {
    None
}

pub(crate) const fn signal_supported(_signal: Signal) -> bool {
    false
}

pub(crate) const fn current_pid() -> Pid {
    Pid::UNAVAILABLE
}

pub(crate) const fn parent_pid() -> Pid {
    Pid::UNAVAILABLE
}

pub(crate) const fn descriptor_is_open(_handle: RawDescriptor) -> bool {
    false
}
