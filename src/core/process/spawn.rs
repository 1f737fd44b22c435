// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Creating child processes.
//!
//! ```text
//! start(path, argv, &attr)
//!   attr.validate()       dir exists + is a dir, handles open
//!   sys::spawn()          fork/exec (atomic: failure leaves no child)
//!   --> Process (Running, not yet waited)
//!
//! lookup_path("sh") --> /bin/sh        (which)
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::attr::ProcAttr;
use super::controller::Process;
use super::sys;
use crate::error::ProcessError;

/// Starts `path` with arguments `argv` and attributes `attr`.
///
/// `argv[0]` becomes the child's argument 0 (Unix); the remaining entries
/// are its arguments. An empty `argv` uses `path` as argument 0. `attr` is
/// only borrowed.
///
/// # Errors
///
/// [`ProcessError::SpawnFailed`] (`fork/exec <path>: <cause>`) when the
/// directory or a handle is invalid, or the OS cannot create or exec the
/// child. No child exists afterwards. [`ProcessError::NotImplemented`] when
/// the host cannot spawn processes or cannot honor an attribute.
pub fn start<P, S>(path: P, argv: &[S], attr: &ProcAttr) -> Result<Process, ProcessError>
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let path = path.as_ref();
    attr.validate(path)?;

    let argv: Vec<&OsStr> = argv.iter().map(AsRef::as_ref).collect();

    if let Some(dir) = attr.working_dir() {
        debug!(cwd = %dir.display(), "cd");
    }
    debug!(
        program = %path.display(),
        argv = ?argv,
        env = attr.environment().kind(),
        files = attr.files().len(),
        "exec"
    );

    let (pid, handle) = sys::spawn(path, &argv, attr)?;
    trace!(program = %path.display(), pid = %pid, "spawned");

    Ok(Process::new(pid, path.to_path_buf(), handle))
}

/// Resolves a bare program name through `PATH`.
///
/// # Errors
///
/// Returns [`ProcessError::ExecutableNotFound`] if nothing on `PATH` matches.
pub fn lookup_path(name: &str) -> Result<PathBuf, ProcessError> {
    which::which(name).map_err(|_| ProcessError::ExecutableNotFound {
        name: name.to_string(),
    })
}
