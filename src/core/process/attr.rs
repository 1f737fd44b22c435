// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Attributes describing how to construct a child process.
//!
//! ```text
//! ProcAttr
//!  • dir    None = inherit caller's working directory
//!  • env    EnvPolicy::Inherit | Overlay([..]) | Replace(["K=V", ..])
//!  • files  slot i --> descriptor i in the child (None = not provided)
//!           empty list = inherit caller's stdin/stdout/stderr
//!  • sys    SysAttributes, passed through to the platform untouched
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::env::EnvPolicy;
use crate::error::ProcessError;

use super::handle::InheritedHandle;
use super::sys::SysAttributes;

/// Configuration for [`start`](super::spawn::start).
///
/// The spawner only borrows a `ProcAttr`; the caller's value is never changed.
#[derive(Debug, Clone, Default)]
pub struct ProcAttr {
    /// Working directory
    dir: Option<PathBuf>,
    /// Environment policy
    env: EnvPolicy,
    /// Positional descriptors
    files: Vec<Option<Arc<dyn InheritedHandle>>>,
    /// Platform-specific extras
    sys: SysAttributes,
}

impl ProcAttr {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for the child.
    #[must_use]
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the environment policy.
    #[must_use]
    pub fn env(mut self, env: EnvPolicy) -> Self {
        self.env = env;
        self
    }

    /// Appends a handle as the next positional descriptor.
    #[must_use]
    pub fn file(self, handle: impl InheritedHandle + 'static) -> Self {
        self.shared_file(Arc::new(handle))
    }

    /// Appends an already shared handle as the next positional descriptor.
    #[must_use]
    pub fn shared_file(mut self, handle: Arc<dyn InheritedHandle>) -> Self {
        self.files.push(Some(handle));
        self
    }

    /// Leaves the next positional descriptor unprovided.
    ///
    /// Standard descriptors (0-2) left empty are connected to the null device.
    #[must_use]
    pub fn no_file(mut self) -> Self {
        self.files.push(None);
        self
    }

    /// Sets platform-specific attributes.
    #[must_use]
    pub fn sys(mut self, sys: SysAttributes) -> Self {
        self.sys = sys;
        self
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    #[must_use]
    pub const fn environment(&self) -> &EnvPolicy {
        &self.env
    }

    #[must_use]
    pub fn files(&self) -> &[Option<Arc<dyn InheritedHandle>>] {
        &self.files
    }

    #[must_use]
    pub const fn sys_attributes(&self) -> &SysAttributes {
        &self.sys
    }

    /// Checks the attributes before anything is forked.
    pub(super) fn validate(&self, program: &Path) -> Result<(), ProcessError> {
        if let Some(dir) = &self.dir {
            let meta = std::fs::metadata(dir).map_err(|e| {
                ProcessError::spawn_failed(
                    program,
                    std::io::Error::new(
                        e.kind(),
                        format!("working directory {}: {e}", dir.display()),
                    ),
                )
            })?;
            if !meta.is_dir() {
                return Err(ProcessError::spawn_failed(
                    program,
                    std::io::Error::new(
                        std::io::ErrorKind::NotADirectory,
                        format!("working directory {} is not a directory", dir.display()),
                    ),
                ));
            }
        }

        for (slot, handle) in self.files.iter().enumerate() {
            if let Some(handle) = handle
                && !handle.is_open()
            {
                return Err(ProcessError::spawn_failed(
                    program,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("file handle for descriptor {slot} is not open"),
                    ),
                ));
            }
        }

        Ok(())
    }
}
