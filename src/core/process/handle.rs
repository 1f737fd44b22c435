// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handles a child can inherit as positional descriptors.
//!
//! Any `AsRawFd` (Unix) / `AsRawHandle` (Windows) value qualifies: `File`,
//! `OwnedFd`, `Stdin`, `Stdout`, `Stderr`, pipes, sockets.

use std::fmt::Debug;

use super::sys;

#[cfg(unix)]
pub type RawDescriptor = std::os::fd::RawFd;

#[cfg(windows)]
pub type RawDescriptor = std::os::windows::io::RawHandle;

#[cfg(not(any(unix, windows)))]
pub type RawDescriptor = i32;

/// An externally owned, OS-level file handle.
pub trait InheritedHandle: Debug + Send + Sync {
    /// The OS descriptor number (fd on Unix, `HANDLE` on Windows).
    fn raw_descriptor(&self) -> RawDescriptor;

    /// Whether the descriptor currently refers to an open file.
    fn is_open(&self) -> bool {
        sys::descriptor_is_open(self.raw_descriptor())
    }
}

#[cfg(unix)]
impl<T> InheritedHandle for T
where
    T: std::os::fd::AsRawFd + Debug + Send + Sync,
{
    fn raw_descriptor(&self) -> RawDescriptor {
        self.as_raw_fd()
    }
}

#[cfg(windows)]
impl<T> InheritedHandle for T
where
    T: std::os::windows::io::AsRawHandle + Debug + Send + Sync,
{
    fn raw_descriptor(&self) -> RawDescriptor {
        self.as_raw_handle()
    }
}
