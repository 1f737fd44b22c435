// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment passed to a child process.
//!
//! # Architecture
//!
//! ```text
//! EnvPolicy
//!   Inherit              child sees the caller's environment (default)
//!   Overlay(["K=V",..])  caller's environment with these set on top
//!   Replace(["K=V",..])  child sees exactly these, in order
//!
//! replace([]) / overlay([])  --> Inherit      (empty means inherit)
//! resolved()                 --> OS string pairs, last value wins, first position kept
//! ```
//!
//! Inherited variables stay raw `OsString`s, so non-UTF-8 values pass through
//! an overlay untouched.
//!
//! - **Case-insensitive keys on Windows** (`PATH == Path`)
//! - Entries without `=` or with an empty key are dropped

use std::ffi::{OsStr, OsString};
#[cfg(windows)]
use std::process::Command;

use tracing::warn;

/// Where a child's environment comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvPolicy {
    /// Inherit the caller's environment unchanged.
    #[default]
    Inherit,
    /// Inherit the caller's environment and set these `KEY=VALUE` entries.
    Overlay(Vec<String>),
    /// Replace the environment with these `KEY=VALUE` entries.
    Replace(Vec<String>),
}

impl EnvPolicy {
    /// Builds a replacement policy. An empty list means [`EnvPolicy::Inherit`].
    pub fn replace<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            Self::Inherit
        } else {
            Self::Replace(entries)
        }
    }

    /// The caller's environment with `entries` layered on top.
    pub fn overlay<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            Self::Inherit
        } else {
            Self::Overlay(entries)
        }
    }

    #[must_use]
    pub const fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Inherit => "inherit",
            Self::Overlay(_) => "overlay",
            Self::Replace(_) => "replace",
        }
    }

    /// Returns the `(key, value)` pairs the child will see.
    #[must_use]
    pub fn resolved(&self) -> Vec<(OsString, OsString)> {
        match self {
            Self::Inherit => current_env(),
            Self::Overlay(entries) => {
                let mut pairs = current_env();
                merge(&mut pairs, entries);
                pairs
            }
            Self::Replace(entries) => {
                let mut pairs = Vec::new();
                merge(&mut pairs, entries);
                pairs
            }
        }
    }

    /// Applies the policy to a command about to be spawned.
    ///
    /// An overlay only sets its own entries, so std passes everything else
    /// through from the caller as is.
    #[cfg(windows)]
    pub(crate) fn apply(&self, command: &mut Command) {
        let entries = match self {
            Self::Inherit => return,
            Self::Overlay(entries) => entries,
            Self::Replace(entries) => {
                command.env_clear();
                entries
            }
        };
        let mut pairs = Vec::new();
        merge(&mut pairs, entries);
        command.envs(pairs);
    }
}

/// The current process environment, values untouched.
#[must_use]
pub fn current_env() -> Vec<(OsString, OsString)> {
    std::env::vars_os().collect()
}

/// Splits a `KEY=VALUE` entry. Returns `None` when there is no `=` or the key
/// is empty.
#[must_use]
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    // Windows keeps per-drive cwd in variables like "=C:"; skip the leading '='.
    let search_from = usize::from(cfg!(windows) && entry.starts_with('='));
    let eq = entry[search_from..].find('=')? + search_from;
    let (key, value) = (&entry[..eq], &entry[eq + 1..]);
    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

fn same_key(a: &OsStr, b: &OsStr) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// Sets each entry in `pairs`: an existing key keeps its position and takes
/// the new value, a new key is appended.
fn merge(pairs: &mut Vec<(OsString, OsString)>, entries: &[String]) {
    for entry in entries {
        let Some((key, value)) = split_entry(entry) else {
            warn!(entry = %entry, "ignoring malformed environment entry");
            continue;
        };
        let key = OsStr::new(key);
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| same_key(k, key)) {
            slot.1 = value.into();
        } else {
            pairs.push((key.to_os_string(), value.into()));
        }
    }
}
