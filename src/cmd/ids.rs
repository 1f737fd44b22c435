// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `ids` and `signals` commands.

use std::io::Write as _;

use serde::Serialize;

use crate::cli::run::IdsArgs;
use crate::core::process::{Pid, Signal, current_pid, parent_pid};
use crate::error::AppResult;

/// Current and parent identifiers. `-1` where the host cannot tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ids {
    pub pid: Pid,
    pub ppid: Pid,
}

impl Ids {
    #[must_use]
    pub fn read() -> Self {
        Self {
            pid: current_pid(),
            ppid: parent_pid(),
        }
    }
}

/// Print the process identifiers.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run_ids_command(args: &IdsArgs) -> AppResult<()> {
    let ids = Ids::read();
    let mut out = std::io::stdout().lock();
    if args.json {
        let json = serde_json::to_string(&ids).map_err(std::io::Error::from)?;
        writeln!(out, "{json}")?;
    } else {
        writeln!(out, "pid:  {}", ids.pid)?;
        writeln!(out, "ppid: {}", ids.ppid)?;
    }
    Ok(())
}

/// One line per known signal: name, host number, description, deliverable.
#[must_use]
pub fn format_signals() -> Vec<String> {
    Signal::ALL
        .into_iter()
        .map(|signal| {
            let number = signal
                .number()
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let supported = if signal.is_supported() {
                "yes"
            } else {
                "no"
            };
            format!(
                "{:<8} {number:>3}  {:<22} {supported}",
                signal.name(),
                signal.to_string()
            )
        })
        .collect()
}

/// List the signals known on this host.
pub fn run_signals_command() {
    for line in format_signals() {
        println!("{line}");
    }
}
