// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the process commands.
//!
//! ```text
//! run -C DIR -e K=V --clear-env -t SECS --stop-signal SIG --grace SECS
//!     --arg0 NAME --json [--] PROGRAM [ARGS]...
//!   → start, wait, exit with the child's code (128 + signal if killed)
//! ids --json
//!   → current and parent process identifiers
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::core::process::Signal;

/// Arguments for the `run` command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Working directory for the child. Defaults to the current directory.
    #[arg(short = 'C', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Adds KEY=VALUE to the child's environment. Can be specified multiple times.
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub env: Vec<String>,

    /// Starts the child with only the --env entries.
    #[arg(long = "clear-env")]
    pub clear_env: bool,

    /// Stops the child after this many seconds (0 = never).
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Signal sent when the timeout elapses (name, short name or number).
    #[arg(long = "stop-signal", value_name = "SIGNAL")]
    pub stop_signal: Option<Signal>,

    /// Seconds to wait after --stop-signal before killing (0 = never).
    #[arg(long = "grace", value_name = "SECS")]
    pub grace: Option<u64>,

    /// Argument 0 seen by the child. Defaults to PROGRAM.
    #[arg(long = "arg0", value_name = "NAME")]
    pub arg0: Option<String>,

    /// Prints the final state as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Program to start. Bare names are looked up in PATH.
    #[arg(value_name = "PROGRAM", required = true)]
    pub program: String,

    /// Arguments passed to the program.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `ids` command.
#[derive(Debug, Clone, Args)]
pub struct IdsArgs {
    /// Prints the identifiers as JSON.
    #[arg(long)]
    pub json: bool,
}
