// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for procctl using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! procctl [global options] <command>
//! run [options] [--] PROGRAM [ARGS]...
//! ids [--json]
//! signals
//! options
//! configs
//! version
//! ```

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::{IdsArgs, RunArgs};
use clap::{Parser, Subcommand};

/// Process spawning and control.
#[derive(Debug, Parser)]
#[command(
    name = "procctl",
    author,
    version,
    about = "Start, wait for and signal child processes",
    long_about = "procctl Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Starts a program, waits for it and reports how it ended.\n\n\
                  `procctl run -- make -j8` runs make and exits with its code.\n\
                  `procctl run -t 30 --stop-signal term --grace 5 -- ./server`\n\
                  stops the server after 30 seconds, killing it if it ignores\n\
                  SIGTERM for 5 more.",
    after_help = "CONFIG FILES:\n\n\
                  procctl loads `procctl.toml` from the current directory if it\n\
                  exists, then every file given with --config, then PROCCTL_*\n\
                  environment variables (PROCCTL_RUN__TIMEOUT_SECS=30). Command\n\
                  line flags win over all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files used by procctl.
    Configs,

    /// Starts a program and waits for it.
    Run(RunArgs),

    /// Prints the current and parent process identifiers.
    Ids(IdsArgs),

    /// Lists the signals known on this host.
    Signals,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
