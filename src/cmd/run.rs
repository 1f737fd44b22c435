// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `run` command.
//!
//! ```text
//! RunArgs + [run] config
//!   --> RunSettings        CLI wins over config
//!   --> resolve_program    bare name --> PATH lookup
//!   --> start()            Process
//!   --> wait_timeout()     timeout / Ctrl-C --> stop signal --> grace --> kill
//!   --> RunReport          exit code: code & 0xff, or 128 + signal
//! ```

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::run::RunArgs;
use crate::config::types::RunConfig;
use crate::core::env::{EnvPolicy, split_entry};
use crate::core::process::{
    ExitStatus, Pid, ProcAttr, ProcessState, StopPolicy, lookup_path, start, wait_timeout,
};
use crate::error::{AppResult, bail_out};

/// Effective settings for one `run`, after merging CLI flags over config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub timeout: Option<Duration>,
    pub policy: StopPolicy,
    pub env: EnvPolicy,
}

impl RunSettings {
    /// Merges `args` over `config`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed `--env` entry or an invalid
    /// `run.stop_signal` in the config.
    pub fn resolve(args: &RunArgs, config: &RunConfig) -> AppResult<Self> {
        if let Some(bad) = args.env.iter().find(|e| split_entry(e).is_none()) {
            return Err(bail_out(format!(
                "invalid --env entry '{bad}', expected KEY=VALUE"
            )));
        }

        let timeout = args.timeout.map_or(config.timeout(), secs_or_none);
        let grace = args.grace.map_or(config.grace(), secs_or_none);
        let signal = match args.stop_signal {
            Some(signal) => signal,
            None => config.stop_signal()?,
        };

        let clear_env = args.clear_env || config.clear_env;
        let entries: Vec<String> = config.env.iter().chain(&args.env).cloned().collect();
        let env = if clear_env {
            if entries.is_empty() {
                warn!("--clear-env without any --env entries, inheriting the environment");
            }
            EnvPolicy::replace(entries)
        } else {
            EnvPolicy::overlay(entries)
        };

        Ok(Self {
            timeout,
            policy: StopPolicy { signal, grace },
            env,
        })
    }
}

/// Outcome of `procctl run`, printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub program: PathBuf,
    pub pid: Pid,
    pub status: ExitStatus,
    pub success: bool,
    pub summary: String,
    pub timed_out: bool,
    pub cancelled: bool,
    pub user_time_ms: u128,
    pub system_time_ms: u128,
    pub wall_time_ms: u128,
}

impl RunReport {
    fn new(program: &Path, state: &ProcessState, wall: Duration) -> Self {
        Self {
            program: program.to_path_buf(),
            pid: state.pid(),
            status: state.status(),
            success: state.success(),
            summary: state.summary(),
            timed_out: false,
            cancelled: false,
            user_time_ms: state.user_time().as_millis(),
            system_time_ms: state.system_time().as_millis(),
            wall_time_ms: wall.as_millis(),
        }
    }

    /// Exit code for procctl itself: the child's code, or 128 + signal.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        let code = match self.status {
            ExitStatus::Exited { code } => code.rem_euclid(256),
            ExitStatus::Signaled { signal, .. } => (128 + signal).min(255),
        };
        u8::try_from(code).unwrap_or(u8::MAX)
    }
}

/// Turns the PROGRAM argument into an executable path.
///
/// Anything with a path separator is used as given; bare names go through
/// `PATH`.
///
/// # Errors
///
/// Returns `ExecutableNotFound` when a bare name is not on `PATH`.
pub fn resolve_program(program: &str) -> AppResult<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let resolved = lookup_path(program)?;
    debug!(program = %program, path = %resolved.display(), "resolved via PATH");
    Ok(resolved)
}

/// Starts the program, waits for it and reports how it ended.
///
/// Ctrl-C stops the child the same way a timeout does.
///
/// # Errors
///
/// Returns an error if the settings are invalid, the program cannot be
/// found or started, or waiting fails.
pub async fn run_run_command(args: &RunArgs, config: &RunConfig) -> AppResult<RunReport> {
    let settings = RunSettings::resolve(args, config)?;
    let program = resolve_program(&args.program)?;

    let arg0 = args.arg0.as_deref().unwrap_or(&args.program);
    let argv: Vec<&str> = std::iter::once(arg0)
        .chain(args.args.iter().map(String::as_str))
        .collect();

    let mut attr = ProcAttr::new().env(settings.env);
    if let Some(dir) = &args.cwd {
        attr = attr.dir(dir);
    }

    let started = Instant::now();
    let process = Arc::new(start(&program, &argv, &attr)?);
    info!(program = %program.display(), pid = %process.pid(), "started");

    let token = CancellationToken::new();
    let interrupt = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    let outcome = wait_timeout(
        Arc::clone(&process),
        settings.timeout,
        settings.policy,
        token,
    )
    .await;
    interrupt.abort();
    let outcome = outcome?;

    let mut report = RunReport::new(&program, &outcome.state, started.elapsed());
    report.timed_out = outcome.timed_out;
    report.cancelled = outcome.cancelled;

    info!(
        pid = %report.pid,
        status = %report.summary,
        wall_ms = report.wall_time_ms,
        "finished"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        writeln!(std::io::stdout().lock(), "{json}")?;
    } else if !report.success {
        eprintln!("{}: {}", program.display(), report.summary);
    }

    Ok(report)
}

const fn secs_or_none(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
