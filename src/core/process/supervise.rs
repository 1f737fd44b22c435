// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async supervision: wait with a deadline and a cancellation token.
//!
//! ```text
//! wait_timeout(process, timeout, policy, token)
//!   spawn_blocking(process.wait())
//!   select!
//!     waiter done          --> state
//!     timeout elapsed      --> stop
//!     token cancelled      --> stop
//!
//! stop:  policy.signal (NotImplemented --> kill)
//!        grace elapsed --> kill
//!        await waiter  --> state
//!        signal error  --> kill, await waiter, then the error
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::controller::Process;
use super::pid::Pid;
use super::signal::Signal;
use super::state::ProcessState;
use crate::error::ProcessError;

/// How to stop a child that outlived its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    /// Sent first.
    pub signal: Signal,
    /// Time allowed to exit after `signal` before a kill. `None` waits forever.
    pub grace: Option<Duration>,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            signal: Signal::Kill,
            grace: None,
        }
    }
}

/// Result of [`wait_timeout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOutcome {
    pub state: ProcessState,
    /// The deadline elapsed and the child was stopped.
    pub timed_out: bool,
    /// The token was cancelled and the child was stopped.
    pub cancelled: bool,
}

pub(super) type Waiter = JoinHandle<Result<ProcessState, ProcessError>>;

/// Waits for `process` on a blocking thread, stopping it on timeout or
/// cancellation.
///
/// The controller's exactly-once rule still applies: `process` must not have
/// been waited on.
///
/// # Errors
///
/// Whatever [`Process::wait`] or [`Process::signal`] report. A panic in the
/// blocking waiter becomes [`ProcessError::WaitFailed`].
pub async fn wait_timeout(
    process: Arc<Process>,
    timeout: Option<Duration>,
    policy: StopPolicy,
    token: CancellationToken,
) -> Result<WaitOutcome, ProcessError> {
    let pid = process.pid();
    let mut waiter: Waiter = {
        let process = Arc::clone(&process);
        tokio::task::spawn_blocking(move || process.wait())
    };

    let deadline = async move {
        match timeout {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    let (timed_out, cancelled) = tokio::select! {
        result = &mut waiter => {
            return Ok(WaitOutcome {
                state: joined(pid, result)?,
                timed_out: false,
                cancelled: false,
            });
        }
        () = deadline => {
            warn!(pid = %pid, timeout = ?timeout, "process timed out");
            (true, false)
        }
        () = token.cancelled() => {
            warn!(pid = %pid, "cancellation requested, stopping process");
            (false, true)
        }
    };

    let state = stop(pid, policy, &mut waiter, |signal| process.signal(signal)).await?;
    Ok(WaitOutcome {
        state,
        timed_out,
        cancelled,
    })
}

/// Stops the child per `policy` and collects its state from `waiter`.
///
/// If a signal cannot be delivered the child is killed and reaped before the
/// error is returned, so the claimed wait never outlives this call.
pub(super) async fn stop<F>(
    pid: Pid,
    policy: StopPolicy,
    waiter: &mut Waiter,
    send: F,
) -> Result<ProcessState, ProcessError>
where
    F: Fn(Signal) -> Result<(), ProcessError>,
{
    if let Err(e) = send_stop(pid, &send, policy.signal) {
        return Err(reap_after_failed_stop(pid, waiter, &send, e).await);
    }

    let result = match policy.grace {
        Some(grace) if policy.signal != Signal::Kill => {
            tokio::select! {
                result = &mut *waiter => result,
                () = tokio::time::sleep(grace) => {
                    warn!(pid = %pid, grace = ?grace, "still running after grace period, killing");
                    if let Err(e) = send_stop(pid, &send, Signal::Kill) {
                        return Err(reap_after_failed_stop(pid, waiter, &send, e).await);
                    }
                    waiter.await
                }
            }
        }
        _ => waiter.await,
    };

    joined(pid, result)
}

/// Sends a stop signal, tolerating a child that is already gone.
fn send_stop<F>(pid: Pid, send: &F, signal: Signal) -> Result<(), ProcessError>
where
    F: Fn(Signal) -> Result<(), ProcessError>,
{
    match send(signal) {
        Ok(()) | Err(ProcessError::NoSuchProcess { .. }) => Ok(()),
        Err(e) if e.is_not_implemented() && signal != Signal::Kill => {
            debug!(pid = %pid, signal = signal.name(), "signal unsupported, killing");
            send_stop(pid, send, Signal::Kill)
        }
        Err(e) => Err(e),
    }
}

/// Kills the child and waits for it, then hands `error` back. A child that
/// cannot be killed is left running with its waiter detached.
async fn reap_after_failed_stop<F>(
    pid: Pid,
    waiter: &mut Waiter,
    send: &F,
    error: ProcessError,
) -> ProcessError
where
    F: Fn(Signal) -> Result<(), ProcessError>,
{
    match send(Signal::Kill) {
        Ok(()) | Err(ProcessError::NoSuchProcess { .. }) => match joined(pid, waiter.await) {
            Ok(state) => {
                warn!(pid = %pid, error = %error, state = %state, "stop signal failed, killed instead");
            }
            Err(e) => warn!(pid = %pid, error = %e, "wait failed after stop signal failure"),
        },
        Err(e) => warn!(pid = %pid, error = %e, "cannot kill process, leaving it running"),
    }
    error
}

fn joined(
    pid: Pid,
    result: Result<Result<ProcessState, ProcessError>, JoinError>,
) -> Result<ProcessState, ProcessError> {
    result.map_err(|e| ProcessError::WaitFailed {
        pid,
        source: std::io::Error::other(e.to_string()),
    })?
}
