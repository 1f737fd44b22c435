// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::time::Duration;

use super::pid::{current_pid, parent_pid};
use super::signal::Signal;
use super::state::{ExitStatus, ProcessState};
use super::{Lifecycle, Pid, ProcAttr, start};
use crate::error::{FORK_EXEC, ProcessError};

// --- Pure value types ---

#[test]
fn test_pid_sentinel() {
    assert_eq!(Pid::UNAVAILABLE.as_raw(), -1);
    assert!(!Pid::UNAVAILABLE.is_available());
    assert!(Pid::from_raw(1).is_available());
    assert_eq!(Pid::from_u32(u32::MAX), Pid::UNAVAILABLE);
    assert_eq!(Pid::from_raw(42).to_string(), "42");
}

#[test]
fn test_signal_parsing() {
    assert_eq!("SIGTERM".parse::<Signal>(), Ok(Signal::Terminate));
    assert_eq!("term".parse::<Signal>(), Ok(Signal::Terminate));
    assert_eq!("Killed".parse::<Signal>(), Ok(Signal::Kill));
    assert_eq!(" int ".parse::<Signal>(), Ok(Signal::Interrupt));
    assert!("SIGFOO".parse::<Signal>().is_err());
    assert_eq!(
        "SIGFOO".parse::<Signal>().unwrap_err().to_string(),
        "unknown signal 'SIGFOO'"
    );
}

#[test]
fn test_signal_numbers_round_trip_through_parse() {
    for signal in Signal::ALL {
        if let Some(raw) = signal.number() {
            assert_eq!(raw.to_string().parse::<Signal>(), Ok(signal));
        }
    }
}

#[test]
fn test_signal_display() {
    insta::assert_snapshot!(Signal::Kill.to_string(), @"killed");
    insta::assert_snapshot!(Signal::Terminate.to_string(), @"terminated");
    assert_eq!(Signal::Interrupt.name(), "SIGINT");
}

#[test]
fn test_state_exited_summary() {
    let state = ProcessState::new(
        Pid::from_raw(10),
        ExitStatus::Exited { code: 3 },
        Duration::ZERO,
        Duration::ZERO,
    );
    assert!(!state.success());
    assert!(state.exited());
    assert_eq!(state.exit_code(), Some(3));
    assert_eq!(state.exit_code_or_sentinel(), 3);
    assert_eq!(state.signal(), None);
    insta::assert_snapshot!(state.summary(), @"exit status 3");
}

#[test]
fn test_state_success_requires_zero() {
    let ok = ProcessState::new(
        Pid::from_raw(10),
        ExitStatus::Exited { code: 0 },
        Duration::ZERO,
        Duration::ZERO,
    );
    assert!(ok.success());
    assert_eq!(ok.to_string(), "exit status 0");
}

#[cfg(unix)]
#[test]
fn test_state_signaled_summary() {
    let raw = Signal::Kill.number().expect("SIGKILL has a number on unix");
    let state = ProcessState::new(
        Pid::from_raw(10),
        ExitStatus::Signaled {
            signal: raw,
            core_dumped: false,
        },
        Duration::ZERO,
        Duration::ZERO,
    );
    assert!(!state.success());
    assert!(!state.exited());
    assert_eq!(state.exit_code(), None);
    assert_eq!(state.exit_code_or_sentinel(), -1);
    assert_eq!(state.signal(), Some(Signal::Kill));
    insta::assert_snapshot!(state.summary(), @"signal: killed");

    let dumped = ProcessState::new(
        Pid::from_raw(10),
        ExitStatus::Signaled {
            signal: Signal::Abort.number().expect("SIGABRT has a number on unix"),
            core_dumped: true,
        },
        Duration::ZERO,
        Duration::ZERO,
    );
    insta::assert_snapshot!(dumped.summary(), @"signal: aborted (core dumped)");
}

#[test]
fn test_state_compares_by_fields() {
    let make = || {
        ProcessState::new(
            Pid::from_raw(7),
            ExitStatus::Exited { code: 1 },
            Duration::from_millis(5),
            Duration::ZERO,
        )
    };
    assert_eq!(make(), make());
}

// --- Identity ---

#[test]
fn test_current_pid_is_stable() {
    let first = current_pid();
    let second = current_pid();
    assert_eq!(first, second);
    #[cfg(any(unix, windows))]
    assert_eq!(first, Pid::from_u32(std::process::id()));
}

#[test]
fn test_parent_pid_differs_or_unavailable() {
    let parent = parent_pid();
    if parent.is_available() {
        assert_ne!(parent, current_pid());
    } else {
        assert_eq!(parent, Pid::UNAVAILABLE);
    }
}

// --- Spawning (Unix) ---

#[cfg(unix)]
mod unix {
    use std::fs;
    use std::os::fd::AsRawFd;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::core::env::EnvPolicy;
    use crate::core::process::InheritedHandle;
    use crate::core::process::supervise::{StopPolicy, Waiter, stop, wait_timeout};
    use tokio_util::sync::CancellationToken;

    const MISSING: &str = "/nonexistent/procctl-missing-tool";

    const SH: &str = "/bin/sh";

    fn sh(script: &str) -> [&str; 3] {
        ["sh", "-c", script]
    }

    fn sleeper() -> super::super::Process {
        start(SH, &sh("exec sleep 30"), &ProcAttr::new()).expect("sleep should start")
    }

    /// Runs `script` with stdout captured to a temp file and returns the output.
    fn capture(script: &str, attr: ProcAttr) -> String {
        let out = tempfile::NamedTempFile::new().expect("temp file");
        let attr = attr
            .no_file()
            .file(out.reopen().expect("reopen temp file"))
            .no_file();
        let process = start(SH, &sh(script), &attr).expect("sh should start");
        let state = process.wait().expect("wait should succeed");
        assert!(state.success(), "script failed: {state}");
        fs::read_to_string(out.path()).expect("read output")
    }

    #[test]
    fn test_start_and_wait_exit_code() {
        let process = start(SH, &sh("exit 3"), &ProcAttr::new()).expect("sh should start");
        assert!(process.pid().is_available());
        assert_eq!(process.lifecycle(), Lifecycle::Running);

        let state = process.wait().expect("wait should succeed");
        assert_eq!(state.pid(), process.pid());
        assert!(!state.success());
        assert_eq!(state.exit_code(), Some(3));
        assert_eq!(state.summary(), "exit status 3");
        assert_eq!(process.lifecycle(), Lifecycle::Exited);
    }

    #[test]
    fn test_success_matches_zero_exit() {
        let process = start(SH, &sh("exit 0"), &ProcAttr::new()).expect("sh should start");
        assert!(process.wait().expect("wait should succeed").success());
    }

    #[test]
    fn test_wait_twice_is_rejected() {
        let process = start(SH, &sh("exit 0"), &ProcAttr::new()).expect("sh should start");
        process.wait().expect("first wait should succeed");

        let err = process.wait().expect_err("second wait must fail");
        assert!(matches!(err, ProcessError::AlreadyWaited { pid } if pid == process.pid()));
    }

    #[test]
    fn test_kill_after_wait_is_no_such_process() {
        let process = start(SH, &sh("exit 0"), &ProcAttr::new()).expect("sh should start");
        process.wait().expect("wait should succeed");

        let err = process.kill().expect_err("kill after wait must fail");
        assert!(err.is_no_such_process());
        assert!(
            process
                .signal(Signal::Terminate)
                .expect_err("signal after wait must fail")
                .is_no_such_process()
        );
    }

    #[test]
    fn test_kill_running_process() {
        let process = sleeper();
        process.kill().expect("kill should be delivered");

        let state = process.wait().expect("wait should succeed");
        assert!(!state.success());
        assert_eq!(state.signal(), Some(Signal::Kill));
        assert_eq!(state.summary(), "signal: killed");
        assert_eq!(process.lifecycle(), Lifecycle::Killed);
    }

    #[test]
    fn test_signal_terminate() {
        let process = sleeper();
        process
            .signal(Signal::Terminate)
            .expect("SIGTERM should be delivered");

        let state = process.wait().expect("wait should succeed");
        assert_eq!(state.signal(), Some(Signal::Terminate));
        assert_eq!(state.summary(), "signal: terminated");
    }

    #[test]
    fn test_kill_while_another_thread_waits() {
        let process = Arc::new(sleeper());
        let waiter = {
            let process = Arc::clone(&process);
            thread::spawn(move || process.wait())
        };

        thread::sleep(Duration::from_millis(100));
        process.kill().expect("kill should be delivered");

        let state = waiter
            .join()
            .expect("waiter thread")
            .expect("wait should succeed");
        assert_eq!(state.signal(), Some(Signal::Kill));
        assert!(process.kill().expect_err("already reaped").is_no_such_process());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_wait_after_realtime_signal() {
        let process = Arc::new(sleeper());
        let waiter = {
            let process = Arc::clone(&process);
            thread::spawn(move || process.wait())
        };
        thread::sleep(Duration::from_millis(100));

        let rt = libc::SIGRTMIN();
        // SAFETY: the child is alive and unreaped while the waiter blocks.
        assert_eq!(unsafe { libc::kill(process.pid().as_raw(), rt) }, 0);

        let state = waiter
            .join()
            .expect("waiter thread")
            .expect("wait should succeed");
        assert_eq!(
            state.status(),
            ExitStatus::Signaled {
                signal: rt,
                core_dumped: false
            }
        );
        assert_eq!(state.signal(), None);
    }

    #[test]
    fn test_concurrent_second_wait_does_not_block() {
        let process = Arc::new(sleeper());
        let waiter = {
            let process = Arc::clone(&process);
            thread::spawn(move || process.wait())
        };

        thread::sleep(Duration::from_millis(100));
        let err = process.wait().expect_err("second wait must fail");
        assert!(matches!(err, ProcessError::AlreadyWaited { .. }));

        process.kill().expect("kill should be delivered");
        waiter
            .join()
            .expect("waiter thread")
            .expect("first wait should succeed");
    }

    #[test]
    fn test_nonexistent_executable() {
        let path = "/nonexistent/procctl-missing-tool";
        let err = start(path, &["procctl-missing-tool"], &ProcAttr::new())
            .expect_err("spawn must fail");

        match &err {
            ProcessError::SpawnFailed { op, path: p, source } => {
                assert_eq!(*op, FORK_EXEC);
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
        assert!(
            err.to_string()
                .starts_with("fork/exec /nonexistent/procctl-missing-tool: ")
        );
    }

    #[test]
    fn test_missing_working_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("gone");
        let err = start(SH, &sh("exit 0"), &ProcAttr::new().dir(&missing))
            .expect_err("spawn must fail");

        match err {
            ProcessError::SpawnFailed { op, source, .. } => {
                assert_eq!(op, FORK_EXEC);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_working_directory_must_be_directory() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let err = start(SH, &sh("exit 0"), &ProcAttr::new().dir(file.path()))
            .expect_err("spawn must fail");

        match err {
            ProcessError::SpawnFailed { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotADirectory);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[derive(Debug)]
    struct ClosedFd;

    impl AsRawFd for ClosedFd {
        fn as_raw_fd(&self) -> std::os::fd::RawFd {
            1_000_000
        }
    }

    #[test]
    fn test_closed_handle_is_rejected() {
        let err = start(SH, &sh("exit 0"), &ProcAttr::new().file(ClosedFd))
            .expect_err("spawn must fail");

        match err {
            ProcessError::SpawnFailed { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_working_directory_is_honored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let expected = fs::canonicalize(dir.path()).expect("canonicalize");

        let output = capture("pwd -P", ProcAttr::new().dir(dir.path()));
        assert_eq!(output.trim_end(), expected.to_string_lossy());
    }

    #[test]
    fn test_working_directory_is_inherited() {
        let expected = std::env::current_dir()
            .and_then(fs::canonicalize)
            .expect("current dir");

        let output = capture("pwd -P", ProcAttr::new());
        assert_eq!(output.trim_end(), expected.to_string_lossy());
    }

    #[test]
    fn test_environment_is_replaced() {
        let attr = ProcAttr::new().env(EnvPolicy::replace(["PROCCTL_VALUE=hello"]));
        let output = capture(r#"printf '%s %s' "$PROCCTL_VALUE" "${HOME-unset}""#, attr);
        assert_eq!(output, "hello unset");
    }

    #[test]
    fn test_extra_descriptor_is_inherited() {
        let extra = tempfile::NamedTempFile::new().expect("temp file");
        let attr = ProcAttr::new()
            .no_file()
            .no_file()
            .no_file()
            .file(extra.reopen().expect("reopen temp file"));

        let process = start(SH, &sh("echo extra >&3"), &attr).expect("sh should start");
        assert!(process.wait().expect("wait should succeed").success());
        assert_eq!(
            fs::read_to_string(extra.path()).expect("read output"),
            "extra\n"
        );
    }

    fn assert_not_found(err: &ProcessError) {
        match err {
            ProcessError::SpawnFailed { op, path, source } => {
                assert_eq!(*op, FORK_EXEC);
                assert_eq!(path, MISSING);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_exec_failure_with_file_slots() {
        let out = tempfile::NamedTempFile::new().expect("temp file");
        let attr = ProcAttr::new()
            .no_file()
            .file(out.reopen().expect("reopen temp file"))
            .no_file();

        let err = start(MISSING, &["x"], &attr).expect_err("spawn must fail");
        assert_not_found(&err);
        assert_eq!(fs::metadata(out.path()).expect("metadata").len(), 0);
    }

    #[test]
    fn test_exec_failure_with_many_slots() {
        let out = tempfile::NamedTempFile::new().expect("temp file");
        let shared: Arc<dyn InheritedHandle> =
            Arc::new(out.reopen().expect("reopen temp file"));
        let attr = (0..64).fold(ProcAttr::new(), |attr, _| {
            attr.shared_file(Arc::clone(&shared))
        });

        let err = start(MISSING, &["x"], &attr).expect_err("spawn must fail");
        assert_not_found(&err);
        // Nothing meant for the parent leaked into the shared file.
        assert_eq!(fs::metadata(out.path()).expect("metadata").len(), 0);
    }

    #[test]
    fn test_many_slots_start_and_exit() {
        let out = tempfile::NamedTempFile::new().expect("temp file");
        let shared: Arc<dyn InheritedHandle> =
            Arc::new(out.reopen().expect("reopen temp file"));
        let attr = (0..64).fold(ProcAttr::new(), |attr, _| {
            attr.shared_file(Arc::clone(&shared))
        });

        let process = start(SH, &sh("echo many; exit 4"), &attr).expect("sh should start");
        assert_eq!(process.wait().expect("wait should succeed").exit_code(), Some(4));
        assert_eq!(fs::read_to_string(out.path()).expect("read output"), "many\n");
    }

    #[test]
    fn test_exec_failure_not_executable() {
        let script = tempfile::NamedTempFile::new().expect("temp file");
        let err = start(script.path(), &["script"], &ProcAttr::new())
            .expect_err("spawn must fail");

        match err {
            ProcessError::SpawnFailed { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_standard_slots_read_and_write_dev_null() {
        // Slots 0 and 2 are left empty by capture().
        let output = capture(
            r#"if read -r line; then echo "read $line"; else echo eof; fi; echo gone >&2 && echo wrote"#,
            ProcAttr::new(),
        );
        assert_eq!(output, "eof\nwrote\n");

        #[cfg(target_os = "linux")]
        assert_eq!(
            capture("readlink /proc/$$/fd/0 /proc/$$/fd/2", ProcAttr::new()),
            "/dev/null\n/dev/null\n"
        );
    }

    #[test]
    fn test_stdout_and_stderr_slots_stay_apart() {
        let one = tempfile::NamedTempFile::new().expect("temp file");
        let two = tempfile::NamedTempFile::new().expect("temp file");
        let attr = ProcAttr::new()
            .no_file()
            .file(one.reopen().expect("reopen temp file"))
            .file(two.reopen().expect("reopen temp file"));

        let process = start(SH, &sh("echo to-stdout; echo to-stderr >&2"), &attr)
            .expect("sh should start");
        assert!(process.wait().expect("wait should succeed").success());
        assert_eq!(fs::read_to_string(one.path()).expect("read"), "to-stdout\n");
        assert_eq!(fs::read_to_string(two.path()).expect("read"), "to-stderr\n");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_stdout_and_stderr_swap() {
        let link = |fd: i32| {
            fs::read_link(format!("/proc/self/fd/{fd}"))
                .expect("read fd link")
                .to_string_lossy()
                .into_owned()
        };
        let expected = format!("{}\n{}\n", link(2), link(1));

        let out = tempfile::NamedTempFile::new().expect("temp file");
        let attr = ProcAttr::new()
            .no_file()
            .file(io::stderr())
            .file(io::stdout())
            .file(out.reopen().expect("reopen temp file"));

        let process = start(SH, &sh("readlink /proc/$$/fd/1 /proc/$$/fd/2 >&3"), &attr)
            .expect("sh should start");
        assert!(process.wait().expect("wait should succeed").success());
        assert_eq!(fs::read_to_string(out.path()).expect("read output"), expected);
    }

    /// Each source descriptor is also the target slot of the other one.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_crossed_descriptors_swap_places() {
        let first = tempfile::tempfile().expect("temp file");
        let second = tempfile::tempfile().expect("temp file");
        let (fd_first, fd_second) = (first.as_raw_fd(), second.as_raw_fd());
        let link = |fd: i32| {
            fs::read_link(format!("/proc/self/fd/{fd}"))
                .expect("read fd link")
                .to_string_lossy()
                .into_owned()
        };
        let expected = format!("{}\n{}\n", link(fd_second), link(fd_first));

        let out_file = tempfile::NamedTempFile::new().expect("temp file");
        let out: Arc<dyn InheritedHandle> =
            Arc::new(out_file.reopen().expect("reopen temp file"));
        let first: Arc<dyn InheritedHandle> = Arc::new(first);
        let second: Arc<dyn InheritedHandle> = Arc::new(second);

        let slots = fd_first.max(fd_second) + 1;
        let attr = (0..slots).fold(ProcAttr::new(), |attr, slot| match slot {
            1 => attr.shared_file(Arc::clone(&out)),
            s if s == fd_first => attr.shared_file(Arc::clone(&second)),
            s if s == fd_second => attr.shared_file(Arc::clone(&first)),
            _ => attr.no_file(),
        });

        let script = format!("readlink /proc/$$/fd/{fd_first} /proc/$$/fd/{fd_second}");
        let process = start(SH, &sh(&script), &attr).expect("sh should start");
        assert!(process.wait().expect("wait should succeed").success());
        assert_eq!(
            fs::read_to_string(out_file.path()).expect("read output"),
            expected
        );
    }

    #[test]
    fn test_drop_does_not_kill() {
        use nix::sys::signal::{Signal as NixSignal, kill};
        use nix::sys::wait::waitpid;
        use nix::unistd::Pid as NixPid;

        let pid = {
            let process = sleeper();
            process.pid()
        };
        let raw = NixPid::from_raw(pid.as_raw());

        kill(raw, None).expect("child should still be alive");
        kill(raw, NixSignal::SIGKILL).expect("cleanup kill");
        waitpid(raw, None).expect("cleanup reap");
    }

    #[tokio::test]
    async fn test_wait_timeout_returns_before_deadline() {
        let process = Arc::new(start(SH, &sh("exit 0"), &ProcAttr::new()).expect("sh"));
        let outcome = wait_timeout(
            process,
            Some(Duration::from_secs(10)),
            StopPolicy::default(),
            CancellationToken::new(),
        )
        .await
        .expect("wait should succeed");

        assert!(outcome.state.success());
        assert!(!outcome.timed_out);
        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn test_wait_timeout_kills_on_deadline() {
        let process = Arc::new(sleeper());
        let outcome = wait_timeout(
            Arc::clone(&process),
            Some(Duration::from_millis(100)),
            StopPolicy::default(),
            CancellationToken::new(),
        )
        .await
        .expect("wait should succeed");

        assert!(outcome.timed_out);
        assert_eq!(outcome.state.signal(), Some(Signal::Kill));
        assert_eq!(process.lifecycle(), Lifecycle::Killed);
    }

    #[tokio::test]
    async fn test_wait_timeout_sends_stop_signal() {
        let policy = StopPolicy {
            signal: Signal::Terminate,
            grace: Some(Duration::from_secs(10)),
        };
        let outcome = wait_timeout(
            Arc::new(sleeper()),
            Some(Duration::from_millis(100)),
            policy,
            CancellationToken::new(),
        )
        .await
        .expect("wait should succeed");

        assert!(outcome.timed_out);
        assert_eq!(outcome.state.signal(), Some(Signal::Terminate));
    }

    #[tokio::test]
    async fn test_wait_timeout_escalates_after_grace() {
        let process = start(
            SH,
            &sh("trap '' TERM; while :; do :; done"),
            &ProcAttr::new(),
        )
        .expect("sh should start");
        let policy = StopPolicy {
            signal: Signal::Terminate,
            grace: Some(Duration::from_millis(200)),
        };

        let outcome = wait_timeout(
            Arc::new(process),
            Some(Duration::from_millis(300)),
            policy,
            CancellationToken::new(),
        )
        .await
        .expect("wait should succeed");

        assert!(outcome.timed_out);
        assert_eq!(outcome.state.signal(), Some(Signal::Kill));
    }

    #[tokio::test]
    async fn test_wait_timeout_honors_cancellation() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let outcome = wait_timeout(Arc::new(sleeper()), None, StopPolicy::default(), token)
            .await
            .expect("wait should succeed");

        assert!(outcome.cancelled);
        assert!(!outcome.timed_out);
        assert!(!outcome.state.success());
    }

    #[tokio::test]
    async fn test_failed_stop_signal_still_reaps_child() {
        let process = Arc::new(sleeper());
        let mut waiter: Waiter = {
            let process = Arc::clone(&process);
            tokio::task::spawn_blocking(move || process.wait())
        };
        let refuse_terminate = |signal: Signal| match signal {
            Signal::Terminate => Err(ProcessError::SignalFailed {
                pid: process.pid(),
                signal,
                source: io::ErrorKind::PermissionDenied.into(),
            }),
            other => process.signal(other),
        };
        let policy = StopPolicy {
            signal: Signal::Terminate,
            grace: Some(Duration::from_secs(10)),
        };

        let err = stop(process.pid(), policy, &mut waiter, refuse_terminate)
            .await
            .expect_err("the signal failure is reported");
        assert!(matches!(
            err,
            ProcessError::SignalFailed {
                signal: Signal::Terminate,
                ..
            }
        ));
        // Killed and reaped before the error came back.
        assert!(waiter.is_finished());
        assert_eq!(process.lifecycle(), Lifecycle::Killed);
    }
}

// --- Spawning (Windows) ---

#[cfg(windows)]
mod windows {
    use std::path::PathBuf;

    use super::*;
    use crate::core::process::SysAttributes;

    /// `CREATE_NEW_PROCESS_GROUP`.
    const NEW_GROUP: u32 = 0x0000_0200;

    fn cmd() -> PathBuf {
        std::env::var_os("ComSpec").map_or_else(
            || PathBuf::from(r"C:\Windows\System32\cmd.exe"),
            PathBuf::from,
        )
    }

    fn pinger(attr: &ProcAttr) -> super::super::Process {
        start(cmd(), &["cmd", "/c", "ping -n 30 127.0.0.1 >NUL"], attr)
            .expect("cmd should start")
    }

    #[test]
    fn test_interrupt_needs_own_process_group() {
        let process = pinger(&ProcAttr::new());
        let err = process
            .signal(Signal::Interrupt)
            .expect_err("interrupt must be refused");
        assert!(err.is_not_implemented());

        process.kill().expect("kill should be delivered");
        let state = process.wait().expect("wait should succeed");
        assert_eq!(state.exit_code(), Some(1));
    }

    #[test]
    fn test_kill_in_own_process_group() {
        let attr = ProcAttr::new().sys(SysAttributes {
            creation_flags: NEW_GROUP,
        });
        let process = pinger(&attr);
        process.kill().expect("kill should be delivered");
        assert!(!process.wait().expect("wait should succeed").success());
    }
}
