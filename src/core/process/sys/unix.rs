// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Unix backend.
//!
//! ```text
//! spawn()
//!   ExecPlan::new()     CStrings for path, argv, envp, cwd (before fork)
//!   error_pipe()        CLOEXEC, write end >= slot count
//!   fork
//!     child:  reset signals, place_descriptors() slot i --> fd i,
//!             gid/uid, chdir, PR_SET_PDEATHSIG (Linux), execve
//!             failure --> errno into the pipe, _exit(127)
//!     parent: EOF --> Ok(pid); errno --> reap child, SpawnFailed
//!
//! wait_exited()  waitid(P_PID, WEXITED | WNOWAIT)   Linux: block, don't reap
//! reap()         wait4(pid)  --> ExitStatus + rusage
//! send()         kill(pid, sig), ESRCH --> NoSuchProcess
//! ```

use std::ffi::{CString, OsStr};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;
use std::time::Duration;

use nix::errno::Errno;
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
use nix::fcntl::OFlag;
use nix::fcntl::{FcntlArg, fcntl};
use nix::sys::signal::{self as nix_signal, SigHandler, SigSet, Signal as NixSignal};
use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult, Pid as NixPid};

use crate::core::process::attr::ProcAttr;
use crate::core::process::handle::RawDescriptor;
use crate::core::process::pid::Pid;
use crate::core::process::signal::Signal;
use crate::core::process::state::{ExitStatus, ProcessState};
use crate::error::ProcessError;

/// Whether `wait_exited` can block until exit without reaping the child.
pub(crate) const WAITS_WITHOUT_REAPING: bool = cfg!(any(target_os = "linux", target_os = "android"));

/// Extra attributes understood by the Unix backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysAttributes {
    /// User id the child switches to before exec.
    pub uid: Option<u32>,
    /// Group id the child switches to before exec.
    pub gid: Option<u32>,
    /// Signal delivered to the child when the spawning thread exits (Linux only).
    pub parent_death_signal: Option<Signal>,
}

/// The Unix backend needs nothing beyond the PID.
#[derive(Debug)]
pub(crate) struct ProcessHandle;

impl ProcessHandle {
    /// Blocks until the child has exited, leaving it waitable.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub(crate) fn wait_exited(&self, pid: Pid) -> Result<(), ProcessError> {
        use nix::sys::wait::{Id, WaitPidFlag, waitid};

        let target = NixPid::from_raw(pid.as_raw());
        loop {
            match waitid(Id::Pid(target), WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT) {
                // EINVAL: the child exited with a status nix cannot name (a
                // real-time signal). reap() decodes the raw status.
                Ok(_) | Err(Errno::EINVAL) => return Ok(()),
                Err(Errno::EINTR) => {}
                Err(Errno::ECHILD) => return Err(ProcessError::NoSuchProcess { pid }),
                Err(e) => {
                    return Err(ProcessError::WaitFailed {
                        pid,
                        source: e.into(),
                    });
                }
            }
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    pub(crate) fn wait_exited(&self, pid: Pid) -> Result<(), ProcessError> {
        let _ = pid;
        Ok(())
    }

    /// Reaps the child, blocking until it exits.
    pub(crate) fn reap(&self, pid: Pid) -> Result<ProcessState, ProcessError> {
        let mut status: libc::c_int = 0;
        // SAFETY: rusage is plain old data; all-zero is a valid value.
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };

        loop {
            // SAFETY: both out-pointers are valid for the duration of the call.
            let rc = unsafe { libc::wait4(pid.as_raw(), &raw mut status, 0, &raw mut usage) };
            if rc != -1 {
                break;
            }
            match Errno::last() {
                Errno::EINTR => {}
                Errno::ECHILD => return Err(ProcessError::NoSuchProcess { pid }),
                e => {
                    return Err(ProcessError::WaitFailed {
                        pid,
                        source: e.into(),
                    });
                }
            }
        }

        let exit = if libc::WIFEXITED(status) {
            ExitStatus::Exited {
                code: libc::WEXITSTATUS(status),
            }
        } else if libc::WIFSIGNALED(status) {
            ExitStatus::Signaled {
                signal: libc::WTERMSIG(status),
                core_dumped: libc::WCOREDUMP(status),
            }
        } else {
            return Err(ProcessError::WaitFailed {
                pid,
                source: io::Error::other(format!("unexpected wait status {status:#x}")),
            });
        };

        Ok(ProcessState::new(
            pid,
            exit,
            duration_from_timeval(usage.ru_utime),
            duration_from_timeval(usage.ru_stime),
        ))
    }

    /// Sends `signal` to the child. Never blocks.
    pub(crate) fn send(&self, pid: Pid, signal: Signal) -> Result<(), ProcessError> {
        match nix_signal::kill(NixPid::from_raw(pid.as_raw()), to_nix(signal)) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(ProcessError::NoSuchProcess { pid }),
            Err(e) => Err(ProcessError::SignalFailed {
                pid,
                signal,
                source: e.into(),
            }),
        }
    }
}

/// Exit status of a child whose exec failed. The parent reaps it and reports
/// the errno from the error pipe instead.
const EXEC_FAILED_STATUS: libc::c_int = 127;

/// Forks and execs `program`.
///
/// The child reports a failed setup or exec through a close-on-exec pipe that
/// sits above every descriptor slot, so placing descriptors never clobbers it.
/// EOF on the pipe means the exec went through.
pub(crate) fn spawn(
    program: &Path,
    argv: &[&OsStr],
    attr: &ProcAttr,
) -> Result<(Pid, ProcessHandle), ProcessError> {
    let mut plan = ExecPlan::new(program, argv, attr)?;
    let floor = RawFd::try_from(plan.sources.len())
        .unwrap_or(RawFd::MAX)
        .max(3);
    let (report_rx, report_tx) =
        error_pipe(floor).map_err(|e| ProcessError::spawn_failed(program, e))?;

    // SAFETY: the child only runs `ExecPlan::exec`, which makes
    // async-signal-safe calls on memory prepared before the fork.
    match unsafe { unistd::fork() } {
        Err(e) => Err(ProcessError::spawn_failed(program, e.into())),
        Ok(ForkResult::Child) => plan.exec(report_tx.as_raw_fd()),
        Ok(ForkResult::Parent { child }) => {
            drop(report_tx);
            match read_exec_error(&report_rx) {
                Ok(None) => Ok((Pid::from_raw(child.as_raw()), ProcessHandle)),
                Ok(Some(cause)) | Err(cause) => {
                    discard(child);
                    Err(ProcessError::spawn_failed(program, cause))
                }
            }
        }
    }
}

/// Everything the child needs, built before the fork so the child never
/// allocates.
struct ExecPlan {
    program: CString,
    _argv: Vec<CString>,
    _envp: Vec<CString>,
    argv_ptrs: Vec<*const libc::c_char>,
    envp_ptrs: Vec<*const libc::c_char>,
    dir: Option<CString>,
    /// `sources[i]` becomes descriptor `i`. Empty means inherit stdio.
    sources: Vec<RawFd>,
    uid: Option<u32>,
    gid: Option<u32>,
    death_signal: Option<libc::c_int>,
}

impl ExecPlan {
    fn new(program: &Path, argv: &[&OsStr], attr: &ProcAttr) -> Result<Self, ProcessError> {
        let invalid = |e: io::Error| ProcessError::spawn_failed(program, e);

        let program_c = c_string(program.as_os_str().as_bytes().to_vec()).map_err(invalid)?;
        let argv: Vec<CString> = if argv.is_empty() {
            vec![program_c.clone()]
        } else {
            argv.iter()
                .map(|arg| c_string(arg.as_bytes().to_vec()))
                .collect::<io::Result<_>>()
                .map_err(invalid)?
        };
        let envp: Vec<CString> = attr
            .environment()
            .resolved()
            .into_iter()
            .map(|(key, value)| {
                let mut entry = key.into_vec();
                entry.push(b'=');
                entry.extend(value.into_vec());
                c_string(entry)
            })
            .collect::<io::Result<_>>()
            .map_err(invalid)?;
        let dir = attr
            .working_dir()
            .map(|dir| c_string(dir.as_os_str().as_bytes().to_vec()))
            .transpose()
            .map_err(invalid)?;

        let mut sources: Vec<RawFd> = attr
            .files()
            .iter()
            .map(|f| f.as_ref().map_or(-1, |h| h.raw_descriptor()))
            .collect();
        if !sources.is_empty() && sources.len() < 3 {
            sources.resize(3, -1);
        }

        let sys = attr.sys_attributes();
        let death_signal = sys.parent_death_signal.map(death_signal_number).transpose()?;

        Ok(Self {
            argv_ptrs: null_terminated(&argv),
            envp_ptrs: null_terminated(&envp),
            program: program_c,
            _argv: argv,
            _envp: envp,
            dir,
            sources,
            uid: sys.uid,
            gid: sys.gid,
            death_signal,
        })
    }

    /// Runs in the forked child and never returns. Must not allocate.
    fn exec(&mut self, report: RawFd) -> ! {
        let errno = match self.prepare() {
            Ok(()) => {
                // SAFETY: both arrays are NULL-terminated and point into
                // CStrings owned by self.
                unsafe {
                    libc::execve(
                        self.program.as_ptr(),
                        self.argv_ptrs.as_ptr(),
                        self.envp_ptrs.as_ptr(),
                    );
                }
                Errno::last_raw()
            }
            Err(e) => e as i32,
        };
        let bytes = errno.to_ne_bytes();
        // SAFETY: write and _exit are async-signal-safe.
        unsafe {
            libc::write(report, bytes.as_ptr().cast(), bytes.len());
            libc::_exit(EXEC_FAILED_STATUS)
        }
    }

    fn prepare(&mut self) -> Result<(), Errno> {
        reset_signals()?;
        if !self.sources.is_empty() {
            place_descriptors(&mut self.sources)?;
        }
        // SAFETY: setgid, getuid, setgroups, setuid and chdir are
        // async-signal-safe and only touch this process.
        unsafe {
            if let Some(gid) = self.gid {
                Errno::result(libc::setgid(gid))?;
            }
            if let Some(uid) = self.uid {
                // Leaving root also leaves its supplementary groups.
                if libc::getuid() == 0 {
                    libc::setgroups(0, std::ptr::null());
                }
                Errno::result(libc::setuid(uid))?;
            }
            if let Some(dir) = &self.dir {
                Errno::result(libc::chdir(dir.as_ptr()))?;
            }
        }
        if let Some(signal) = self.death_signal {
            set_death_signal(signal)?;
        }
        Ok(())
    }
}

fn c_string(bytes: Vec<u8>) -> io::Result<CString> {
    CString::new(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

fn null_terminated(strings: &[CString]) -> Vec<*const libc::c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(std::ptr::null()))
        .collect()
}

/// Unblocks every signal and restores the default `SIGPIPE` disposition,
/// which the Rust runtime sets to ignore.
fn reset_signals() -> Result<(), Errno> {
    SigSet::empty().thread_set_mask()?;
    // SAFETY: installing SIG_DFL registers no handler.
    unsafe { nix_signal::signal(NixSignal::SIGPIPE, SigHandler::SigDfl) }?;
    Ok(())
}

/// A close-on-exec pipe whose write end is at or above `floor`.
fn error_pipe(floor: RawFd) -> io::Result<(OwnedFd, OwnedFd)> {
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC)?;
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    )))]
    let (read, write) = unistd::pipe()?;

    Ok((dup_cloexec(&read, 0)?, dup_cloexec(&write, floor)?))
}

fn dup_cloexec(fd: &OwnedFd, floor: RawFd) -> io::Result<OwnedFd> {
    let raw = fcntl(fd, FcntlArg::F_DUPFD_CLOEXEC(floor))?;
    // SAFETY: fcntl just created `raw` and nothing else owns it.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

/// Reads the child's errno. `None` means the pipe closed on a successful exec.
fn read_exec_error(pipe: &OwnedFd) -> io::Result<Option<io::Error>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match unistd::read(pipe, &mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(Errno::EINTR) => {}
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(io::Error::from_raw_os_error(i32::from_ne_bytes(buf)))),
        n => Err(io::Error::other(format!(
            "short read of {n} bytes from exec error pipe"
        ))),
    }
}

/// Kills and reaps a child that never made it to exec.
fn discard(child: NixPid) {
    let _ = nix_signal::kill(child, NixSignal::SIGKILL);
    while let Err(Errno::EINTR) = waitpid(child, None) {}
}

/// Makes `sources[i]` descriptor `i` in the child.
///
/// Runs in the forked child. Must not allocate.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn place_descriptors(sources: &mut [RawFd]) -> Result<(), Errno> {
    let floor = sources.len() as RawFd;

    // Move every source out of the target range so no dup2 clobbers one
    // that is still needed. The copies are close-on-exec.
    for fd in sources.iter_mut() {
        if (0..floor).contains(fd) {
            // SAFETY: fcntl(F_DUPFD_CLOEXEC) is async-signal-safe.
            *fd = Errno::result(unsafe { libc::fcntl(*fd, libc::F_DUPFD_CLOEXEC, floor) })?;
        }
    }

    for (target, fd) in sources.iter().enumerate() {
        let target = target as RawFd;
        if *fd >= 0 {
            // SAFETY: dup2 is async-signal-safe; the new descriptor is inheritable.
            Errno::result(unsafe { libc::dup2(*fd, target) })?;
        } else if target < 3 {
            connect_null(target)?;
        }
    }

    Ok(())
}

fn connect_null(target: RawFd) -> Result<(), Errno> {
    // SAFETY: open with a static C string is async-signal-safe.
    let null = Errno::result(unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_RDWR) })?;
    if null != target {
        // SAFETY: dup2 and close are async-signal-safe; `null` is owned here.
        unsafe {
            Errno::result(libc::dup2(null, target))?;
            libc::close(null);
        }
    }
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[allow(clippy::unnecessary_wraps)]
const fn death_signal_number(signal: Signal) -> Result<libc::c_int, ProcessError> {
    Ok(to_nix(signal) as libc::c_int)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const fn death_signal_number(_signal: Signal) -> Result<libc::c_int, ProcessError> {
    Err(ProcessError::not_implemented("parent death signal"))
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[allow(clippy::cast_sign_loss)]
fn set_death_signal(signal: libc::c_int) -> Result<(), Errno> {
    // SAFETY: prctl(PR_SET_PDEATHSIG) is async-signal-safe and only affects
    // this process.
    Errno::result(unsafe { libc::prctl(libc::PR_SET_PDEATHSIG, signal as libc::c_ulong) })
        .map(drop)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const fn set_death_signal(_signal: libc::c_int) -> Result<(), Errno> {
    Ok(())
}

fn duration_from_timeval(tv: libc::timeval) -> Duration {
    let secs = u64::try_from(tv.tv_sec).unwrap_or_default();
    let micros = u64::try_from(tv.tv_usec).unwrap_or_default();
    Duration::from_secs(secs) + Duration::from_micros(micros)
}

const fn to_nix(signal: Signal) -> NixSignal {
    match signal {
        Signal::Hangup => NixSignal::SIGHUP,
        Signal::Interrupt => NixSignal::SIGINT,
        Signal::Quit => NixSignal::SIGQUIT,
        Signal::Abort => NixSignal::SIGABRT,
        Signal::Kill => NixSignal::SIGKILL,
        Signal::User1 => NixSignal::SIGUSR1,
        Signal::User2 => NixSignal::SIGUSR2,
        Signal::Pipe => NixSignal::SIGPIPE,
        Signal::Alarm => NixSignal::SIGALRM,
        Signal::Terminate => NixSignal::SIGTERM,
    }
}

#[allow(clippy::unnecessary_wraps)]
pub(crate) const fn signal_number(signal: Signal) -> Option<i32> {
    Some(to_nix(signal) as i32)
}

pub(crate) const fn signal_supported(_signal: Signal) -> bool {
    true
}

pub(crate) fn current_pid() -> Pid {
    Pid::from_raw(unistd::getpid().as_raw())
}

pub(crate) fn parent_pid() -> Pid {
    Pid::from_raw(unistd::getppid().as_raw())
}

pub(crate) fn descriptor_is_open(fd: RawDescriptor) -> bool {
    // SAFETY: F_GETFD only queries the descriptor table.
    fd >= 0 && unsafe { libc::fcntl(fd, libc::F_GETFD) } != -1
}
