//! Interrupt handling for host commands
//!
//! Host commands run one at a time, so there is at most one child to worry
//! about. [`ChildSlot`] holds its PID while it runs. On SIGINT, SIGTERM or
//! SIGHUP the signal thread closes the slot and takes down the child's whole
//! process group (yum and the helpers it forks, not just the leader) before
//! the tool exits. A closed slot refuses to start anything new.
//!
//! Children also carry `PR_SET_PDEATHSIG`, so the kernel signals them if the
//! tool dies without reaching its handler.

use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Grace period between SIGTERM and SIGKILL when interrupted.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
struct SlotState {
    running: Option<u32>,
    closed: bool,
}

/// The host command currently running, if any.
#[derive(Debug, Default)]
pub struct ChildSlot {
    state: Mutex<SlotState>,
}

impl ChildSlot {
    /// Slot shared by `SystemRunner` and the signal thread.
    pub fn global() -> &'static ChildSlot {
        static SLOT: OnceLock<ChildSlot> = OnceLock::new();
        SLOT.get_or_init(ChildSlot::default)
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn running(&self) -> Option<u32> {
        self.lock().running
    }

    /// True once shutdown has started.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Hold `pid` as the running command until the returned guard drops.
    ///
    /// If the slot was closed between the caller's check and the spawn, the
    /// new group is killed on the spot.
    pub fn track(&self, pid: u32) -> ActiveChild<'_> {
        let mut state = self.lock();
        if state.closed {
            warn!(pid, "shutting down, killing command that just started");
            if let Err(e) = signal_group(pid, Signal::SIGKILL) {
                warn!(pid, "SIGKILL to process group failed: {}", e);
            }
        } else {
            state.running = Some(pid);
            debug!(pid, "host command started");
        }
        ActiveChild { slot: self, pid }
    }

    /// Close the slot and stop the running command, if there is one.
    ///
    /// The group gets SIGTERM. If its [`ActiveChild`] is still held after
    /// `grace` (the runner has not reaped it), the group gets SIGKILL.
    /// Returns the PID that was stopped.
    pub fn shut_down(&self, grace: Duration) -> Option<u32> {
        let pid = {
            let mut state = self.lock();
            state.closed = true;
            state.running?
        };

        info!(pid, "stopping running host command");
        if let Err(e) = signal_group(pid, Signal::SIGTERM) {
            warn!(pid, "SIGTERM to process group failed: {}", e);
        }

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.running() != Some(pid) {
                return Some(pid);
            }
            thread::sleep(Duration::from_millis(50));
        }

        warn!(pid, "host command still running, sending SIGKILL");
        if let Err(e) = signal_group(pid, Signal::SIGKILL) {
            warn!(pid, "SIGKILL to process group failed: {}", e);
        }
        Some(pid)
    }
}

/// Marks a command as running; clears the slot on drop.
#[derive(Debug)]
pub struct ActiveChild<'a> {
    slot: &'a ChildSlot,
    pid: u32,
}

impl Drop for ActiveChild<'_> {
    fn drop(&mut self) {
        let mut state = self.slot.lock();
        if state.running == Some(self.pid) {
            state.running = None;
            debug!(pid = self.pid, "host command finished");
        }
    }
}

fn signal_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::killpg(Pid::from_raw(pgid as i32), signal)
}

/// Spawn `command` as the leader of a new process group, with SIGTERM as
/// its parent-death signal.
pub fn spawn_isolated(command: &mut Command) -> io::Result<Child> {
    command.process_group(0);
    // SAFETY: prctl is async-signal-safe and touches no parent state
    unsafe {
        command.pre_exec(|| {
            if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
    command.spawn()
}

/// Install handlers for SIGINT, SIGTERM and SIGHUP.
///
/// The first signal stops the running command and exits with `128 + signo`.
pub fn init_signal_handlers() -> io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            info!(signal = sig, "interrupted, cleaning up");
            ChildSlot::global().shut_down(SHUTDOWN_GRACE);
            std::process::exit(128 + sig);
        }
    });

    Ok(())
}
