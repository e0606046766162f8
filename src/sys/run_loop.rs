//! Helpers for driving and stopping the main run loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use nix::sys::signal::{SigSet, Signal};
use objc2_core_foundation::{CFRetained, CFRunLoop, CFRunLoopRunResult, kCFRunLoopDefaultMode};
use tracing::{info, warn};

/// Upper bound on how long a stop request can go unnoticed while the loop
/// is being entered.
const POLL_INTERVAL_SECS: f64 = 1.0;

/// A core foundation run loop that can be stopped from another thread.
#[derive(Clone)]
pub struct RunLoopHandle {
    run_loop: CFRetained<CFRunLoop>,
    stopped: Arc<AtomicBool>,
}

// SAFETY:
// - CFRunLoop is a CoreFoundation object which is allowed to be used from
//   multiple threads.
// - Other threads only reach `stop()`, which CFRunLoopStop documents as
//   callable from any thread.
unsafe impl Send for RunLoopHandle {}
unsafe impl Sync for RunLoopHandle {}

impl RunLoopHandle {
    pub fn current() -> Option<RunLoopHandle> {
        let run_loop = CFRunLoop::current()?;
        Some(RunLoopHandle { run_loop, stopped: Arc::new(AtomicBool::new(false)) })
    }

    /// Makes [`RunLoopHandle::run`] return, or keeps it from starting.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.run_loop.stop();
        self.run_loop.wake_up();
    }

    pub fn is_stopped(&self) -> bool { self.stopped.load(Ordering::SeqCst) }

    /// Runs the loop until [`RunLoopHandle::stop`] is called or it has no
    /// sources left. Must be called on the thread that owns the loop.
    pub fn run(&self) {
        while !self.is_stopped() {
            let result =
                CFRunLoop::run_in_mode(unsafe { kCFRunLoopDefaultMode }, POLL_INTERVAL_SECS, false);
            if result == CFRunLoopRunResult::Finished {
                break;
            }
        }
    }
}

/// Blocks SIGINT and SIGTERM on the calling thread and stops `handle` when
/// either arrives. Call before spawning any other thread so that they all
/// inherit the mask.
pub fn stop_on_signals(handle: RunLoopHandle) -> anyhow::Result<()> {
    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    signals.thread_block().context("blocking termination signals")?;

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || match signals.wait() {
            Ok(signal) => {
                info!(?signal, "shutting down");
                handle.stop();
            }
            Err(e) => warn!("waiting for signals failed: {e}"),
        })
        .context("spawning the signal thread")?;
    Ok(())
}
