//! Administrator privileges for the duration of a run.
//!
//! Several targets live in protected system locations. The run authenticates
//! with `sudo -v` once, then a background thread refreshes the cached
//! credentials until the [`SudoKeepAlive`] guard is dropped or its
//! [`StopHandle`] is triggered (the interrupt handler holds one).

use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{CleanupError, Result};
use crate::logging::Logger;

const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Whether the process already runs with an effective uid of 0.
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Stops the refresh thread. Cloneable and idempotent.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    sender: Arc<Mutex<Option<Sender<()>>>>,
}

impl StopHandle {
    pub fn stop(&self) {
        // Dropping the sender disconnects the worker's receiver.
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }
}

/// Scoped credential refresh. Dropping the guard stops and joins the worker.
#[derive(Debug)]
pub struct SudoKeepAlive {
    stop: StopHandle,
    worker: Option<JoinHandle<()>>,
}

impl SudoKeepAlive {
    /// Authenticate with `sudo -v` and start refreshing the credentials.
    ///
    /// When already root no authentication happens and no thread is started.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::PrivilegeRefused`] if `sudo` is missing or the
    /// operator fails to authenticate.
    pub fn acquire(log: &Logger) -> Result<Self> {
        if is_root() {
            return Ok(Self::inactive());
        }

        log.info("Administrator privileges are needed to clean system locations.");
        let status = Command::new("sudo")
            .arg("-v")
            .status()
            .map_err(|err| CleanupError::PrivilegeRefused(format!("failed to run sudo: {err}")))?;
        if !status.success() {
            return Err(CleanupError::PrivilegeRefused(format!(
                "sudo exited with {status}"
            )));
        }

        Ok(Self::spawn(REFRESH_INTERVAL, || {
            let _ = Command::new("sudo")
                .args(["-n", "true"])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }))
    }

    /// A guard with nothing to refresh.
    pub fn inactive() -> Self {
        Self {
            stop: StopHandle::default(),
            worker: None,
        }
    }

    pub(crate) fn spawn<F>(interval: Duration, refresh: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<()>();
        let worker = thread::spawn(move || {
            while let Err(RecvTimeoutError::Timeout) = receiver.recv_timeout(interval) {
                refresh();
            }
        });

        Self {
            stop: StopHandle {
                sender: Arc::new(Mutex::new(Some(sender))),
            },
            worker: Some(worker),
        }
    }

    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl Drop for SudoKeepAlive {
    fn drop(&mut self) {
        self.stop.stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_guard(interval: Duration) -> (SudoKeepAlive, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let guard = SudoKeepAlive::spawn(interval, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (guard, count)
    }

    #[test]
    fn test_refreshes_until_dropped() {
        let (guard, count) = counting_guard(Duration::from_millis(5));
        assert!(guard.is_active());

        thread::sleep(Duration::from_millis(60));
        drop(guard);
        let after_drop = count.load(Ordering::SeqCst);
        assert!(after_drop > 0);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn test_stop_handle_ends_worker_early() {
        let (guard, count) = counting_guard(Duration::from_secs(3600));
        let handle = guard.stop_handle();

        handle.stop();
        handle.stop();
        drop(guard);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inactive_guard_has_no_worker() {
        let guard = SudoKeepAlive::inactive();
        assert!(!guard.is_active());
        guard.stop_handle().stop();
    }
}
