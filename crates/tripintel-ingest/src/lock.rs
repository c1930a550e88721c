//! Process-wide run lock.
//!
//! The pipeline hits a rate-limited upstream, so only one ingestion may run
//! per process regardless of who triggered it (CLI, API, scheduler).

use std::sync::atomic::{AtomicBool, Ordering};

static RUN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard for the ingestion run lock; releases on drop.
#[derive(Debug)]
pub struct RunLock {
    _priv: (),
}

/// Attempts to take the run lock. Returns `None` when another ingestion is
/// already in flight.
pub fn try_acquire() -> Option<RunLock> {
    RUN_ACTIVE
        .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        .ok()
        .map(|_| RunLock { _priv: () })
}

impl Drop for RunLock {
    fn drop(&mut self) {
        RUN_ACTIVE.store(false, Ordering::Release);
    }
}

// The lock is process-global; every unit test that touches it must hold this
// mutex so the parallel test runner cannot interleave them.
#[cfg(test)]
pub(crate) static TEST_SERIAL: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_is_exclusive_and_released_on_drop() {
        let _serial = TEST_SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let guard = try_acquire().expect("lock should be free initially");
        assert!(try_acquire().is_none(), "second acquire must fail while held");

        drop(guard);
        let reacquired = try_acquire();
        assert!(reacquired.is_some(), "lock must be free again after drop");
    }
}
