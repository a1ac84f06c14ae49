//! In-process single-run flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use surveyor_core::errors::RetrainingError;

/// Shared flag marking a retraining run in progress on this instance.
#[derive(Debug, Clone, Default)]
pub struct RunFlag {
    running: Arc<AtomicBool>,
}

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Claim the flag. A second caller is rejected, never queued.
    pub fn try_acquire(&self) -> Result<RunGuard, RetrainingError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| RetrainingError::AlreadyInProgress)?;
        Ok(RunGuard {
            running: Arc::clone(&self.running),
        })
    }
}

/// Clears the flag when dropped, on success, error, or panic unwind.
#[derive(Debug)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
