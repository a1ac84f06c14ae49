//! Periodic eligibility check that launches retraining when due.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use surveyor_core::errors::{RetrainingError, SurveyorError};

use crate::coordinator::{RetrainingCoordinator, RetrainingOutcome};

pub struct RetrainingScheduler {
    coordinator: Arc<RetrainingCoordinator>,
    poll_interval: Duration,
}

/// Running scheduler task plus the means to stop it.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the loop to exit. An in-flight run is
    /// allowed to finish first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "retraining scheduler task panicked");
        }
    }
}

impl RetrainingScheduler {
    pub fn new(coordinator: Arc<RetrainingCoordinator>, poll_interval: Duration) -> Self {
        Self {
            coordinator,
            poll_interval,
        }
    }

    /// Poll interval from the coordinator's `scheduler_poll_secs`.
    pub fn from_config(coordinator: Arc<RetrainingCoordinator>) -> Self {
        let secs = coordinator.config().scheduler_poll_secs.max(1);
        Self::new(coordinator, Duration::from_secs(secs))
    }

    /// Spawn the polling loop on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        SchedulerHandle { shutdown: tx, task }
    }

    /// Poll until `shutdown` flips to true or its sender is dropped. The
    /// first check happens immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            poll_secs = self.poll_interval.as_secs(),
            "retraining scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("retraining scheduler stopped");
    }

    /// One eligibility check, running retraining when due. Storage and
    /// training both block, so the work goes to the blocking pool.
    pub async fn tick(&self) -> Option<RetrainingOutcome> {
        let coordinator = Arc::clone(&self.coordinator);
        let task = tokio::task::spawn_blocking(move || coordinator.trigger_if_eligible());
        let result = match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "retraining task panicked");
                return None;
            }
        };

        match result {
            Ok(outcome) => Some(outcome),
            Err(SurveyorError::RetrainingError(RetrainingError::NotEligible { reason })) => {
                debug!(reason = %reason, "retraining not eligible");
                None
            }
            Err(SurveyorError::RetrainingError(
                e @ (RetrainingError::AlreadyInProgress | RetrainingError::LeaseHeld { .. }),
            )) => {
                info!(reason = %e, "retraining skipped");
                None
            }
            Err(e) => {
                error!(error = %e, "scheduled retraining failed");
                None
            }
        }
    }
}
