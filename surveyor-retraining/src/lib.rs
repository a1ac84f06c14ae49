//! # surveyor-retraining
//!
//! Continuous-learning loop for the internal damage classifier. Watches
//! approved corrections, runs an external training process when a run is
//! eligible, and registers the resulting model version. Activation stays an
//! explicit administrative step.

pub mod artifacts;
pub mod coordinator;
pub mod dataset;
pub mod guard;
pub mod runner;
pub mod scheduler;

pub use coordinator::{RetrainingCoordinator, RetrainingOutcome, RetrainingStatus};
pub use guard::{RunFlag, RunGuard};
pub use runner::ProcessTrainingRunner;
pub use scheduler::{RetrainingScheduler, SchedulerHandle};
