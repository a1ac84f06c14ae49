mod predictor;
mod storage;
mod training;

pub use predictor::{IExternalAssessor, IInternalPredictor};
pub use storage::{
    ICalibrationStorage, ICorrectionStorage, IDecisionStorage, ILeaseStorage, IModelRegistry,
    IRetrainingJobStorage,
};
pub use training::{ITrainingRunner, TrainingOutput, TrainingRequest};
