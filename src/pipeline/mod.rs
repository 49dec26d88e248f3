//! Training and evaluation pipeline
//!
//! This module provides:
//! - The episode-looping driver that connects a learner to the environment
//! - Observers for progress, metrics and episode traces
//! - A random baseline learner

pub mod baseline;
pub mod observers;
pub mod training;

pub use baseline::RandomLearner;
pub use observers::{
    JsonlObserver, Metrics, MetricsHandle, MetricsObserver, Observation, ProgressObserver,
    StepObservation,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Learner, Observer};
