//! Ports (trait boundaries) between the driver loop and its collaborators.
//!
//! The training pipeline only talks to learners and observers through these
//! traits, so new agents or sinks plug in without touching the loop.

pub mod learner;
pub mod observer;

pub use learner::{Learner, Transition};
pub use observer::{EpisodeSummary, Observer};
