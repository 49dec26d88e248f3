//! Mastermind as a reinforcement-learning environment
//!
//! This crate provides:
//! - The Mastermind game engine: code scoring, board state and episode lifecycle
//! - A tabular Q-learning agent that learns to crack codes by trial and error
//! - A training pipeline with observers, and a command-line harness

pub mod cli;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
pub use game::{
    ActionSpace, BoardState, Code, EpisodeOutcome, Feedback, GameConfig, MastermindEnv, Step,
    score,
};
pub use q_learning::{QLearningAgent, QLearningConfig, QTable};
