//! Command-line interface for training and inspecting Mastermind agents

pub mod commands;
pub mod config;
pub mod output;
