//! CLI subcommands

pub mod score;
pub mod train;
