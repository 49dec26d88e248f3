//! Shared command-line configuration

use clap::Args;

use crate::game::GameConfig;

/// Game dimensions shared across commands
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Pegs per code
    #[arg(long, short = 'p', default_value_t = 4)]
    pub pegs: usize,

    /// Number of colours (colours are numbered from 1)
    #[arg(long, short = 'c', default_value_t = 6)]
    pub colours: usize,

    /// Rows (guesses) per episode
    #[arg(long, short = 'r', default_value_t = 10)]
    pub rows: usize,
}

impl GameArgs {
    pub fn to_config(&self) -> GameConfig {
        GameConfig::new(self.pegs, self.colours, self.rows)
    }
}

impl Default for GameArgs {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            pegs: config.n_pegs,
            colours: config.n_colours,
            rows: config.n_rows,
        }
    }
}
