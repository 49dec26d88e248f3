//! Mastermind game implementation

pub mod board;
pub mod code;
pub mod environment;
pub mod feedback;

pub use board::BoardState;
pub use code::{ActionSpace, Code, Colour};
pub use environment::{
    EpisodeOutcome, GUESS_REWARD, GameConfig, MAX_ACTION_SPACE, MAX_PEGS, MastermindEnv, Step,
    WIN_BONUS,
};
pub use feedback::{Feedback, score};
