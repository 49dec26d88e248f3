//! Observer port - abstraction for watching training runs
//!
//! Observers collect data during a run without coupling the driver loop to
//! any particular output.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    game::{Code, EpisodeOutcome, Feedback},
};

/// What happened in one finished episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub outcome: EpisodeOutcome,
    /// Guesses made
    pub turns: usize,
    /// Sum of step rewards
    pub total_reward: i32,
    pub secret: Code,
}

impl EpisodeSummary {
    pub fn is_win(&self) -> bool {
        matches!(self.outcome, EpisodeOutcome::Solved { .. })
    }
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - once per guess
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use mastermind::ports::{EpisodeSummary, Observer};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         summary: &EpisodeSummary,
///     ) -> mastermind::Result<()> {
///         if summary.is_win() {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each guess has been scored.
    ///
    /// `turn` is 0-based.
    fn on_step(
        &mut self,
        _episode: usize,
        _turn: usize,
        _action: &Code,
        _feedback: Feedback,
        _reward: i32,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
