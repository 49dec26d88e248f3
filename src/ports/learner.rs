//! Learner port - abstraction for agents that play the environment

use crate::{
    Result,
    game::{BoardState, Code},
};

/// One observed environment transition, borrowed from the driver loop.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub state: &'a BoardState,
    pub action: &'a Code,
    pub reward: f64,
    pub next_state: &'a BoardState,
    /// Whether this transition ended the episode. The Q-learning agent
    /// bootstraps from `next_state` regardless; other learners may use it.
    pub done: bool,
}

/// Learner trait - unified interface for agents
///
/// # Examples
///
/// ```no_run
/// use mastermind::{
///     game::MastermindEnv,
///     ports::{Learner, Transition},
/// };
///
/// fn play_episode(env: &mut MastermindEnv, learner: &mut dyn Learner) -> mastermind::Result<()> {
///     let mut state = env.reset(None)?;
///     loop {
///         let action = learner.select_action(&state, false)?;
///         let step = env.step(&action)?;
///         learner.learn(&Transition {
///             state: &state,
///             action: &action,
///             reward: f64::from(step.reward),
///             next_state: &step.state,
///             done: step.done,
///         })?;
///         state = step.state;
///         if step.done {
///             return Ok(());
///         }
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Choose a guess for the given board.
    ///
    /// `test` asks for the learner's best guess with no exploration.
    fn select_action(&mut self, state: &BoardState, test: bool) -> Result<Code>;

    /// Learn from a single transition.
    ///
    /// The default does nothing, suitable for non-adaptive baselines.
    fn learn(&mut self, _transition: &Transition<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once after every training episode.
    fn end_episode(&mut self) {}

    /// Get the learner's name.
    ///
    /// Used for identification in summaries and logging.
    fn name(&self) -> &str;

    /// Reset learner state to initial conditions.
    ///
    /// Adaptive learners clear what they have learned.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this when given a deterministic seed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
