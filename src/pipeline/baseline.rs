//! Baseline learners for comparison against trained agents

use std::sync::Arc;

use rand::{SeedableRng, random, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    game::{ActionSpace, BoardState, Code},
    ports::Learner,
};

/// Random policy learner (baseline)
///
/// Guesses uniformly from the action space and never learns.
pub struct RandomLearner {
    name: String,
    actions: Arc<ActionSpace>,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner
    pub fn new(name: impl Into<String>, actions: Arc<ActionSpace>) -> Self {
        Self {
            name: name.into(),
            actions,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: impl Into<String>, actions: Arc<ActionSpace>, seed: u64) -> Self {
        Self {
            name: name.into(),
            actions,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _state: &BoardState, _test: bool) -> Result<Code> {
        self.actions
            .as_slice()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| Error::config("action space is empty"))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
