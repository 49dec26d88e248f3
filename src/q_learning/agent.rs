//! Q-learning agent
//!
//! Selects guesses ε-greedily from a [`QTable`] and learns from observed
//! transitions with the off-policy one-step update.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    game::{ActionSpace, BoardState, Code, MastermindEnv},
    ports::{Learner, Transition},
    q_learning::{config::QLearningConfig, q_table::QTable},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent (off-policy TD control)
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    actions: Arc<ActionSpace>,
    q_table: QTable,
    epsilon: f64,
    config: QLearningConfig,
    rng: StdRng,
    /// Seed the RNG is rebuilt from on reset; may differ from `config.seed`
    /// when a driver reseeds the agent.
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent over the environment's action space
    ///
    /// # Arguments
    ///
    /// * `env` - Environment whose action space the agent chooses from
    /// * `gamma` - Discount factor γ
    /// * `eps` - Exploration probability ε
    /// * `alpha` - Learning rate α
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a hyperparameter is out of range.
    pub fn new(env: &MastermindEnv, gamma: f64, eps: f64, alpha: f64) -> Result<Self> {
        Self::from_config(
            Arc::clone(env.actions()),
            QLearningConfig::new(gamma, eps, alpha),
        )
    }

    /// Create an agent from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration is invalid
    /// or the action space is empty.
    pub fn from_config(actions: Arc<ActionSpace>, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        if actions.is_empty() {
            return Err(Error::config("learner needs at least one action"));
        }
        Ok(Self {
            q_table: QTable::new(actions.len(), config.alpha, config.gamma),
            actions,
            epsilon: config.eps,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
            config,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.rng_seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Choose a guess for `state`.
    ///
    /// Unseen states get a fresh row with every action at 0.0. Unless `test`
    /// is set, with probability ε a uniformly random action is returned.
    /// Otherwise one of the highest-valued actions is returned, ties broken
    /// uniformly at random.
    pub fn policy(&mut self, state: &BoardState, test: bool) -> Code {
        let index = self.policy_index(state, test);
        self.actions.as_slice()[index].clone()
    }

    /// Like [`policy`](Self::policy) but returns the action's index in the
    /// action space.
    pub fn policy_index(&mut self, state: &BoardState, test: bool) -> usize {
        self.q_table.ensure_initialized(state);

        if !test && self.rng.random::<f64>() <= self.epsilon {
            return self.rng.random_range(0..self.actions.len());
        }

        let greedy = self.q_table.greedy_actions(state);
        greedy.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// Apply one Q-learning update for the transition
    /// `(state, action, reward, next_state)`.
    ///
    /// `next_state` gets a fresh row if unseen. The bootstrap always uses the
    /// best next-state value, whatever the policy would pick next.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownState`] if `policy` was never called on
    /// `state`, or [`Error::UnknownAction`] if `action` is not in the action
    /// space. Nothing is modified on error.
    pub fn update(
        &mut self,
        state: &BoardState,
        action: &Code,
        reward: f64,
        next_state: &BoardState,
    ) -> Result<()> {
        let index = self
            .actions
            .index_of(action)
            .ok_or_else(|| Error::UnknownAction {
                action: action.to_string(),
            })?;
        self.q_table
            .q_learning_update(state, index, reward, next_state)?;
        Ok(())
    }

    /// Action values for `state`, in action-space order.
    pub fn q_values(&self, state: &BoardState) -> Option<&[f64]> {
        self.q_table.values(state)
    }

    /// Value of one state-action pair, if known.
    pub fn q_value(&self, state: &BoardState, action: &Code) -> Option<f64> {
        self.actions
            .index_of(action)
            .and_then(|index| self.q_table.get(state, index))
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn actions(&self) -> &Arc<ActionSpace> {
        &self.actions
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Current exploration probability
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of states with a value row
    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }

    /// Decay epsilon after episode
    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.eps_decay).max(self.config.min_eps);
    }
}

impl Learner for QLearningAgent {
    fn select_action(&mut self, state: &BoardState, test: bool) -> Result<Code> {
        Ok(self.policy(state, test))
    }

    fn learn(&mut self, transition: &Transition<'_>) -> Result<()> {
        self.update(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
        )
    }

    fn end_episode(&mut self) {
        self.decay_epsilon();
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        self.q_table.clear();
        self.epsilon = self.config.eps;
        self.rng = build_rng(self.rng_seed);
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng_seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
