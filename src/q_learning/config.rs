//! Hyperparameters for the Q-learning agent

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Q-learning hyperparameters.
///
/// # Examples
///
/// ```
/// use mastermind::q_learning::QLearningConfig;
///
/// let config = QLearningConfig::default()
///     .with_eps(0.3)
///     .with_eps_decay(0.999, 0.01)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub eps: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Multiplicative ε decay applied at the end of each episode (1.0 keeps ε fixed)
    pub eps_decay: f64,
    /// Floor for the decayed ε
    pub min_eps: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn new(gamma: f64, eps: f64, alpha: f64) -> Self {
        Self {
            gamma,
            eps,
            alpha,
            ..Self::default()
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Decay ε by `decay` after every episode, never going below `min_eps`.
    pub fn with_eps_decay(mut self, decay: f64, min_eps: f64) -> Self {
        self.eps_decay = decay;
        self.min_eps = min_eps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless γ, ε and the ε floor lie
    /// in `[0, 1]` and α and the ε decay lie in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::config(format!("{name} must be in [0, 1], got {value}")))
            }
        };
        let positive_unit = |name: &str, value: f64| -> Result<()> {
            if value.is_finite() && value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(Error::config(format!("{name} must be in (0, 1], got {value}")))
            }
        };

        unit("gamma", self.gamma)?;
        unit("eps", self.eps)?;
        unit("min_eps", self.min_eps)?;
        positive_unit("alpha", self.alpha)?;
        positive_unit("eps_decay", self.eps_decay)?;
        if self.min_eps > self.eps {
            return Err(Error::config(format!(
                "min_eps ({}) must not exceed eps ({})",
                self.min_eps, self.eps
            )));
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            eps: 0.15,
            alpha: 0.2,
            eps_decay: 1.0,
            min_eps: 0.0,
            seed: None,
        }
    }
}
