//! Tabular Q-learning over the Mastermind environment
//!
//! The learner keeps one row of action values per board it has seen. Rows are
//! created lazily (every action at 0.0) the first time [`QLearningAgent::policy`]
//! meets a board, and refined with the off-policy one-step update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use mastermind::{
//!     game::{GameConfig, MastermindEnv},
//!     q_learning::QLearningAgent,
//! };
//!
//! let mut env = MastermindEnv::new(GameConfig::new(2, 3, 4))?;
//! let mut agent = QLearningAgent::new(&env, 0.9, 0.15, 0.2)?.with_seed(42);
//!
//! let mut state = env.reset(None)?;
//! loop {
//!     let action = agent.policy(&state, false);
//!     let step = env.step(&action)?;
//!     agent.update(&state, &action, f64::from(step.reward), &step.state)?;
//!     state = step.state;
//!     if step.done {
//!         break;
//!     }
//! }
//! # Ok::<(), mastermind::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod q_table;

pub use agent::QLearningAgent;
pub use config::QLearningConfig;
pub use q_table::QTable;
