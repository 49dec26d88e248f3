//! Episode-looping driver for learners in the Mastermind environment

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    game::{Code, EpisodeOutcome, MastermindEnv},
    ports::{EpisodeSummary, Learner, Observer, Transition},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Random seed for the environment and learner
    pub seed: Option<u64>,

    /// Play every episode against this secret instead of a random one
    pub secret: Option<Code>,

    /// Log the rendered board every N episodes
    pub render_every: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            seed: None,
            secret: None,
            render_every: None,
        }
    }
}

/// Result of a training or evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Episodes where the secret was found
    pub wins: usize,

    /// Episodes that ran out of rows
    pub exhausted: usize,

    /// Fraction of episodes won
    pub win_rate: f64,

    /// Mean guesses per episode
    pub mean_turns: f64,

    /// Mean total reward per episode
    pub mean_reward: f64,
}

impl TrainingResult {
    /// Build a result from run totals
    pub fn new(total_episodes: usize, wins: usize, total_turns: usize, total_reward: i64) -> Self {
        let (win_rate, mean_turns, mean_reward) = if total_episodes > 0 {
            let n = total_episodes as f64;
            (
                wins as f64 / n,
                total_turns as f64 / n,
                total_reward as f64 / n,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        Self {
            total_episodes,
            wins,
            exhausted: total_episodes - wins,
            win_rate,
            mean_turns,
            mean_reward,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train: the learner explores and learns from every transition.
    pub fn run(
        &mut self,
        env: &mut MastermindEnv,
        learner: &mut dyn Learner,
    ) -> Result<TrainingResult> {
        self.seed_pair(env, learner)?;
        let result = self.run_episodes(env, learner, self.config.episodes, true)?;
        info!(
            learner = learner.name(),
            episodes = result.total_episodes,
            win_rate = result.win_rate,
            mean_turns = result.mean_turns,
            "training finished"
        );
        Ok(result)
    }

    /// Evaluate: the learner plays greedily (`test = true`) and learns nothing.
    pub fn evaluate(
        &mut self,
        env: &mut MastermindEnv,
        learner: &mut dyn Learner,
        episodes: usize,
    ) -> Result<TrainingResult> {
        let result = self.run_episodes(env, learner, episodes, false)?;
        info!(
            learner = learner.name(),
            episodes = result.total_episodes,
            win_rate = result.win_rate,
            mean_turns = result.mean_turns,
            "evaluation finished"
        );
        Ok(result)
    }

    fn seed_pair(&self, env: &mut MastermindEnv, learner: &mut dyn Learner) -> Result<()> {
        if let Some(seed) = self.config.seed {
            env.set_rng_seed(seed);
            learner.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }

    fn run_episodes(
        &mut self,
        env: &mut MastermindEnv,
        learner: &mut dyn Learner,
        episodes: usize,
        learn: bool,
    ) -> Result<TrainingResult> {
        let mut wins = 0;
        let mut total_turns = 0;
        let mut total_reward = 0i64;

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        for episode in 0..episodes {
            let summary = self.play_episode(episode, env, learner, learn)?;

            if summary.is_win() {
                wins += 1;
            }
            total_turns += summary.turns;
            total_reward += i64::from(summary.total_reward);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(
            episodes,
            wins,
            total_turns,
            total_reward,
        ))
    }

    fn play_episode(
        &mut self,
        episode: usize,
        env: &mut MastermindEnv,
        learner: &mut dyn Learner,
        learn: bool,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state = env.reset(self.config.secret.as_ref())?;
        let mut total_reward = 0;

        let outcome = loop {
            let turn = env.turn();
            let action = learner.select_action(&state, !learn)?;
            let step = env.step(&action)?;

            for observer in &mut self.observers {
                observer.on_step(episode, turn, &action, step.feedback, step.reward)?;
            }

            if learn {
                learner.learn(&Transition {
                    state: &state,
                    action: &action,
                    reward: f64::from(step.reward),
                    next_state: &step.state,
                    done: step.done,
                })?;
            }

            total_reward += step.reward;
            state = step.state;

            if let Some(outcome) = step.outcome {
                break outcome;
            }
        };

        if learn {
            learner.end_episode();
        }

        if self
            .config
            .render_every
            .is_some_and(|every| every > 0 && episode.is_multiple_of(every))
        {
            info!(episode, "\n{}", env.render());
        }

        let secret = env.secret().cloned().unwrap_or_else(|| Code::new(Vec::new()));
        let turns = state.rows_played();
        debug!(
            episode,
            turns,
            total_reward,
            solved = matches!(outcome, EpisodeOutcome::Solved { .. }),
            "episode finished"
        );

        Ok(EpisodeSummary {
            outcome,
            turns,
            total_reward,
            secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{BoardState, GameConfig},
        pipeline::{RandomLearner, observers::MetricsObserver},
        q_learning::QLearningAgent,
    };

    #[test]
    fn test_training_pipeline_counts_episodes() {
        let config = TrainingConfig {
            episodes: 25,
            seed: Some(42),
            ..TrainingConfig::default()
        };
        let mut env = MastermindEnv::new(GameConfig::new(2, 3, 4)).unwrap();
        let mut learner = RandomLearner::new("Random", env.actions().clone());

        let result = TrainingPipeline::new(config)
            .run(&mut env, &mut learner)
            .unwrap();

        assert_eq!(result.total_episodes, 25);
        assert_eq!(result.wins + result.exhausted, 25);
        assert!(result.mean_turns >= 1.0 && result.mean_turns <= 4.0);
    }

    #[test]
    fn test_evaluation_does_not_learn() {
        let mut env = MastermindEnv::new(GameConfig::new(1, 2, 3)).unwrap();
        let mut agent = QLearningAgent::new(&env, 0.9, 0.15, 0.2)
            .unwrap()
            .with_seed(5);
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 0,
            seed: Some(5),
            ..TrainingConfig::default()
        });

        pipeline.evaluate(&mut env, &mut agent, 10).unwrap();
        let empty = BoardState::new(3, 1);
        assert_eq!(agent.q_values(&empty), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut env = MastermindEnv::new(GameConfig::new(2, 3, 5)).unwrap();
            let mut agent = QLearningAgent::new(&env, 0.9, 0.2, 0.3).unwrap();
            TrainingPipeline::new(TrainingConfig {
                episodes: 200,
                seed: Some(9),
                ..TrainingConfig::default()
            })
            .run(&mut env, &mut agent)
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_observers_see_every_episode() {
        let mut env = MastermindEnv::new(GameConfig::new(1, 3, 3)).unwrap();
        let mut learner = RandomLearner::with_seed("Random", env.actions().clone(), 3);
        let metrics = MetricsObserver::new();
        let handle = metrics.handle();

        TrainingPipeline::new(TrainingConfig {
            episodes: 12,
            secret: Some(Code::new([2])),
            ..TrainingConfig::default()
        })
        .with_observer(Box::new(metrics))
        .run(&mut env, &mut learner)
        .unwrap();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.total_episodes, 12);
        assert_eq!(snapshot.episode_turns.len(), 12);
        assert!(snapshot.episode_turns.iter().all(|&t| (1..=3).contains(&t)));
    }

    struct DoneRecorder {
        inner: RandomLearner,
        flags: Vec<bool>,
    }

    impl Learner for DoneRecorder {
        fn select_action(&mut self, state: &BoardState, test: bool) -> Result<Code> {
            self.inner.select_action(state, test)
        }

        fn learn(&mut self, transition: &Transition<'_>) -> Result<()> {
            self.flags.push(transition.done);
            Ok(())
        }

        fn name(&self) -> &str {
            "Recorder"
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_only_final_transition_is_marked_done() {
        let mut env = MastermindEnv::new(GameConfig::new(1, 3, 3)).unwrap();
        let mut learner = DoneRecorder {
            inner: RandomLearner::with_seed("Random", env.actions().clone(), 4),
            flags: Vec::new(),
        };

        TrainingPipeline::new(TrainingConfig {
            episodes: 1,
            ..TrainingConfig::default()
        })
        .run(&mut env, &mut learner)
        .unwrap();

        let (last, rest) = learner.flags.split_last().unwrap();
        assert!(*last);
        assert!(rest.iter().all(|done| !done));
    }

    #[test]
    fn test_result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = TrainingResult::new(4, 3, 10, 14);
        result.save(&path).unwrap();
        assert_eq!(TrainingResult::load(&path).unwrap(), result);
    }
}
