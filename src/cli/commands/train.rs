//! Train command - Train a learner and evaluate it greedily

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    cli::{
        config::GameArgs,
        output::{format_number, format_percent, print_section, print_stats_table},
    },
    game::{Code, GameConfig, MastermindEnv},
    pipeline::{
        JsonlObserver, Learner, ProgressObserver, RandomLearner, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
    q_learning::{QLearningAgent, QLearningConfig},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LearnerType {
    /// Tabular Q-learning (off-policy TD control)
    QLearning,
    /// Uniformly random guesses (baseline, never learns)
    Random,
}

#[derive(Parser, Debug)]
#[command(about = "Train a learner", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Type of learner to train
    #[arg(long, short = 'l', value_enum, default_value = "q-learning")]
    pub learner: LearnerType,

    #[command(flatten)]
    pub game: GameArgs,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 5000)]
    pub episodes: usize,

    /// Number of greedy evaluation episodes after training
    #[arg(long, default_value_t = 100)]
    pub eval_episodes: usize,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Exploration probability ε (0.0-1.0)
    #[arg(long, default_value_t = 0.15)]
    pub eps: f64,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.2)]
    pub alpha: f64,

    /// Multiplicative ε decay per episode (1.0 keeps ε fixed)
    #[arg(long, default_value_t = 1.0)]
    pub eps_decay: f64,

    /// Minimum ε when decaying
    #[arg(long, default_value_t = 0.0)]
    pub min_eps: f64,

    /// Play every episode against this secret (comma separated, e.g. 1,2,3,4)
    #[arg(long)]
    pub secret: Option<Code>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Log the rendered board every N training episodes
    #[arg(long)]
    pub render_every: Option<usize>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    learner: String,
    game: GameConfig,
    hyperparameters: Option<QLearningConfig>,
    training: TrainingResult,
    evaluation: Option<TrainingResult>,
    final_epsilon: Option<f64>,
    states_learned: Option<usize>,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no filename means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn build_learner(args: &TrainArgs, env: &MastermindEnv) -> Result<Box<dyn Learner>> {
    let learner: Box<dyn Learner> = match args.learner {
        LearnerType::QLearning => {
            let mut config = QLearningConfig::new(args.gamma, args.eps, args.alpha)
                .with_eps_decay(args.eps_decay, args.min_eps);
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            Box::new(
                QLearningAgent::from_config(env.actions().clone(), config)
                    .context("Invalid Q-learning hyperparameters")?,
            )
        }
        LearnerType::Random => Box::new(RandomLearner::new("Random", env.actions().clone())),
    };
    Ok(learner)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let game = args.game.to_config();
    let mut env = MastermindEnv::new(game).context("Invalid game configuration")?;
    if let Some(secret) = &args.secret {
        // Fail before training if the secret cannot be played.
        env.reset(Some(secret))
            .with_context(|| format!("Invalid secret {secret}"))?;
    }
    let mut learner = build_learner(&args, &env)?;

    info!(
        learner = learner.name(),
        pegs = game.n_pegs,
        colours = game.n_colours,
        rows = game.n_rows,
        actions = env.actions().len(),
        episodes = args.episodes,
        "starting training"
    );

    let config = TrainingConfig {
        episodes: args.episodes,
        seed: args.seed,
        secret: args.secret.clone(),
        render_every: args.render_every,
    };
    let mut pipeline = TrainingPipeline::new(config.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let training = pipeline.run(&mut env, learner.as_mut())?;

    let evaluation = if args.eval_episodes > 0 {
        let mut eval_pipeline = TrainingPipeline::new(TrainingConfig {
            render_every: None,
            ..config
        });
        Some(eval_pipeline.evaluate(&mut env, learner.as_mut(), args.eval_episodes)?)
    } else {
        None
    };

    let agent = learner.as_any().downcast_ref::<QLearningAgent>();

    print_section(&format!("{} on {}x{} Mastermind", learner.name(), game.n_pegs, game.n_colours));
    print_result("Training", &training);
    if let Some(evaluation) = &evaluation {
        print_result("Evaluation (greedy)", evaluation);
    }
    if let Some(agent) = agent {
        print_stats_table(&[
            ("States learned", format_number(agent.table_len())),
            ("Final epsilon", format!("{:.4}", agent.epsilon())),
        ]);
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let summary = TrainingSummaryFile {
            learner: learner.name().to_string(),
            game,
            hyperparameters: agent.map(|a| *a.config()),
            training,
            evaluation,
            final_epsilon: agent.map(QLearningAgent::epsilon),
            states_learned: agent.map(QLearningAgent::table_len),
            seed: args.seed,
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        info!(path = %path.display(), "wrote training summary");
    }

    Ok(())
}

fn print_result(title: &str, result: &TrainingResult) {
    println!("\n{title}");
    print_stats_table(&[
        ("Episodes", format_number(result.total_episodes)),
        ("Solved", format_number(result.wins)),
        ("Out of rows", format_number(result.exhausted)),
        ("Win rate", format_percent(result.win_rate)),
        ("Mean guesses", format!("{:.2}", result.mean_turns)),
        ("Mean reward", format!("{:.2}", result.mean_reward)),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }
}
