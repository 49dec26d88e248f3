//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the driver loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    game::{Code, Feedback},
    ports::{EpisodeSummary, Observer},
};

/// One scored guess within an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub turn: usize,
    pub guess: Code,
    pub feedback: [u8; 2],
    pub reward: i32,
}

/// Complete record of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub summary: EpisodeSummary,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    exhausted: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            exhausted: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} X:{}", self.wins, self.exhausted)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.wins = 0;
        self.exhausted = 0;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if summary.is_win() {
            self.wins += 1;
        } else {
            self.exhausted += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics collected by a [`MetricsObserver`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub total_episodes: usize,
    pub wins: usize,
    /// Guesses per episode, in play order
    pub episode_turns: Vec<usize>,
    /// Total reward per episode, in play order
    pub episode_rewards: Vec<i32>,
}

impl Metrics {
    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_episodes as f64
        }
    }

    /// Get average episode length
    pub fn mean_turns(&self) -> f64 {
        mean(self.episode_turns.iter().map(|&t| t as f64))
    }

    /// Mean reward over the last `window` episodes
    pub fn recent_mean_reward(&self, window: usize) -> f64 {
        let start = self.episode_rewards.len().saturating_sub(window);
        mean(self.episode_rewards[start..].iter().map(|&r| f64::from(r)))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Read access to a [`MetricsObserver`] after it has been handed to a pipeline
#[derive(Debug, Clone)]
pub struct MetricsHandle(Arc<Mutex<Metrics>>);

impl MetricsHandle {
    /// Copy of the metrics collected so far
    pub fn snapshot(&self) -> Metrics {
        lock(&self.0).clone()
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MetricsHandle {
        MetricsHandle(Arc::clone(&self.metrics))
    }
}

fn lock(metrics: &Mutex<Metrics>) -> MutexGuard<'_, Metrics> {
    metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let mut metrics = lock(&self.metrics);
        metrics.total_episodes += 1;
        if summary.is_win() {
            metrics.wins += 1;
        }
        metrics.episode_turns.push(summary.turns);
        metrics.episode_rewards.push(summary.total_reward);
        Ok(())
    }
}

/// JSONL observer - Writes one JSON object per finished episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        turn: usize,
        action: &Code,
        feedback: Feedback,
        reward: i32,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            turn,
            guess: action.clone(),
            feedback: feedback.as_pair(),
            reward,
        });
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let observation = Observation {
            episode,
            summary: summary.clone(),
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
