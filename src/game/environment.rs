//! Episode lifecycle: secret selection, turn stepping and termination

use std::{fmt::Write as _, sync::Arc};

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    board::BoardState,
    code::{ActionSpace, Code, Colour},
    feedback::{Feedback, score},
};
use crate::{Error, Result};

/// Largest supported peg count (feedback cells must fit a `u8`).
pub const MAX_PEGS: usize = 64;

/// Largest supported action space, `n_colours^n_pegs`.
pub const MAX_ACTION_SPACE: usize = 1 << 24;

/// Reward charged for every guess.
pub const GUESS_REWARD: i32 = -1;

/// Bonus added when a guess cracks the secret.
pub const WIN_BONUS: i32 = 10;

/// Game dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pegs per code
    pub n_pegs: usize,
    /// Number of colours; colours are numbered `1..=n_colours`
    pub n_colours: usize,
    /// Turn budget per episode
    pub n_rows: usize,
}

impl GameConfig {
    pub fn new(n_pegs: usize, n_colours: usize, n_rows: usize) -> Self {
        Self {
            n_pegs,
            n_colours,
            n_rows,
        }
    }

    /// Size of the full product action space, if it fits a `usize`.
    pub fn action_space_size(&self) -> Option<usize> {
        u32::try_from(self.n_pegs)
            .ok()
            .and_then(|exp| self.n_colours.checked_pow(exp))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any count is zero, a colour
    /// would not fit a [`Colour`], or the action space is too large.
    pub fn validate(&self) -> Result<()> {
        if self.n_rows == 0 {
            return Err(Error::config(format!(
                "pegs, colours and rows must be positive (got {} pegs, {} colours, {} rows)",
                self.n_pegs, self.n_colours, self.n_rows
            )));
        }
        validate_dimensions(self.n_pegs, self.n_colours)
    }
}

/// Checks that `n_colours^n_pegs` codes can be enumerated.
pub(crate) fn validate_dimensions(n_pegs: usize, n_colours: usize) -> Result<()> {
    if n_pegs == 0 || n_colours == 0 {
        return Err(Error::config(format!(
            "pegs and colours must be positive (got {n_pegs} pegs, {n_colours} colours)"
        )));
    }
    if n_pegs > MAX_PEGS {
        return Err(Error::config(format!(
            "{n_pegs} pegs exceeds the maximum of {MAX_PEGS}"
        )));
    }
    if n_colours > usize::from(Colour::MAX) {
        return Err(Error::config(format!(
            "{n_colours} colours exceeds the maximum of {}",
            Colour::MAX
        )));
    }
    let size = u32::try_from(n_pegs)
        .ok()
        .and_then(|exp| n_colours.checked_pow(exp));
    match size {
        Some(size) if size <= MAX_ACTION_SPACE => Ok(()),
        _ => Err(Error::config(format!(
            "{n_colours} colours over {n_pegs} pegs exceeds the maximum action space of {MAX_ACTION_SPACE}"
        ))),
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(4, 6, 10)
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// The secret was guessed on turn `turns` (1-based)
    Solved { turns: usize },
    /// Every row was played without finding the secret
    Exhausted,
}

/// Result of a single [`MastermindEnv::step`]
#[derive(Debug, Clone)]
pub struct Step {
    /// Board after the guess was recorded
    pub state: BoardState,
    /// Reward for this guess
    pub reward: i32,
    /// Whether the episode has ended
    pub done: bool,
    /// Free-form note: empty mid-episode, `"solved"` or `"exhausted"` at the end
    pub info: String,
    /// Feedback written for this guess
    pub feedback: Feedback,
    /// Set on the final step of an episode
    pub outcome: Option<EpisodeOutcome>,
}

/// Mastermind environment.
///
/// Lifecycle: inactive until [`reset`](Self::reset); active while stepping;
/// inactive again once the secret is guessed or the rows run out.
#[derive(Debug, Clone)]
pub struct MastermindEnv {
    config: GameConfig,
    actions: Arc<ActionSpace>,
    board: BoardState,
    secret: Option<Code>,
    turn: usize,
    active: bool,
    rng: StdRng,
}

impl MastermindEnv {
    /// Create an environment whose action space is every possible code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the dimensions are invalid.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let actions = ActionSpace::product(config.n_pegs, config.n_colours)?;
        Ok(Self::build(config, actions))
    }

    /// Create an environment restricted to an explicit set of codes.
    ///
    /// Secrets drawn by [`reset`](Self::reset) and explicit secrets must come
    /// from this set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the dimensions are invalid or
    /// the set is empty, has duplicates, or holds a malformed code.
    pub fn with_actions(config: GameConfig, codes: Vec<Code>) -> Result<Self> {
        config.validate()?;
        let actions = ActionSpace::from_codes(codes, config.n_pegs, config.n_colours)?;
        Ok(Self::build(config, actions))
    }

    fn build(config: GameConfig, actions: ActionSpace) -> Self {
        Self {
            config,
            actions: Arc::new(actions),
            board: BoardState::new(config.n_rows, config.n_pegs),
            secret: None,
            turn: 0,
            active: false,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Use a deterministic RNG for secret selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The shared action space.
    pub fn actions(&self) -> &Arc<ActionSpace> {
        &self.actions
    }

    /// Current board.
    pub fn state(&self) -> &BoardState {
        &self.board
    }

    /// The secret of the current (or last) episode.
    pub fn secret(&self) -> Option<&Code> {
        self.secret.as_ref()
    }

    /// Turns played in the current episode.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Whether [`step`](Self::step) may be called.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a new episode and return the empty board.
    ///
    /// With `code` the secret is fixed to it; otherwise the secret is drawn
    /// uniformly from the action space. The code is validated before any
    /// state changes, so a rejected reset leaves the environment untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCode`] if `code` has the wrong length or is not
    /// in the action space.
    pub fn reset(&mut self, code: Option<&Code>) -> Result<BoardState> {
        let secret = match code {
            Some(code) => {
                if code.len() != self.config.n_pegs {
                    return Err(Error::InvalidCode {
                        reason: format!(
                            "code {code} has {} pegs, expected {}",
                            code.len(),
                            self.config.n_pegs
                        ),
                    });
                }
                if !self.actions.contains(code) {
                    return Err(Error::InvalidCode {
                        reason: format!("code {code} is not in the action space"),
                    });
                }
                code.clone()
            }
            None => self
                .actions
                .as_slice()
                .choose(&mut self.rng)
                .cloned()
                .ok_or_else(|| Error::config("action space is empty"))?,
        };

        self.secret = Some(secret);
        self.board = BoardState::new(self.config.n_rows, self.config.n_pegs);
        self.turn = 0;
        self.active = true;
        Ok(self.board.clone())
    }

    /// Play one guess.
    ///
    /// Every guess costs [`GUESS_REWARD`]; cracking the secret adds
    /// [`WIN_BONUS`] and ends the episode. Playing the last row without
    /// cracking it ends the episode with no bonus. After either ending the
    /// environment must be reset again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReset`] if the environment is inactive, or
    /// [`Error::InvalidAction`] if the guess has the wrong length or a colour
    /// outside `1..=n_colours`.
    pub fn step(&mut self, action: &Code) -> Result<Step> {
        if !self.active {
            return Err(Error::NotReset);
        }
        let secret = self.secret.as_ref().ok_or(Error::NotReset)?;
        action
            .check_shape(self.config.n_pegs, self.config.n_colours)
            .map_err(|reason| Error::InvalidAction { reason })?;

        let feedback = score(action, secret);
        let solved = action == secret;
        self.board.record(action, feedback)?;
        self.turn += 1;

        let mut reward = GUESS_REWARD;
        let outcome = if solved {
            reward += WIN_BONUS;
            Some(EpisodeOutcome::Solved { turns: self.turn })
        } else if self.turn >= self.config.n_rows {
            Some(EpisodeOutcome::Exhausted)
        } else {
            None
        };

        let info = match outcome {
            Some(EpisodeOutcome::Solved { .. }) => "solved",
            Some(EpisodeOutcome::Exhausted) => "exhausted",
            None => "",
        };

        if outcome.is_some() {
            self.active = false;
        }

        Ok(Step {
            state: self.board.clone(),
            reward,
            done: outcome.is_some(),
            info: info.to_string(),
            feedback,
            outcome,
        })
    }

    /// Diagnostic dump of the secret and the board, newest turn first.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match &self.secret {
            Some(secret) => {
                let _ = writeln!(out, "Secret code: {secret}");
            }
            None => {
                let _ = writeln!(out, "Secret code: <not set>");
            }
        }
        let _ = writeln!(out, "Board:");
        let _ = write!(out, "{}", self.board);
        out
    }
}
