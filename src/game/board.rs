//! Board grid holding the guesses and feedback of an episode

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{code::Code, feedback::Feedback};
use crate::{Error, Result};

/// The board: `n_rows` rows of `n_pegs + 2` cells.
///
/// Row `r` holds the guess played on turn `r` followed by its feedback
/// `[misplaced, exact]`. Rows are filled top-down, one per turn; every row at
/// or after [`rows_played`](Self::rows_played) is all zeros. Only a reset of
/// the environment clears played rows.
///
/// Equality and hashing are on content, so the board doubles as the learner's
/// state key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    n_rows: usize,
    n_pegs: usize,
    played: usize,
    cells: Vec<u8>,
}

impl BoardState {
    /// Create an empty board.
    pub fn new(n_rows: usize, n_pegs: usize) -> Self {
        Self {
            n_rows,
            n_pegs,
            played: 0,
            cells: vec![0; n_rows * (n_pegs + 2)],
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_pegs(&self) -> usize {
        self.n_pegs
    }

    /// Cells per row: the guess plus two feedback cells.
    pub fn width(&self) -> usize {
        self.n_pegs + 2
    }

    pub fn rows_played(&self) -> usize {
        self.played
    }

    pub fn is_empty(&self) -> bool {
        self.played == 0
    }

    pub fn is_full(&self) -> bool {
        self.played >= self.n_rows
    }

    /// A played row, or `None` if row `r` has not been played yet.
    pub fn row(&self, r: usize) -> Option<&[u8]> {
        if r >= self.played {
            return None;
        }
        let width = self.width();
        Some(&self.cells[r * width..(r + 1) * width])
    }

    /// The guess stored in played row `r`.
    pub fn guess(&self, r: usize) -> Option<&[u8]> {
        self.row(r).map(|row| &row[..self.n_pegs])
    }

    /// The feedback stored in played row `r`.
    pub fn feedback(&self, r: usize) -> Option<Feedback> {
        self.row(r).map(|row| Feedback {
            misplaced: row[self.n_pegs],
            exact: row[self.n_pegs + 1],
        })
    }

    /// Played rows, oldest first.
    pub fn completed_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width()).take(self.played)
    }

    /// The whole grid in row-major order, unplayed rows included.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Compact one-line form of the played rows, e.g. `1,1,2:0,2/1,2,1:2,1`.
    pub fn label(&self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        self.completed_rows()
            .map(|row| {
                let (guess, feedback) = row.split_at(self.n_pegs);
                format!("{}:{}", join_cells(guess), join_cells(feedback))
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Write `guess ++ feedback` into the next unplayed row.
    pub(crate) fn record(&mut self, guess: &Code, feedback: Feedback) -> Result<()> {
        if self.is_full() {
            return Err(Error::InvalidAction {
                reason: format!("all {} rows have been played", self.n_rows),
            });
        }
        if guess.len() != self.n_pegs {
            return Err(Error::InvalidAction {
                reason: format!("guess {guess} does not fit a {}-peg row", self.n_pegs),
            });
        }

        let width = self.width();
        let row = &mut self.cells[self.played * width..(self.played + 1) * width];
        row[..self.n_pegs].copy_from_slice(guess.pegs());
        row[self.n_pegs..].copy_from_slice(&feedback.as_pair());
        self.played += 1;
        Ok(())
    }
}

fn join_cells(cells: &[u8]) -> String {
    cells
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Rows are shown newest turn first; unplayed rows print as zeros.
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width()).rev().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let (guess, feedback) = row.split_at(self.n_pegs);
            let guess: Vec<String> = guess.iter().map(|c| format!("{c:>2}")).collect();
            write!(
                f,
                "[{} | {:>2} {:>2}]",
                guess.join(" "),
                feedback[0],
                feedback[1]
            )?;
        }
        Ok(())
    }
}
