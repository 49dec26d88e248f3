//! Feedback scoring for a guess against the secret code

use std::fmt;

use serde::{Deserialize, Serialize};

use super::code::{Code, Colour};

const COLOUR_SLOTS: usize = Colour::MAX as usize + 1;

/// Key pegs awarded for a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Feedback {
    /// Right colour, wrong position
    pub misplaced: u8,
    /// Right colour, right position
    pub exact: u8,
}

impl Feedback {
    /// Feedback as it is written on the board: `[misplaced, exact]`.
    pub fn as_pair(&self) -> [u8; 2] {
        [self.misplaced, self.exact]
    }

    /// True when every peg is an exact match.
    pub fn is_solved(&self, n_pegs: usize) -> bool {
        usize::from(self.exact) == n_pegs && self.misplaced == 0
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.misplaced, self.exact)
    }
}

/// Score `guess` against `secret` with the standard Mastermind rule.
///
/// Exact matches count positions holding the same colour. The colour overlap
/// is the multiset intersection of both codes, so a colour repeated in the
/// guess is credited at most as many times as it occurs in the secret.
/// Misplaced pegs are the overlap minus the exact matches.
///
/// Both codes are expected to have the same length (at most `u8::MAX` pegs).
///
/// # Examples
///
/// ```
/// use mastermind::game::{Code, score};
///
/// let feedback = score(&Code::new([1, 2, 1]), &Code::new([1, 1, 2]));
/// assert_eq!(feedback.as_pair(), [2, 1]);
/// ```
pub fn score(guess: &Code, secret: &Code) -> Feedback {
    debug_assert_eq!(guess.len(), secret.len());

    let mut guess_counts = [0usize; COLOUR_SLOTS];
    let mut secret_counts = [0usize; COLOUR_SLOTS];
    let mut exact = 0usize;

    for (&g, &s) in guess.pegs().iter().zip(secret.pegs()) {
        if g == s {
            exact += 1;
        }
        guess_counts[usize::from(g)] += 1;
        secret_counts[usize::from(s)] += 1;
    }

    let overlap: usize = guess_counts
        .iter()
        .zip(secret_counts.iter())
        .map(|(&g, &s)| g.min(s))
        .sum();

    Feedback {
        misplaced: u8::try_from(overlap - exact).unwrap_or(u8::MAX),
        exact: u8::try_from(exact).unwrap_or(u8::MAX),
    }
}
