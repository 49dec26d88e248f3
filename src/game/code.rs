//! Codes, guesses and the set of all legal guesses

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::environment::validate_dimensions;
use crate::{Error, Result};

/// A peg colour. Colours are numbered from 1; 0 marks an empty board cell.
pub type Colour = u8;

/// An ordered sequence of peg colours, used both for the secret and for guesses.
///
/// Equality and hashing are defined on the colour sequence only, so a `Code`
/// can be used directly as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Code(Vec<Colour>);

impl Code {
    /// Create a code from its peg colours.
    ///
    /// # Examples
    ///
    /// ```
    /// use mastermind::game::Code;
    ///
    /// let code = Code::new([1, 1, 2]);
    /// assert_eq!(code.pegs(), &[1, 1, 2]);
    /// ```
    pub fn new(pegs: impl Into<Vec<Colour>>) -> Self {
        Code(pegs.into())
    }

    pub fn pegs(&self) -> &[Colour] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the code has `n_pegs` pegs, each coloured in `1..=n_colours`.
    ///
    /// Returns a human readable reason on failure; callers wrap it in the error
    /// variant that fits their context.
    pub fn check_shape(&self, n_pegs: usize, n_colours: usize) -> std::result::Result<(), String> {
        if self.len() != n_pegs {
            return Err(format!(
                "code {self} has {} pegs, expected {n_pegs}",
                self.len()
            ));
        }
        if let Some(&colour) = self
            .0
            .iter()
            .find(|&&c| c == 0 || usize::from(c) > n_colours)
        {
            return Err(format!(
                "code {self} uses colour {colour}, expected a colour in 1..={n_colours}"
            ));
        }
        Ok(())
    }
}

impl From<Vec<Colour>> for Code {
    fn from(pegs: Vec<Colour>) -> Self {
        Code(pegs)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, colour) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{colour}")?;
        }
        write!(f, "]")
    }
}

/// Parses comma separated colours, e.g. `"1,1,2"`. Surrounding brackets and
/// whitespace are ignored.
impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        if trimmed.trim().is_empty() {
            return Err(Error::InvalidCode {
                reason: format!("'{s}' contains no colours"),
            });
        }
        trimmed
            .split(',')
            .map(|token| {
                token
                    .trim()
                    .parse::<Colour>()
                    .map_err(|e| Error::InvalidCode {
                        reason: format!("'{}' in '{s}' is not a colour: {e}", token.trim()),
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Code)
    }
}

/// The ordered set of every legal guess.
///
/// Built once per environment and shared read-only with learners, which
/// address actions by their index in this set.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    codes: Vec<Code>,
    index: HashMap<Code, usize>,
}

impl ActionSpace {
    /// Every code of `n_pegs` pegs over colours `1..=n_colours`, in
    /// lexicographic order (`[1, 1]`, `[1, 2]`, ..., `[n, n]`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] under the same dimension rules
    /// as [`GameConfig::validate`](crate::game::GameConfig::validate).
    pub fn product(n_pegs: usize, n_colours: usize) -> Result<Self> {
        validate_dimensions(n_pegs, n_colours)?;
        let mut codes = Vec::with_capacity(n_colours.pow(n_pegs as u32));

        let mut current = vec![1 as Colour; n_pegs];
        'odometer: loop {
            codes.push(Code(current.clone()));

            let mut pos = n_pegs;
            loop {
                if pos == 0 {
                    break 'odometer;
                }
                pos -= 1;
                if usize::from(current[pos]) < n_colours {
                    current[pos] += 1;
                    break;
                }
                current[pos] = 1;
            }
        }

        Ok(Self::index_codes(codes))
    }

    /// Build an action space from an explicit list of codes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the list is empty, contains a
    /// duplicate, or any code has the wrong length or an out-of-range colour.
    pub fn from_codes(codes: Vec<Code>, n_pegs: usize, n_colours: usize) -> Result<Self> {
        if codes.is_empty() {
            return Err(Error::config("action set must contain at least one code"));
        }
        for code in &codes {
            code.check_shape(n_pegs, n_colours).map_err(Error::config)?;
        }

        let space = Self::index_codes(codes);
        if space.index.len() != space.codes.len() {
            return Err(Error::config("action set contains duplicate codes"));
        }
        Ok(space)
    }

    fn index_codes(codes: Vec<Code>) -> Self {
        let index = codes
            .iter()
            .enumerate()
            .map(|(i, code)| (code.clone(), i))
            .collect();
        Self { codes, index }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Code> {
        self.codes.get(index)
    }

    pub fn index_of(&self, code: &Code) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.index.contains_key(code)
    }

    pub fn as_slice(&self) -> &[Code] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }
}
