//! The spin draw: pick one student out of the present candidates.
//!
//! Everything here is pure. The RNG is passed in so the draw can be
//! reproduced in tests with a seeded generator.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use super::Student;
use crate::error::RosterError;

/// How a spin chooses among the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Uniform choice over all candidates.
    #[default]
    Random,
    /// Same draw as [`SelectionMode::Random`], tagged separately in history.
    RollCall,
    /// Uniform choice among the candidates selected the fewest times.
    Fair,
}

impl SelectionMode {
    /// Wire name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RollCall => "rollCall",
            Self::Fair => "fair",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "rollCall" => Ok(Self::RollCall),
            "fair" => Ok(Self::Fair),
            other => Err(RosterError::UnknownMode(other.to_string())),
        }
    }
}

/// Draws one student from `candidates` according to `mode`.
///
/// Returns `None` only when `candidates` is empty.
pub fn draw<'a, R>(candidates: &'a [Student], mode: SelectionMode, rng: &mut R) -> Option<&'a Student>
where
    R: Rng + ?Sized,
{
    match mode {
        SelectionMode::Random | SelectionMode::RollCall => candidates.choose(rng),
        SelectionMode::Fair => {
            let min_count = candidates.iter().map(|s| s.selection_count).min()?;
            let least_selected: Vec<&Student> = candidates
                .iter()
                .filter(|s| s.selection_count == min_count)
                .collect();
            least_selected.choose(rng).copied()
        }
    }
}

/// Drops the most recently selected student from the pool.
///
/// The pool is returned untouched when it holds a single student, when
/// there is no previous selection, or when removing it would leave the
/// pool empty.
#[must_use]
pub fn exclude_previous(candidates: Vec<Student>, previous: Option<i64>) -> Vec<Student> {
    let Some(previous) = previous else {
        return candidates;
    };
    if candidates.len() <= 1 {
        return candidates;
    }
    let remaining: Vec<Student> = candidates
        .iter()
        .filter(|s| s.id != previous)
        .cloned()
        .collect();
    if remaining.is_empty() {
        candidates
    } else {
        remaining
    }
}
