use crate::board::{Cell, Digit};
use std::fmt;

/// A digit in a cell, the unit that steps place or eliminate.
///
/// Ordered by cell, then digit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct Candidate {
    pub cell: Cell,
    pub digit: Digit,
}

impl Candidate {
    /// Shorthand for building a candidate from raw numbers, `cell` in `0..81`
    /// and `digit` in `1..=9`.
    ///
    /// # Panics
    /// If either number is out of range.
    #[inline]
    pub fn new(cell: u8, digit: u8) -> Candidate {
        Candidate {
            cell: Cell::new(cell),
            digit: Digit::new(digit),
        }
    }
}

impl From<(Cell, Digit)> for Candidate {
    fn from((cell, digit): (Cell, Digit)) -> Self {
        Candidate { cell, digit }
    }
}

impl fmt::Display for Candidate {
    // r4c7#5
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.cell, self.digit)
    }
}
