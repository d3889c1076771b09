use crate::board::{Candidate, Cell, Digit, Grid};
use std::fmt;

/// Whether a conclusion places a digit or removes a candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum ConclusionKind {
    Assignment,
    Elimination,
}

/// A single change to the grid that a step proves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conclusion {
    kind: ConclusionKind,
    candidate: Candidate,
}

impl Conclusion {
    /// Conclusion that `digit` goes into `cell`.
    pub fn assignment(cell: Cell, digit: Digit) -> Self {
        Conclusion {
            kind: ConclusionKind::Assignment,
            candidate: Candidate { cell, digit },
        }
    }

    /// Conclusion that `digit` can't go into `cell`.
    pub fn elimination(cell: Cell, digit: Digit) -> Self {
        Conclusion {
            kind: ConclusionKind::Elimination,
            candidate: Candidate { cell, digit },
        }
    }

    #[allow(missing_docs)]
    pub fn kind(self) -> ConclusionKind {
        self.kind
    }

    #[allow(missing_docs)]
    pub fn candidate(self) -> Candidate {
        self.candidate
    }

    #[allow(missing_docs)]
    pub fn cell(self) -> Cell {
        self.candidate.cell
    }

    #[allow(missing_docs)]
    pub fn digit(self) -> Digit {
        self.candidate.digit
    }

    #[allow(missing_docs)]
    pub fn is_assignment(self) -> bool {
        self.kind == ConclusionKind::Assignment
    }

    /// Checks whether the conclusion would change `grid`.
    /// Assignments need an empty cell that holds the digit, eliminations an existing candidate.
    pub fn is_applicable(self, grid: &Grid) -> bool {
        grid.exists(self.candidate)
    }

    /// Checks the conclusion against the solution of the puzzle.
    pub fn agrees_with(self, solution: &Grid) -> bool {
        let is_solution_digit = solution.digit(self.cell()) == Some(self.digit());
        match self.kind {
            ConclusionKind::Assignment => is_solution_digit,
            ConclusionKind::Elimination => !is_solution_digit,
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self.kind {
            ConclusionKind::Assignment => "=",
            ConclusionKind::Elimination => "<>",
        };
        write!(f, "{}{}{}", self.candidate.cell, op, self.candidate.digit)
    }
}
