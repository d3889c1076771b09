use crate::bitset::Set;
use crate::board::Digit;

/// Contains either a placed digit or all the candidates for an empty cell
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum CellState {
    /// Digit that was part of the puzzle
    Given(Digit),
    /// Digit that was placed while solving
    Solved(Digit),
    /// Remaining candidates of an empty cell
    Candidates(Set<Digit>),
}

impl CellState {
    /// Returns the digit of a filled cell.
    pub fn digit(self) -> Option<Digit> {
        match self {
            CellState::Given(digit) | CellState::Solved(digit) => Some(digit),
            CellState::Candidates(_) => None,
        }
    }
}
