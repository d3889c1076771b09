//! Errors for parsing grids and for contradictory grid states
use crate::board::{Cell, Digit, House};

#[cfg(doc)]
use crate::Grid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// An invalid sudoku entry encountered during parsing.
pub struct InvalidEntry {
    /// Cell number goes from 0..=80, 0..=8 for first line, 9..=17 for 2nd and so on
    pub cell: u8,
    /// The parsed invalid char
    pub ch: char,
}

impl InvalidEntry {
    /// Row index from 0..=8, topmost row is 0
    #[inline]
    pub fn row(self) -> u8 {
        self.cell / 9
    }
    /// Column index from 0..=8, leftmost col is 0
    #[inline]
    pub fn col(self) -> u8 {
        self.cell % 9
    }
    /// Block index from 0..=8, numbering from left to right, top to bottom.
    #[inline]
    pub fn block(self) -> u8 {
        self.cell / 27 * 3 + self.cell % 9 / 3
    }
}

/// Error for [`Grid::from_str_line`]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum LineParseError {
    /// Accepted values are numbers 1...9 and '0', '.' or '_' for empty cells
    #[error("cell {} contains invalid character '{}'", .0.cell, .0.ch)]
    InvalidEntry(InvalidEntry),
    /// Returns number of cells supplied
    #[error("sudoku contains {0} cells instead of required 81")]
    NotEnoughCells(u8),
    /// Returned if >=82 valid cell positions are supplied
    #[error("sudoku contains more than 81 cells or is missing comment delimiter")]
    TooManyCells,
    /// Comments must be delimited by a space or tab.
    #[error("missing comment delimiter")]
    MissingCommentDelimiter,
}

/// Error for [`Grid::from_pencilmarks`]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum PencilmarkParseError {
    /// A token contained something other than the digits 1..=9
    #[error("cell {} contains invalid character '{}'", .0.cell, .0.ch)]
    InvalidEntry(InvalidEntry),
    /// A digit was listed twice in the same cell
    #[error("cell {cell} lists digit {digit} more than once")]
    RepeatedDigit {
        #[allow(missing_docs)]
        cell: u8,
        #[allow(missing_docs)]
        digit: u8,
    },
    /// Returns number of cells supplied
    #[error("pencilmarks contain {0} cells instead of required 81")]
    WrongCellCount(usize),
    /// The pencilmarks parsed, but describe an impossible grid
    #[error(transparent)]
    Contradiction(#[from] Contradiction),
}

/// A grid state that can't lead to a solution.
///
/// Returned by every operation that mutates a [`Grid`] and by the consistency check.
/// The grid is never left partially modified when one of these is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Contradiction {
    /// An empty cell has no candidates left
    #[error("{cell} has no candidates left")]
    NoCandidates {
        #[allow(missing_docs)]
        cell: Cell,
    },
    /// A digit was placed in or removed from a cell that doesn't hold it as a candidate
    #[error("{digit} is not a candidate of {cell}")]
    NotACandidate {
        #[allow(missing_docs)]
        cell: Cell,
        #[allow(missing_docs)]
        digit: Digit,
    },
    /// A digit was placed in a cell that is already filled
    #[error("{cell} is already filled")]
    CellFilled {
        #[allow(missing_docs)]
        cell: Cell,
    },
    /// A digit is placed twice in the same house
    #[error("{digit} appears more than once in {house}")]
    DuplicateDigit {
        #[allow(missing_docs)]
        house: House,
        #[allow(missing_docs)]
        digit: Digit,
    },
    /// A digit has no place left in a house
    #[error("{digit} has no place left in {house}")]
    MissingPlacement {
        #[allow(missing_docs)]
        house: House,
        #[allow(missing_docs)]
        digit: Digit,
    },
}
