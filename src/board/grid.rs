use crate::analysis::Conclusion;
use crate::bitset::Set;
use crate::board::{Candidate, Cell, CellState, Digit, House, IntoHouse};
use crate::brute_force::{BacktrackingSolver, BruteForceSolver, Uniqueness};
use crate::consts::N_CELLS;
use crate::errors::{Contradiction, InvalidEntry, LineParseError, PencilmarkParseError};
use crate::helper::CellArray;
use crunchy::unroll;
use std::{fmt, str};

// word layout: bits 0..9 hold the digit mask, bits 9..11 the status
const MASK: u16 = 0o777;
const STATUS_SHIFT: u16 = 9;
const STATUS_EMPTY: u16 = 0;
const STATUS_SOLVED: u16 = 1 << STATUS_SHIFT;
const STATUS_GIVEN: u16 = 2 << STATUS_SHIFT;
const STATUS_MASK: u16 = 3 << STATUS_SHIFT;

/// Bit-packed sudoku grid.
///
/// Every cell is either a given, a digit placed while solving or an empty cell
/// with its remaining candidates. A placed digit is never a candidate of an empty peer.
///
/// All mutating operations are atomic: they either succeed completely or
/// return a [`Contradiction`] and leave the grid untouched.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: CellArray<u16>,
}

impl Grid {
    /// A grid without any digits where every cell holds all 9 candidates.
    pub fn empty() -> Grid {
        Grid {
            cells: CellArray([STATUS_EMPTY | MASK; N_CELLS]),
        }
    }

    /// A grid of empty cells with the given candidates. Intended for building test fixtures.
    pub fn from_candidates(candidates: [Set<Digit>; N_CELLS]) -> Grid {
        let mut grid = Grid::empty();
        for (word, cands) in grid.cells.iter_mut().zip(candidates.iter()) {
            *word = STATUS_EMPTY | cands.bits();
        }
        grid
    }

    /// Parses a grid in the 81 character line format.
    ///
    /// Digits `1..=9` are givens, `0`, `.` and `_` are empty cells.
    /// Anything following the 81 cells must be separated by a space or tab.
    /// Candidates of empty cells are computed from the givens. Conflicting givens
    /// are accepted here and reported by [`Grid::check_consistency`].
    ///
    /// ```
    /// use sudoku_logic::Grid;
    ///
    /// let line = "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...";
    /// let grid = Grid::from_str_line(line).unwrap();
    /// assert_eq!(grid.to_str_line(), line);
    /// assert_eq!(grid.n_givens(), 28);
    /// ```
    pub fn from_str_line(s: &str) -> Result<Grid, LineParseError> {
        let mut grid = [0u8; N_CELLS];
        let mut n_cells = 0;
        let mut chars = s.chars();
        for ch in chars.by_ref() {
            if n_cells == N_CELLS {
                match ch {
                    ' ' | '\t' => return Ok(Grid::from_digits(&grid)),
                    '1'..='9' | '.' | '0' | '_' => return Err(LineParseError::TooManyCells),
                    _ => return Err(LineParseError::MissingCommentDelimiter),
                }
            }
            match ch {
                '1'..='9' => grid[n_cells] = ch as u8 - b'0',
                '.' | '0' | '_' => grid[n_cells] = 0,
                _ => {
                    return Err(LineParseError::InvalidEntry(InvalidEntry {
                        cell: n_cells as u8,
                        ch,
                    }))
                }
            }
            n_cells += 1;
        }
        if n_cells != N_CELLS {
            return Err(LineParseError::NotEnoughCells(n_cells as u8));
        }
        Ok(Grid::from_digits(&grid))
    }

    // digits 1..=9 become givens, 0 is an empty cell
    pub(crate) fn from_digits(digits: &[u8; N_CELLS]) -> Grid {
        let mut grid = Grid::empty();
        for (word, &digit) in grid.cells.iter_mut().zip(digits.iter()) {
            if digit != 0 {
                *word = STATUS_GIVEN | 1 << (digit - 1);
            }
        }
        grid.recompute_candidates();
        grid
    }

    /// Parses a pencilmark grid as printed by [`Grid::display_candidates`].
    ///
    /// The input must consist of 81 whitespace separated tokens of digits. Box drawing
    /// characters and `|`, `-`, `+` are ignored. A single digit denotes a filled cell,
    /// several digits the candidates of an empty cell. Filled digits are removed from
    /// the candidates of their peers.
    pub fn from_pencilmarks(s: &str) -> Result<Grid, PencilmarkParseError> {
        let is_decoration = |ch: char| match ch {
            '|' | '-' | '+' | '*' => true,
            // box drawing block
            '\u{2500}'..='\u{257F}' => true,
            _ => false,
        };

        let mut grid = Grid::empty();
        let mut n_cells = 0;
        for token in s.split_whitespace() {
            let token = token.trim_matches(is_decoration);
            if token.is_empty() {
                continue;
            }
            if n_cells == N_CELLS {
                return Err(PencilmarkParseError::WrongCellCount(n_cells + 1));
            }
            let mut digits = Set::NONE;
            for ch in token.chars() {
                let digit = match ch {
                    '1'..='9' => Digit::new(ch as u8 - b'0'),
                    _ => {
                        return Err(PencilmarkParseError::InvalidEntry(InvalidEntry {
                            cell: n_cells as u8,
                            ch,
                        }))
                    }
                };
                if digits.contains(digit) {
                    return Err(PencilmarkParseError::RepeatedDigit {
                        cell: n_cells as u8,
                        digit: digit.get(),
                    });
                }
                digits |= digit;
            }
            grid.cells.0[n_cells] = match digits.len() {
                1 => STATUS_SOLVED | digits.bits(),
                _ => STATUS_EMPTY | digits.bits(),
            };
            n_cells += 1;
        }
        if n_cells != N_CELLS {
            return Err(PencilmarkParseError::WrongCellCount(n_cells));
        }

        for cell in Cell::all() {
            if let Some(digit) = grid.digit(cell) {
                for peer in cell.peers() {
                    if grid.is_empty_cell(peer) {
                        grid.remove_candidate(peer, digit)?;
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Returns the grid in the line format, `.` for empty cells.
    pub fn to_str_line(&self) -> String {
        Cell::all()
            .map(|cell| match self.digit(cell) {
                Some(digit) => (b'0' + digit.get()) as char,
                None => '.',
            })
            .collect()
    }

    /// Returns a displayable pencilmark grid showing the candidates of all empty cells.
    pub fn display_candidates(&self) -> impl fmt::Display + '_ {
        super::candidate_grid::CandidateGrid::new(self)
    }

    /// Returns the state of `cell`.
    pub fn cell_state(&self, cell: Cell) -> CellState {
        let word = self.cells[cell];
        let digits = Set::<Digit>(word & MASK);
        match word & STATUS_MASK {
            STATUS_EMPTY => CellState::Candidates(digits),
            status => {
                // filled cells hold exactly one digit
                let digit = digits.first().unwrap_or_else(|| Digit::new(1));
                debug_assert_eq!(digits.len(), 1);
                match status {
                    STATUS_GIVEN => CellState::Given(digit),
                    _ => CellState::Solved(digit),
                }
            }
        }
    }

    /// Returns the candidates of `cell`. Filled cells have no candidates.
    #[inline]
    pub fn candidates(&self, cell: Cell) -> Set<Digit> {
        let word = self.cells[cell];
        match word & STATUS_MASK {
            STATUS_EMPTY => Set(word & MASK),
            _ => Set::NONE,
        }
    }

    /// Returns the digit of a filled cell.
    #[inline]
    pub fn digit(&self, cell: Cell) -> Option<Digit> {
        self.cell_state(cell).digit()
    }

    /// Checks whether `cell` is empty.
    #[inline]
    pub fn is_empty_cell(&self, cell: Cell) -> bool {
        self.cells[cell] & STATUS_MASK == STATUS_EMPTY
    }

    /// Checks whether `cell` holds a digit of the original puzzle.
    #[inline]
    pub fn is_given(&self, cell: Cell) -> bool {
        self.cells[cell] & STATUS_MASK == STATUS_GIVEN
    }

    /// Returns `true` iff the cell of `candidate` is empty and still holds its digit.
    #[inline]
    pub fn exists(&self, candidate: Candidate) -> bool {
        self.candidates(candidate.cell).contains(candidate.digit)
    }

    /// Places `digit` in `cell` and removes it from the candidates of all peers.
    ///
    /// Fails if the cell is filled, the digit is not a candidate of the cell or
    /// a peer would lose its last candidate. The grid is unchanged on failure.
    pub fn set_digit(&mut self, cell: Cell, digit: Digit) -> Result<(), Contradiction> {
        let mut copy = *self;
        copy.place(cell, digit)?;
        *self = copy;
        Ok(())
    }

    /// Removes a candidate. Returns whether the candidate existed.
    ///
    /// Fails if the cell would be left without candidates or the digit is the one placed in the cell.
    pub fn eliminate(&mut self, candidate: Candidate) -> Result<bool, Contradiction> {
        let Candidate { cell, digit } = candidate;
        if !self.is_empty_cell(cell) {
            return match self.digit(cell) == Some(digit) {
                true => Err(Contradiction::CellFilled { cell }),
                false => Ok(false),
            };
        }
        if !self.exists(candidate) {
            return Ok(false);
        }
        // removing a candidate touches only one cell, no copy needed
        self.remove_candidate(cell, digit)?;
        Ok(true)
    }

    /// Applies all conclusions of a step. Either all of them take effect or none.
    pub fn apply(&mut self, conclusions: &[Conclusion]) -> Result<(), Contradiction> {
        let mut copy = *self;
        for conclusion in conclusions {
            let candidate = conclusion.candidate();
            match conclusion.is_assignment() {
                true => copy.place(candidate.cell, candidate.digit)?,
                false => {
                    copy.eliminate(candidate)?;
                }
            }
        }
        *self = copy;
        Ok(())
    }

    /// Checks that no digit appears twice in a house, that every empty cell has
    /// candidates left and that every digit still has a place in every house.
    ///
    /// Never modifies the grid.
    pub fn check_consistency(&self) -> Result<(), Contradiction> {
        for cell in Cell::all() {
            if self.is_empty_cell(cell) && self.candidates(cell).is_empty() {
                return Err(Contradiction::NoCandidates { cell });
            }
        }

        for house in House::all() {
            let mut placed = Set::<Digit>::NONE;
            let mut possible = Set::<Digit>::NONE;
            for cell in house.cells() {
                match self.cell_state(cell) {
                    CellState::Candidates(cands) => possible |= cands,
                    CellState::Given(digit) | CellState::Solved(digit) => {
                        if placed.contains(digit) {
                            return Err(Contradiction::DuplicateDigit { house, digit });
                        }
                        placed |= digit;
                    }
                }
            }
            if let Some(digit) = (!(placed | possible)).first() {
                return Err(Contradiction::MissingPlacement { house, digit });
            }
        }
        Ok(())
    }

    /// Checks whether every cell is filled without conflicts.
    pub fn is_solved(&self) -> bool {
        self.filled_count() == N_CELLS && self.check_consistency().is_ok()
    }

    /// Number of candidates left in all empty cells.
    pub fn candidate_count(&self) -> usize {
        Cell::all().map(|cell| self.candidates(cell).len() as usize).sum()
    }

    /// Number of filled cells, givens included.
    pub fn filled_count(&self) -> usize {
        N_CELLS - self.empty_cells().len() as usize
    }

    /// Number of givens.
    pub fn n_givens(&self) -> usize {
        Cell::all().filter(|&cell| self.is_given(cell)).count()
    }

    /// Set of all empty cells.
    pub fn empty_cells(&self) -> Set<Cell> {
        Cell::all().filter(|&cell| self.is_empty_cell(cell)).collect()
    }

    /// Returns the original puzzle: only the givens, with all candidates restored.
    pub fn reset(&self) -> Grid {
        let mut grid = Grid::empty();
        for cell in Cell::all() {
            if self.is_given(cell) {
                grid.cells[cell] = self.cells[cell];
            }
        }
        grid.recompute_candidates();
        grid
    }

    /// Solves the grid with the default brute force solver.
    pub fn uniqueness(&self) -> Uniqueness {
        BacktrackingSolver.solve(self)
    }

    /// Returns the solution, if it is unique.
    pub fn solution(&self) -> Option<Grid> {
        match self.uniqueness() {
            Uniqueness::Unique(solution) => Some(solution),
            _ => None,
        }
    }

    // places a digit and updates the three houses of the cell
    // leaves self partially modified on error, callers work on copies
    pub(crate) fn place(&mut self, cell: Cell, digit: Digit) -> Result<(), Contradiction> {
        if !self.is_empty_cell(cell) {
            return Err(Contradiction::CellFilled { cell });
        }
        if !self.candidates(cell).contains(digit) {
            return Err(Contradiction::NotACandidate { cell, digit });
        }
        self.cells[cell] = STATUS_SOLVED | digit.as_set().bits();

        let houses = [cell.row().house(), cell.col().house(), cell.block().house()];
        unroll! {
            for i in 0..3 {
                for peer in houses[i].cells() {
                    if self.is_empty_cell(peer) && self.candidates(peer).contains(digit) {
                        self.remove_candidate(peer, digit)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn remove_candidate(&mut self, cell: Cell, digit: Digit) -> Result<(), Contradiction> {
        let word = self.cells[cell] & !digit.as_set().bits();
        if word & MASK == 0 {
            return Err(Contradiction::NoCandidates { cell });
        }
        self.cells[cell] = word;
        Ok(())
    }

    // candidates of empty cells are all digits not placed in a peer
    fn recompute_candidates(&mut self) {
        for cell in Cell::all() {
            if !self.is_empty_cell(cell) {
                continue;
            }
            let placed: Set<Digit> = cell.peers().into_iter().filter_map(|peer| self.digit(peer)).collect();
            self.cells[cell] = STATUS_EMPTY | (!placed).bits();
        }
    }

    /// Places the digits of a solved grid into the empty cells of `self`. Givens stay givens.
    pub(crate) fn filled_from(&self, solution: &[u8; N_CELLS]) -> Grid {
        let mut grid = *self;
        for cell in Cell::all() {
            if grid.is_empty_cell(cell) {
                grid.cells[cell] = STATUS_SOLVED | 1 << (solution[cell.as_index()] - 1);
            }
        }
        grid
    }
}

impl str::FromStr for Grid {
    type Err = LineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_str_line(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_str_line())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid({})", self.to_str_line())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_str_line())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let line = String::deserialize(deserializer)?;
        Grid::from_str_line(&line).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PUZZLE: &str = "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    #[test]
    fn line_roundtrip_normalizes_placeholders() {
        let with_zeros = PUZZLE.replace('.', "0");
        let grid = Grid::from_str_line(&with_zeros).unwrap();
        assert_eq!(grid.to_str_line(), PUZZLE);
        let underscores = PUZZLE.replace('.', "_");
        assert_eq!(Grid::from_str_line(&underscores).unwrap(), grid);
    }

    #[test]
    fn line_parse_errors() {
        assert_eq!(
            Grid::from_str_line(&PUZZLE[..80]),
            Err(LineParseError::NotEnoughCells(80))
        );
        assert_eq!(
            Grid::from_str_line(&format!("{}1", PUZZLE)),
            Err(LineParseError::TooManyCells)
        );
        assert_eq!(
            Grid::from_str_line(&format!("{}comment", PUZZLE)),
            Err(LineParseError::MissingCommentDelimiter)
        );
        assert!(Grid::from_str_line(&format!("{} comment", PUZZLE)).is_ok());
        let invalid = format!("x{}", &PUZZLE[1..]);
        assert_eq!(
            Grid::from_str_line(&invalid),
            Err(LineParseError::InvalidEntry(InvalidEntry { cell: 0, ch: 'x' }))
        );
    }

    #[test]
    fn givens_restrict_peers() {
        let grid = Grid::from_str_line(PUZZLE).unwrap();
        // r1c3 = 3
        let given = Cell::new(2);
        assert_eq!(grid.cell_state(given), CellState::Given(Digit::new(3)));
        for peer in given.peers() {
            assert!(!grid.candidates(peer).contains(Digit::new(3)));
        }
        assert!(grid.check_consistency().is_ok());
    }

    #[test]
    fn set_digit_is_atomic() {
        let mut grid = Grid::empty();
        // leave r1c2 with the single candidate 1
        for digit in 2..=9 {
            grid.eliminate(Candidate::new(1, digit)).unwrap();
        }
        let before = grid;
        // placing 1 in r1c1 would empty r1c2
        assert_eq!(
            grid.set_digit(Cell::new(0), Digit::new(1)),
            Err(Contradiction::NoCandidates { cell: Cell::new(1) })
        );
        assert_eq!(grid, before);

        grid.set_digit(Cell::new(0), Digit::new(2)).unwrap();
        assert_eq!(grid.cell_state(Cell::new(0)), CellState::Solved(Digit::new(2)));
        assert_eq!(
            grid.set_digit(Cell::new(0), Digit::new(3)),
            Err(Contradiction::CellFilled { cell: Cell::new(0) })
        );
        assert_eq!(
            grid.set_digit(Cell::new(2), Digit::new(2)),
            Err(Contradiction::NotACandidate {
                cell: Cell::new(2),
                digit: Digit::new(2)
            })
        );
    }

    #[test]
    fn eliminate_last_candidate_fails() {
        let mut grid = Grid::empty();
        for digit in 1..=8 {
            assert_eq!(grid.eliminate(Candidate::new(40, digit)), Ok(true));
        }
        assert_eq!(grid.eliminate(Candidate::new(40, 1)), Ok(false));
        assert_eq!(
            grid.eliminate(Candidate::new(40, 9)),
            Err(Contradiction::NoCandidates { cell: Cell::new(40) })
        );
        assert!(grid.exists(Candidate::new(40, 9)));
    }

    #[test]
    fn consistency_detects_duplicates() {
        let line = format!("11{}", &PUZZLE[2..]);
        let grid = Grid::from_str_line(&line).unwrap();
        let before = grid;
        assert!(matches!(
            grid.check_consistency(),
            Err(Contradiction::DuplicateDigit { .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn reset_restores_givens() {
        let mut grid = Grid::from_str_line(PUZZLE).unwrap();
        let original = grid;
        let cell = grid.empty_cells().first().unwrap();
        let digit = grid.candidates(cell).first().unwrap();
        grid.set_digit(cell, digit).unwrap();
        assert_ne!(grid, original);
        assert_eq!(grid.reset(), original);
        assert_eq!(grid.n_givens(), original.n_givens());
        assert_eq!(grid.filled_count(), original.filled_count() + 1);
    }

    #[test]
    fn pencilmark_roundtrip() {
        let grid = Grid::from_str_line(PUZZLE).unwrap();
        let printed = grid.display_candidates().to_string();
        let reparsed = Grid::from_pencilmarks(&printed).unwrap();
        // a lone candidate reads back as a placed digit and leaves its peers
        let lone = |cell: Cell| match grid.is_empty_cell(cell) && grid.candidates(cell).len() == 1 {
            true => grid.candidates(cell),
            false => Set::NONE,
        };
        assert!(Cell::all().any(|cell| !lone(cell).is_empty()));
        for cell in Cell::all() {
            let cands = grid.candidates(cell);
            if !lone(cell).is_empty() {
                assert_eq!(reparsed.digit(cell), cands.first());
                continue;
            }
            assert_eq!(grid.digit(cell), reparsed.digit(cell));
            if grid.is_empty_cell(cell) {
                let struck = cell.peers().into_iter().fold(Set::NONE, |acc, peer| acc | lone(peer));
                assert_eq!(cands.without(struck), reparsed.candidates(cell));
            }
        }
    }

    #[test]
    fn pencilmark_errors() {
        assert_eq!(
            Grid::from_pencilmarks("123 45"),
            Err(PencilmarkParseError::WrongCellCount(2))
        );
        assert_eq!(
            Grid::from_pencilmarks("12a"),
            Err(PencilmarkParseError::InvalidEntry(InvalidEntry { cell: 0, ch: 'a' }))
        );
        assert_eq!(
            Grid::from_pencilmarks("121"),
            Err(PencilmarkParseError::RepeatedDigit { cell: 0, digit: 1 })
        );
    }
}
