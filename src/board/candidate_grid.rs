use super::{Cell, CellState, Grid};
use std::fmt;

/// Pencilmark view of a grid, one column per board column, padded to the
/// widest candidate list of that column.
///
/// ```text
/// +--------------+--------------+---------------+
/// | 1   2    3   | 4   5    6   | 7   8    45   |
/// | 458 4578 478 | 123 1237 178 | 346 3456 9    |
/// ...
/// ```
pub(crate) struct CandidateGrid<'a> {
    grid: &'a Grid,
    widths: [usize; 9],
}

impl<'a> CandidateGrid<'a> {
    pub(crate) fn new(grid: &'a Grid) -> Self {
        let mut widths = [1; 9];
        for cell in Cell::all() {
            let width = &mut widths[cell.as_index() % 9];
            if let CellState::Candidates(cands) = grid.cell_state(cell) {
                *width = (*width).max(cands.len() as usize);
            }
        }
        CandidateGrid { grid, widths }
    }

    fn separator(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stack in self.widths.chunks(3) {
            // one space before each cell, one after the last
            let width: usize = stack.iter().map(|w| w + 1).sum::<usize>() + 1;
            write!(f, "+{:-<1$}", "", width)?;
        }
        writeln!(f, "+")
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellState::Given(digit) | CellState::Solved(digit) => f.pad(&digit.to_string()),
            CellState::Candidates(cands) => f.pad(&cands.to_string()),
        }
    }
}

impl fmt::Display for CandidateGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.separator(f)?;
        for row in 0..9u8 {
            for col in 0..9u8 {
                if col % 3 == 0 {
                    f.write_str("|")?;
                }
                let state = self.grid.cell_state(Cell::new(row * 9 + col));
                write!(f, " {:<1$}", state, self.widths[col as usize])?;
                if col % 3 == 2 {
                    f.write_str(" ")?;
                }
            }
            writeln!(f, "|")?;
            if row % 3 == 2 {
                self.separator(f)?;
            }
        }
        Ok(())
    }
}
