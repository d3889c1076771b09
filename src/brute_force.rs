//! Brute force solving
//!
//! The logical analysis needs to know whether a puzzle has exactly one solution
//! and what it is. Any solver fulfilling the [`BruteForceSolver`] contract can be
//! plugged into the [`Analyzer`](crate::analysis::Analyzer). [`BacktrackingSolver`] is
//! the default.
use crate::bitset::Set;
use crate::board::{Candidate, Cell, Digit, Grid, House};
use crate::consts::N_CELLS;
use crate::errors::LineParseError;
use crate::helper::{CellArray, HouseArray};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Number of solutions of a grid, as far as it matters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Uniqueness {
    /// Exactly one solution. All cells of the grid are filled.
    Unique(Grid),
    /// The grid can't be solved.
    NoSolution,
    /// There are at least 2 solutions.
    Multiple,
}

/// Contract for solvers that find solutions by search instead of logic.
pub trait BruteForceSolver: Send + Sync {
    /// Solves the grid, respecting its current candidates.
    fn solve(&self, grid: &Grid) -> Uniqueness;

    /// Solves a grid in line format. Returns whether the solution is unique
    /// and, if so, the solution in line format.
    fn solve_line(&self, line: &str) -> Result<(bool, Option<String>), LineParseError> {
        let grid = Grid::from_str_line(line)?;
        Ok(match self.solve(&grid) {
            Uniqueness::Unique(solution) => (true, Some(solution.to_str_line())),
            Uniqueness::NoSolution | Uniqueness::Multiple => (false, None),
        })
    }
}

/// Recursive backtracking solver with constraint propagation.
///
/// Naked and hidden singles are inserted eagerly, guesses are made in the cell
/// with the fewest candidates. The search stops after the second solution.
#[derive(Copy, Clone, Debug, Default)]
pub struct BacktrackingSolver;

impl BruteForceSolver for BacktrackingSolver {
    fn solve(&self, grid: &Grid) -> Uniqueness {
        if grid.check_consistency().is_err() {
            return Uniqueness::NoSolution;
        }
        let mut solutions = Vec::with_capacity(2);
        SolverState::search_grid(grid, 2, None, &mut solutions);
        match solutions.len() {
            0 => Uniqueness::NoSolution,
            1 => Uniqueness::Unique(grid.filled_from(&solutions[0])),
            _ => Uniqueness::Multiple,
        }
    }
}

/// The current branch of the search contradicts itself.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Unsolvable;

/// Board of one search branch. Guessing clones it.
#[derive(Clone, Debug)]
pub(crate) struct SolverState {
    digits: [u8; N_CELLS],
    n_filled: usize,
    candidates: CellArray<Set<Digit>>,
    placed: HouseArray<Set<Digit>>,
}

impl SolverState {
    fn new() -> Self {
        SolverState {
            digits: [0; N_CELLS],
            n_filled: 0,
            candidates: CellArray([Set::ALL; N_CELLS]),
            placed: HouseArray([Set::NONE; 27]),
        }
    }

    /// Collects up to `limit` solutions of `grid`. With an rng, guesses are made in random order.
    pub(crate) fn search_grid(
        grid: &Grid,
        limit: usize,
        rng: Option<&mut (dyn RngCore + '_)>,
        solutions: &mut Vec<[u8; N_CELLS]>,
    ) {
        let mut state = SolverState::new();
        let mut pending = Vec::with_capacity(N_CELLS);
        for cell in Cell::all() {
            match grid.digit(cell) {
                Some(digit) => pending.push(Candidate { cell, digit }),
                None => state.candidates[cell] = grid.candidates(cell),
            }
        }
        // the grid simply has no solution if this fails
        let _ = state.branch(&mut pending, limit, rng, solutions);
    }

    /// Places every pending digit and strikes it from the peers of its cell.
    /// Peers that drop to a single candidate become pending themselves.
    fn propagate(&mut self, pending: &mut Vec<Candidate>) -> Result<(), Unsolvable> {
        while let Some(Candidate { cell, digit }) = pending.pop() {
            match self.digits[cell.as_index()] {
                0 => {}
                placed if placed == digit.get() => continue,
                _ => return Err(Unsolvable),
            }

            let houses = cell.houses();
            let blocked = houses.iter().any(|&house| self.placed[house].contains(digit));
            if blocked || !self.candidates[cell].contains(digit) {
                return Err(Unsolvable);
            }

            self.digits[cell.as_index()] = digit.get();
            self.n_filled += 1;
            self.candidates[cell] = Set::NONE;
            for &house in houses.iter() {
                self.placed[house] |= digit;
            }

            for peer in cell.peers() {
                let cands = &mut self.candidates[peer];
                if !cands.contains(digit) {
                    continue;
                }
                cands.remove(digit.as_set());
                match cands.unique() {
                    Ok(Some(last)) => pending.push(Candidate { cell: peer, digit: last }),
                    Ok(None) => {}
                    Err(_) => return Err(Unsolvable),
                }
            }
        }
        Ok(())
    }

    /// Queues hidden singles, stopping at the first house that has any.
    fn hidden_singles(&self, pending: &mut Vec<Candidate>) -> Result<(), Unsolvable> {
        for house in House::all() {
            let cells = house.cells();
            let (seen, seen_twice) = cells.into_iter().fold((Set::NONE, Set::NONE), |(seen, twice), cell| {
                let cands = self.candidates[cell];
                (seen | cands, twice | (seen & cands))
            });
            if !(seen | self.placed[house]).is_full() {
                return Err(Unsolvable);
            }

            let singles = seen.without(seen_twice);
            if singles.is_empty() {
                continue;
            }
            for cell in cells {
                match (self.candidates[cell] & singles).unique() {
                    Ok(Some(digit)) => pending.push(Candidate { cell, digit }),
                    // two digits that only fit into the same cell
                    Ok(None) => return Err(Unsolvable),
                    Err(_) => {}
                }
            }
            return Ok(());
        }
        Ok(())
    }

    /// Empty cell with the fewest candidates, any bivalue cell ends the scan.
    fn branch_cell(&self) -> Option<Cell> {
        let mut best: Option<(u8, Cell)> = None;
        for cell in Cell::all() {
            let n = self.candidates[cell].len();
            if n == 0 || best.map_or(false, |(fewest, _)| fewest <= n) {
                continue;
            }
            best = Some((n, cell));
            if n == 2 {
                break;
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn branch(
        mut self,
        pending: &mut Vec<Candidate>,
        limit: usize,
        mut rng: Option<&mut (dyn RngCore + '_)>,
        solutions: &mut Vec<[u8; N_CELLS]>,
    ) -> Result<(), Unsolvable> {
        loop {
            self.propagate(pending)?;
            if self.n_filled == N_CELLS {
                solutions.push(self.digits);
                return Ok(());
            }
            self.hidden_singles(pending)?;
            if pending.is_empty() {
                break;
            }
        }

        let cell = self.branch_cell().ok_or(Unsolvable)?;
        let mut guesses: Vec<Digit> = self.candidates[cell].into_iter().collect();
        if let Some(rng) = rng.as_deref_mut() {
            guesses.shuffle(rng);
        }
        for digit in guesses {
            if solutions.len() >= limit {
                break;
            }
            pending.clear();
            pending.push(Candidate { cell, digit });
            let _ = self.clone().branch(pending, limit, rng.as_deref_mut(), solutions);
        }
        Ok(())
    }
}
