//! Generation of random puzzles
//!
//! Puzzles are generated by randomized solving of an empty grid followed by
//! removal of clues in random order, as long as the solution stays unique.
use crate::board::Grid;
use crate::brute_force::SolverState;
use crate::consts::N_CELLS;
use rand::seq::SliceRandom;
use rand::Rng;

/// Generates a random, completely filled grid. All cells are givens.
pub fn generate_filled() -> Grid {
    generate_filled_with_rng(&mut rand::thread_rng())
}

/// Like [`generate_filled`], with a caller supplied source of randomness.
pub fn generate_filled_with_rng<R: Rng>(rng: &mut R) -> Grid {
    Grid::from_digits(&random_solution(rng))
}

/// Generates a random puzzle with a unique solution. No clue can be removed
/// without losing uniqueness.
pub fn generate_unique() -> Grid {
    generate_unique_with_rng(&mut rand::thread_rng())
}

/// Like [`generate_unique`], with a caller supplied source of randomness.
pub fn generate_unique_with_rng<R: Rng>(rng: &mut R) -> Grid {
    let mut digits = random_solution(rng);

    let mut cells: Vec<usize> = (0..N_CELLS).collect();
    cells.shuffle(rng);

    for cell in cells {
        let digit = digits[cell];
        digits[cell] = 0;
        if count_solutions(&digits) != 1 {
            digits[cell] = digit;
        }
    }
    tracing::debug!(
        n_clues = digits.iter().filter(|&&d| d != 0).count(),
        "generated unique puzzle"
    );
    Grid::from_digits(&digits)
}

fn random_solution<R: Rng>(rng: &mut R) -> [u8; N_CELLS] {
    // fill first row with a permutation of 1...9
    // not necessary, but speeds up the search
    let mut perm = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    perm.shuffle(rng);
    let mut first_row = [0; N_CELLS];
    first_row[..9].copy_from_slice(&perm);

    let mut solutions = Vec::with_capacity(1);
    SolverState::search_grid(
        &Grid::from_digits(&first_row),
        1,
        Some(rng as &mut dyn rand::RngCore),
        &mut solutions,
    );
    // any permutation in the first row can be completed
    debug_assert_eq!(solutions.len(), 1);
    solutions.pop().unwrap_or(first_row)
}

fn count_solutions(digits: &[u8; N_CELLS]) -> usize {
    let mut solutions = Vec::with_capacity(2);
    SolverState::search_grid(&Grid::from_digits(digits), 2, None, &mut solutions);
    solutions.len()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::Cell;
    use crate::brute_force::Uniqueness;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn filled_grid_is_solved() {
        let grid = generate_filled_with_rng(&mut StdRng::seed_from_u64(7));
        assert!(grid.is_solved());
        assert_eq!(grid.n_givens(), 81);
    }

    #[test]
    fn generated_puzzle_is_unique_and_minimal() {
        let mut rng = StdRng::seed_from_u64(42);
        let puzzle = generate_unique_with_rng(&mut rng);
        assert!(matches!(puzzle.uniqueness(), Uniqueness::Unique(_)));

        // removing any clue must break uniqueness
        let line = puzzle.to_str_line();
        for cell in Cell::all().filter(|&cell| puzzle.is_given(cell)).take(5) {
            let mut reduced = line.clone().into_bytes();
            reduced[cell.as_index()] = b'.';
            let reduced = Grid::from_str_line(std::str::from_utf8(&reduced).unwrap()).unwrap();
            assert_eq!(reduced.uniqueness(), Uniqueness::Multiple);
        }
    }
}
