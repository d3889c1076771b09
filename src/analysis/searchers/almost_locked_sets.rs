use super::prelude::*;
use std::collections::HashSet;

/// ALS-XZ, singly and doubly linked.
///
/// An almost locked set (ALS) is a set of `n` cells in one house with `n + 1` candidates.
/// Two ALS with a restricted common digit `x`, one whose candidates in both sets all
/// see each other, can't both lose `x`. So one of them is locked, and any other common
/// digit `z` must be in one of them.
pub(crate) struct AlsXzSearcher;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Als {
    cells: Set<Cell>,
    digits: Set<Digit>,
}

impl StepSearcher for AlsXzSearcher {
    fn name(&self) -> &'static str {
        "ALS-XZ"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::AlsXz, Technique::AlsXzDoublyLinked]
    }

    fn priority(&self) -> u16 {
        180
    }

    fn flags(&self) -> SearcherFlags {
        SearcherFlags::SLOW
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        let sets = find_almost_locked_sets(maps, ctx.config().max_als_size);

        for (i, first) in sets.iter().enumerate() {
            if ctx.is_cancelled() {
                return Ok(());
            }
            for second in &sets[i + 1..] {
                if first.cells.overlaps(second.cells) {
                    continue;
                }
                let common_digits = first.digits & second.digits;
                if common_digits.len() < 2 {
                    continue;
                }
                let restricted_commons: Set<Digit> = common_digits
                    .into_iter()
                    .filter(|&digit| is_restricted_common(maps, first, second, digit))
                    .collect();
                if restricted_commons.is_empty() {
                    continue;
                }
                if ctx.add(als_step(maps, first, second, restricted_commons)) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

// all candidates of `digit` in both sets see each other
fn is_restricted_common(maps: &GridMaps, first: &Als, second: &Als, digit: Digit) -> bool {
    let cells1 = first.cells & maps.digit_cells[digit];
    let cells2 = second.cells & maps.digit_cells[digit];
    cells1
        .into_iter()
        .all(|cell1| cells2.into_iter().all(|cell2| cell1.sees(cell2)))
}

fn als_step(maps: &GridMaps, first: &Als, second: &Als, restricted_commons: Set<Digit>) -> Step {
    let union = first.cells | second.cells;
    let mut conclusions = vec![];
    let mut eliminate_seen = |digit: Digit, cells: Set<Cell>| {
        let digit_cells = cells & maps.digit_cells[digit];
        let targets = (digit_cells.common_peers() & maps.digit_cells[digit]).without(union);
        conclusions.extend(targets.into_iter().map(|cell| Conclusion::elimination(cell, digit)));
    };

    let technique = match restricted_commons.len() {
        1 => {
            let others = (first.digits & second.digits).without(restricted_commons);
            for digit in others {
                eliminate_seen(digit, union);
            }
            Technique::AlsXz
        }
        _ => {
            // both sets are locked. every restricted common is in one of them,
            // every other digit in its own set
            for digit in restricted_commons {
                eliminate_seen(digit, union);
            }
            for als in &[first, second] {
                for digit in als.digits.without(restricted_commons) {
                    eliminate_seen(digit, als.cells);
                }
            }
            Technique::AlsXzDoublyLinked
        }
    };

    let detail = StepDetail::Als {
        first: first.cells,
        second: second.cells,
        restricted_common: restricted_commons,
    };
    Step::new(technique, conclusions, detail)
}

// sets found in several houses (e.g. a row and a block) are kept once
fn find_almost_locked_sets(maps: &GridMaps, max_size: u8) -> Vec<Als> {
    let mut seen = HashSet::new();
    let mut sets = vec![];
    for house in House::all() {
        let cells = house.cells() & maps.empty_cells;
        walk_combinations(maps, cells.into_iter(), Set::NONE, Set::NONE, max_size, &mut |als| {
            if seen.insert(als.cells) {
                sets.push(als);
            }
        });
    }
    sets
}

fn walk_combinations(
    maps: &GridMaps,
    cells: SetIter<Cell>,
    cell_set: Set<Cell>,
    digits: Set<Digit>,
    max_size: u8,
    on_als: &mut impl FnMut(Als),
) {
    if cell_set.len() == max_size {
        return;
    }
    let mut cells = cells;
    while let Some(cell) = cells.next() {
        let candidates = maps.cell_poss_digits[cell];
        if candidates.len() <= 1 {
            continue;
        }
        let new_cell_set = cell_set | cell;
        let new_digits = digits | candidates;
        // digits never shrink, so a set with too many can't become an ALS
        if new_digits.len() > max_size + 1 {
            continue;
        }

        if new_digits.len() == new_cell_set.len() + 1 {
            on_als(Als {
                cells: new_cell_set,
                digits: new_digits,
            });
        }
        walk_combinations(maps, cells, new_cell_set, new_digits, max_size, on_als);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SearchMode};
    use crate::board::{Candidate, Grid};

    fn restrict(grid: &mut Grid, cell: u8, digits: &[u8]) {
        for digit in (1..=9).filter(|digit| !digits.contains(digit)) {
            grid.eliminate(Candidate::new(cell, digit)).unwrap();
        }
    }

    fn find_all(grid: &Grid) -> Vec<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(grid, &maps, &config, SearchMode::CollectAll);
        AlsXzSearcher.search(&mut ctx).unwrap();
        ctx.into_steps()
    }

    #[test]
    fn singly_linked() {
        let mut grid = Grid::empty();
        // A = r1c1 {1,2}, B = r1c5 {1,3} + r5c5 {2,3}, x = 1, z = 2
        restrict(&mut grid, 0, &[1, 2]);
        restrict(&mut grid, 4, &[1, 3]);
        restrict(&mut grid, 40, &[2, 3]);
        let steps = find_all(&grid);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].technique(), Technique::AlsXz);
        assert_eq!(
            steps[0].conclusions(),
            &[Conclusion::elimination(Cell::new(36), Digit::new(2))][..]
        );
    }

    #[test]
    fn doubly_linked() {
        let mut grid = Grid::empty();
        restrict(&mut grid, 0, &[1, 2]);
        restrict(&mut grid, 4, &[1, 2]);
        let steps = find_all(&grid);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].technique(), Technique::AlsXzDoublyLinked);
        assert_eq!(steps[0].conclusions().len(), 2 * 7);
    }

    #[test]
    fn sets_are_deduplicated() {
        let mut grid = Grid::empty();
        restrict(&mut grid, 0, &[1, 2]);
        restrict(&mut grid, 1, &[1, 3]);
        let maps = GridMaps::new(&grid);
        let sets = find_almost_locked_sets(&maps, 4);
        // r1c1, r1c2 and both together, found in r1 and b1
        assert_eq!(sets.len(), 3);
    }
}
