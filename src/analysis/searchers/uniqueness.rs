//! Techniques that assume the puzzle has exactly one solution
//!
//! Both patterns avoid a deadly pattern: a set of candidates that could be permuted
//! into a second solution.
use super::prelude::*;

/// Unique rectangles of type 1 and 2
pub(crate) struct UniqueRectangleSearcher;

/// Bivalue universal grave plus one
pub(crate) struct BugSearcher;

impl StepSearcher for UniqueRectangleSearcher {
    fn name(&self) -> &'static str {
        "Unique Rectangle"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::UniqueRectangleType1, Technique::UniqueRectangleType2]
    }

    fn priority(&self) -> u16 {
        120
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        for row1 in 0..9u8 {
            for row2 in row1 + 1..9 {
                for col1 in 0..9u8 {
                    for col2 in col1 + 1..9 {
                        // the rectangle must lie in exactly 2 blocks
                        let same_band = row1 / 3 == row2 / 3;
                        let same_stack = col1 / 3 == col2 / 3;
                        if same_band == same_stack {
                            continue;
                        }
                        let corners = [
                            Cell::new(row1 * 9 + col1),
                            Cell::new(row1 * 9 + col2),
                            Cell::new(row2 * 9 + col1),
                            Cell::new(row2 * 9 + col2),
                        ];
                        if check_rectangle(ctx, corners) {
                            return Ok(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// returns true when the search should stop
fn check_rectangle(ctx: &mut AnalysisContext, corners: [Cell; 4]) -> bool {
    let maps = ctx.maps();
    let cells: Set<Cell> = corners.iter().copied().collect();
    if !maps.empty_cells.contains(cells) {
        return false;
    }
    let common = corners
        .iter()
        .fold(Set::ALL, |digits, &cell| digits & maps.cell_poss_digits[cell]);
    if common.len() < 2 {
        return false;
    }

    let digit_list: Vec<Digit> = common.into_iter().collect();
    for (i, &a) in digit_list.iter().enumerate() {
        for &b in &digit_list[i + 1..] {
            let pair = a.as_set() | b;
            let floor: Set<Cell> = corners
                .iter()
                .copied()
                .filter(|&cell| maps.cell_poss_digits[cell] == pair)
                .collect();
            let roof = cells.without(floor);

            let step = match floor.len() {
                3 => {
                    let conclusions = roof
                        .into_iter()
                        .flat_map(|cell| vec![Conclusion::elimination(cell, a), Conclusion::elimination(cell, b)])
                        .collect();
                    Step::new(
                        Technique::UniqueRectangleType1,
                        conclusions,
                        StepDetail::UniqueRectangle { cells, digits: pair },
                    )
                }
                2 if !floor.common_houses().is_empty() => {
                    let extras = roof
                        .into_iter()
                        .fold(Set::NONE, |digits, cell| digits | maps.cell_poss_digits[cell])
                        .without(pair);
                    let all_roofs_triple = roof.into_iter().all(|cell| maps.cell_poss_digits[cell].len() == 3);
                    let extra = match extras.unique() {
                        Ok(Some(extra)) if all_roofs_triple => extra,
                        _ => continue,
                    };
                    let targets = roof.common_peers() & maps.digit_cells[extra];
                    let conclusions = targets
                        .into_iter()
                        .map(|cell| Conclusion::elimination(cell, extra))
                        .collect();
                    Step::new(
                        Technique::UniqueRectangleType2,
                        conclusions,
                        StepDetail::UniqueRectangle { cells, digits: pair },
                    )
                }
                _ => continue,
            };
            if ctx.add(step) {
                return true;
            }
        }
    }
    false
}

impl StepSearcher for BugSearcher {
    fn name(&self) -> &'static str {
        "BUG+1"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::BugPlusOne]
    }

    fn priority(&self) -> u16 {
        170
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        let others = maps.empty_cells.without(maps.bivalue_cells);
        let tri_cell = match others.unique() {
            Ok(Some(cell)) if maps.cell_poss_digits[cell].len() == 3 => cell,
            _ => return Ok(()),
        };
        let tri_houses: Set<House> = tri_cell.houses().iter().copied().collect();

        let extra = maps.cell_poss_digits[tri_cell].into_iter().find(|&extra| {
            House::all().all(|house| {
                (!maps.house_solved_digits[house]).into_iter().all(|digit| {
                    let expected = match digit == extra && tri_houses.contains(house) {
                        true => 3,
                        false => 2,
                    };
                    maps.house_poss_positions[house][digit].len() == expected
                })
            })
        });

        if let Some(digit) = extra {
            ctx.add(Step::new(
                Technique::BugPlusOne,
                vec![Conclusion::assignment(tri_cell, digit)],
                StepDetail::Bug { cell: tri_cell, digit },
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SearchMode};
    use crate::board::{Candidate, Grid};

    fn find_all(searcher: &dyn StepSearcher, grid: &Grid) -> Vec<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(grid, &maps, &config, SearchMode::CollectAll);
        searcher.search(&mut ctx).unwrap();
        ctx.into_steps()
    }

    fn restrict(grid: &mut Grid, cell: u8, digits: &[u8]) {
        for digit in (1..=9).filter(|digit| !digits.contains(digit)) {
            grid.eliminate(Candidate::new(cell, digit)).unwrap();
        }
    }

    #[test]
    fn unique_rectangle_type_1() {
        let mut grid = Grid::empty();
        for &cell in &[0, 3, 9] {
            restrict(&mut grid, cell, &[1, 2]);
        }
        let steps = find_all(&UniqueRectangleSearcher, &grid);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].technique(), Technique::UniqueRectangleType1);
        assert_eq!(
            steps[0].conclusions(),
            &[
                Conclusion::elimination(Cell::new(12), Digit::new(1)),
                Conclusion::elimination(Cell::new(12), Digit::new(2)),
            ][..]
        );
    }

    #[test]
    fn unique_rectangle_type_2() {
        let mut grid = Grid::empty();
        restrict(&mut grid, 0, &[1, 2]);
        restrict(&mut grid, 3, &[1, 2]);
        restrict(&mut grid, 9, &[1, 2, 7]);
        restrict(&mut grid, 12, &[1, 2, 7]);
        let steps = find_all(&UniqueRectangleSearcher, &grid);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].technique(), Technique::UniqueRectangleType2);
        let expected: Vec<_> = [10, 11, 13, 14, 15, 16, 17]
            .iter()
            .map(|&cell| Conclusion::elimination(Cell::new(cell), Digit::new(7)))
            .collect();
        assert_eq!(steps[0].conclusions(), &expected[..]);
    }

    #[test]
    fn rectangle_in_four_blocks_is_ignored() {
        let mut grid = Grid::empty();
        for &cell in &[0, 4, 36] {
            restrict(&mut grid, cell, &[1, 2]);
        }
        assert!(find_all(&UniqueRectangleSearcher, &grid).is_empty());
    }

    #[test]
    fn bug_plus_one() {
        // all 1s, 2s and 3s of a solution made bivalue by rotating the three digits,
        // with an extra candidate in r1c1
        let pencilmarks: Vec<String> = (0..81)
            .map(|cell| {
                let (row, col) = (cell / 9, cell % 9);
                let digit = (row * 3 + row / 3 + col) % 9 + 1;
                match digit {
                    1 if cell == 0 => "123".to_string(),
                    1..=3 => format!("{}{}", digit, digit % 3 + 1),
                    _ => digit.to_string(),
                }
            })
            .collect();
        let grid = Grid::from_pencilmarks(&pencilmarks.join(" ")).unwrap();
        let steps = find_all(&BugSearcher, &grid);
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].conclusions(),
            &[Conclusion::assignment(Cell::new(0), Digit::new(3))][..]
        );
    }
}
