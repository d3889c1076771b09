use super::prelude::*;

/// A bivalue hinge `xy` with pincers `xz` and `yz` that each see the hinge.
/// Whatever the hinge holds, one pincer is `z`.
pub(crate) struct XyWingSearcher;

/// A trivalue hinge `xyz` with pincers `xz` and `yz`. One of the three cells is `z`.
pub(crate) struct XyzWingSearcher;

impl StepSearcher for XyWingSearcher {
    fn name(&self) -> &'static str {
        "XY-Wing"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::XyWing]
    }

    fn priority(&self) -> u16 {
        100
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        find_wings(ctx, Technique::XyWing);
        Ok(())
    }
}

impl StepSearcher for XyzWingSearcher {
    fn name(&self) -> &'static str {
        "XYZ-Wing"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::XyzWing]
    }

    fn priority(&self) -> u16 {
        110
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        find_wings(ctx, Technique::XyzWing);
        Ok(())
    }
}

fn find_wings(ctx: &mut AnalysisContext, technique: Technique) {
    let maps = ctx.maps();
    let is_xyz = technique == Technique::XyzWing;
    let (hinge_size, shared_with_hinge) = match is_xyz {
        true => (3, 2),
        false => (2, 1),
    };

    for cell in maps.empty_cells {
        let poss_digits = maps.cell_poss_digits[cell];
        if poss_digits.len() != hinge_size {
            continue;
        }

        let row_cells = cell.row().cells();
        let col_cells = cell.col().cells();
        let block_cells = cell.block().cells();

        // nonoverlapping (disjoint = dj) cell sets
        let row_dj = row_cells.without(block_cells);
        let col_dj = col_cells.without(block_cells);
        let block_row_dj = block_cells.without(row_cells);
        let block_col_dj = block_cells.without(col_cells);

        // with both pincers in lines, no cell sees all three cells of an xyz-wing
        let pairs = [(block_row_dj, row_dj), (block_col_dj, col_dj), (row_dj, col_dj)];
        let pincer_houses = match is_xyz {
            true => &pairs[..2],
            false => &pairs[..],
        };

        for &(cells1, cells2) in pincer_houses {
            let overlapping_bivalue_cells = |cells: Set<Cell>| {
                (cells & maps.bivalue_cells)
                    .into_iter()
                    .map(|cell| (cell, maps.cell_poss_digits[cell]))
                    .filter(|&(_, other_poss_digs)| (poss_digits & other_poss_digs).len() == shared_with_hinge)
            };
            for (cell1, poss_digs1) in overlapping_bivalue_cells(cells1) {
                for (cell2, poss_digs2) in overlapping_bivalue_cells(cells2) {
                    let common_digits = poss_digs1 & poss_digs2;
                    if common_digits.len() != 1 || (poss_digs1 | poss_digs2 | poss_digits).len() != 3 {
                        continue;
                    }
                    let digit = match common_digits.first() {
                        Some(digit) => digit,
                        None => continue,
                    };

                    let pincers = cell1.as_set() | cell2;
                    let wing_cells = match is_xyz {
                        true => pincers | cell,
                        false => pincers,
                    };
                    let targets = wing_cells.common_peers() & maps.digit_cells[digit];
                    let conclusions = targets
                        .into_iter()
                        .map(|target| Conclusion::elimination(target, digit))
                        .collect();
                    let detail = StepDetail::Wing {
                        hinge: cell,
                        pincers,
                        digit,
                    };
                    if ctx.add(Step::new(technique, conclusions, detail)) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SearchMode};
    use crate::board::Grid;

    fn find(searcher: &dyn StepSearcher, grid: &Grid, mode: SearchMode) -> Vec<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(grid, &maps, &config, mode);
        searcher.search(&mut ctx).unwrap();
        ctx.into_steps()
    }

    // sudoku taken from http://www.sudokuwiki.org/Y_Wing_Strategy, Example 1 (2019-03-18)
    #[test]
    fn xy_wing() {
        let grid = Grid::from_str_line(
            "9..24.....5.69.231.2..5..9..9.7..32...29356.7.7...29...69.2..7351..79.622.7.86..9",
        )
        .unwrap();
        let steps = find(&XyWingSearcher, &grid, SearchMode::FindOne);

        match steps[0].detail() {
            StepDetail::Wing { hinge, pincers, digit } => {
                assert_eq!(hinge.get(), 1);
                assert_eq!(*pincers, Cell::new(1 * 9 + 2).as_set() | Cell::new(8 * 9 + 1));
                assert_eq!(*digit, Digit::new(4));
            }
            detail => panic!("unexpected detail {:?}", detail),
        }
        assert_eq!(
            steps[0].conclusions(),
            &[Conclusion::elimination(Cell::new(7 * 9 + 2), Digit::new(4))][..]
        );
    }

    #[test]
    fn xyz_wing() {
        let grid = Grid::from_pencilmarks(
            "
            ┌─────────────────┬───────────────────┬────────────────┐
            │ 38   9     2    │ 46    48    1     │ 7     5   346  │
            │ 5    134   1467 │ 2     47    679   │ 346   19  8    │
            │ 146  148   1467 │ 4569  3     56789 │ 2     19  46   │
            ├─────────────────┼───────────────────┼────────────────┤
            │ 38   7     5    │ 13    128   4     │ 9     6   12   │
            │ 2    38    14   │ 139   6     89    │ 148   7   5    │
            │ 14   6     9    │ 7     125   258   │ 148   3   124  │
            ├─────────────────┼───────────────────┼────────────────┤
            │ 146  145   8    │ 1456  9     567   │ 1356  2   1367 │
            │ 7    1245  146  │ 1456  1245  3     │ 156   8   9    │
            │ 9    125   3    │ 8     1257  2567  │ 156   4   167  │
            └─────────────────┴───────────────────┴────────────────┘",
        )
        .unwrap();
        let steps = find(&XyzWingSearcher, &grid, SearchMode::CollectAll);

        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].detail(),
            &StepDetail::Wing {
                hinge: Cell::new(5 * 9 + 8),
                pincers: Cell::new(3 * 9 + 8).as_set() | Cell::new(5 * 9 + 0),
                digit: Digit::new(1),
            }
        );
        assert_eq!(
            steps[0].conclusions(),
            &[Conclusion::elimination(Cell::new(5 * 9 + 6), Digit::new(1))][..]
        );
    }
}
