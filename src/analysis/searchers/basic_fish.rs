use super::prelude::*;

/// Fish without fins, from X-Wing (2 lines) up to Leviathan (7 lines).
///
/// `n` base lines whose candidates for a digit lie in `n` cross lines together. The
/// digit must occupy those crossings, so it can be removed from the rest of the cover lines.
pub(crate) struct BasicFishSearcher {
    size: u8,
    technique: [Technique; 1],
}

impl BasicFishSearcher {
    pub(crate) fn new(size: u8) -> Self {
        let technique = match size {
            2 => Technique::XWing,
            3 => Technique::Swordfish,
            4 => Technique::Jellyfish,
            5 => Technique::Squirmbag,
            6 => Technique::Whale,
            7 => Technique::Leviathan,
            _ => panic!("basic fish have 2 to 7 base lines, got {}", size),
        };
        BasicFishSearcher {
            size,
            technique: [technique],
        }
    }

    // returns true when the search should stop
    fn walk_combinations(
        &self,
        ctx: &mut AnalysisContext,
        digit: Digit,
        line_set: Set<Line>,
        lines: SetIter<Line>,
        union_poss_pos: Set<Position<Line>>,
    ) -> bool {
        if line_set.len() == self.size {
            return union_poss_pos.len() == self.size && self.report(ctx, digit, line_set, union_poss_pos);
        }

        let mut lines = lines;
        while let Some(line) = lines.next() {
            let possible_pos = ctx.maps().house_poss_positions[line][digit];
            let new_union_poss_pos = union_poss_pos | possible_pos.as_line_set();

            // n_poss == 0 => solved line
            // n_poss == 1 => hidden single
            if possible_pos.len() < 2 || new_union_poss_pos.len() > self.size {
                continue;
            }
            if self.walk_combinations(ctx, digit, line_set | line, lines, new_union_poss_pos) {
                return true;
            }
        }
        false
    }

    fn report(&self, ctx: &mut AnalysisContext, digit: Digit, base: Set<Line>, positions: Set<Position<Line>>) -> bool {
        let cover = cover_lines(base, positions);
        let base_cells = base.into_iter().fold(Set::NONE, |cells, line| cells | line.cells());
        let cover_cells = cover.into_iter().fold(Set::NONE, |cells, line| cells | line.cells());
        let targets = (cover_cells & ctx.maps().digit_cells[digit]).without(base_cells);

        let conclusions = targets.into_iter().map(|cell| Conclusion::elimination(cell, digit)).collect();
        let detail = StepDetail::Fish {
            digit,
            base,
            cover,
            fins: Set::NONE,
        };
        ctx.add(Step::new(self.technique[0], conclusions, detail))
    }
}

/// The lines crossing the lines of `base` at `positions`.
pub(crate) fn cover_lines(base: Set<Line>, positions: Set<Position<Line>>) -> Set<Line> {
    let rows_are_base = base.into_iter().next().map_or(true, Line::is_row);
    positions
        .into_iter()
        .map(|pos| match rows_are_base {
            true => Line::new(9 + pos.as_index() as u8),
            false => Line::new(pos.as_index() as u8),
        })
        .collect()
}

impl StepSearcher for BasicFishSearcher {
    fn name(&self) -> &'static str {
        self.technique[0].name()
    }

    fn techniques(&self) -> &[Technique] {
        &self.technique
    }

    fn priority(&self) -> u16 {
        match self.size {
            2 => 50,
            3 => 80,
            4 => 140,
            size => 180 + size as u16,
        }
    }

    fn flags(&self) -> SearcherFlags {
        match self.size > 4 {
            true => SearcherFlags::SLOW,
            false => SearcherFlags::NONE,
        }
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        for digit in Digit::all() {
            for &lines in &[Line::ALL_ROWS, Line::ALL_COLS] {
                if ctx.is_cancelled() || self.walk_combinations(ctx, digit, Set::NONE, lines.into_iter(), Set::NONE) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SearchMode};
    use crate::board::{Candidate, Grid};

    fn find_all(size: u8, grid: &Grid) -> Vec<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default().with_max_fish_size(7);
        let mut ctx = AnalysisContext::new(grid, &maps, &config, SearchMode::CollectAll);
        BasicFishSearcher::new(size).search(&mut ctx).unwrap();
        ctx.into_steps()
    }

    #[test]
    fn x_wing_in_rows() {
        let mut grid = Grid::empty();
        // 6 in r2 and r7 only in c3 and c8
        for &row in &[1u8, 6] {
            for col in (0..9).filter(|&col| col != 2 && col != 7) {
                grid.eliminate(Candidate::new(row * 9 + col, 6)).unwrap();
            }
        }
        let steps = find_all(2, &grid);
        assert_eq!(steps.len(), 1);
        let step = &steps[0];
        assert_eq!(step.technique(), Technique::XWing);
        assert_eq!(step.conclusions().len(), 2 * 7);
        assert!(step.conclusions().iter().all(|c| c.digit() == Digit::new(6)));
        assert!(step
            .conclusions()
            .contains(&Conclusion::elimination(Cell::new(2), Digit::new(6))));
        match step.detail() {
            StepDetail::Fish { base, cover, .. } => {
                assert_eq!(base.to_string(), "r2,r7");
                assert_eq!(cover.to_string(), "c3,c8");
            }
            detail => panic!("unexpected detail {:?}", detail),
        }
    }

    #[test]
    fn cover_lines_of_columns() {
        let base = Line::new(9).as_set() | Line::new(12);
        let positions = Position::<Line>::new(0).as_set() | Position::new(8);
        assert_eq!(cover_lines(base, positions), Line::new(0).as_set() | Line::new(8));
    }

    #[test]
    fn big_fish_are_slow() {
        assert!(BasicFishSearcher::new(5).flags().contains(SearcherFlags::SLOW));
        assert!(!BasicFishSearcher::new(4).flags().contains(SearcherFlags::SLOW));
        assert_eq!(BasicFishSearcher::new(6).name(), "Whale");
    }
}
