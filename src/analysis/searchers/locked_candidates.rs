use super::prelude::*;

/// Pointing and claiming.
///
/// Works chute by chute on the candidates of its 9 minilines. A digit that is confined
/// to one miniline of a block can be removed from the rest of the line (pointing)
/// and a digit confined to one miniline of a line can be removed from the rest of the
/// block (claiming).
pub(crate) struct LockedCandidatesSearcher;

impl StepSearcher for LockedCandidatesSearcher {
    fn name(&self) -> &'static str {
        "Locked Candidates"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::Pointing, Technique::Claiming]
    }

    fn priority(&self) -> u16 {
        30
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        for chute in Chute::all() {
            let minilines = chute.minilines();
            let mut miniline_poss_digits = [Set::NONE; 9];
            for (&miniline, poss_digits) in minilines.iter().zip(miniline_poss_digits.iter_mut()) {
                for cell in miniline.cells() {
                    *poss_digits |= maps.cell_poss_digits[cell];
                }
            }

            let poss_digits = |chute_line: usize, chute_field: usize| miniline_poss_digits[chute_line * 3 + chute_field];
            let mut line_unique_digits = [Set::NONE; 3];
            let mut block_unique_digits = [Set::NONE; 3];
            for i in 0..3 {
                line_unique_digits[i] = find_unique((0..3).map(|field| poss_digits(i, field)));
                block_unique_digits[i] = find_unique((0..3).map(|line| poss_digits(line, i)));
            }

            for (i, (&miniline, &poss_digits)) in minilines.iter().zip(miniline_poss_digits.iter()).enumerate() {
                let (line_neighbors, block_neighbors) = miniline.neighbors();
                let pointing = poss_digits & block_unique_digits[i % 3];
                let claiming = poss_digits & line_unique_digits[i / 3];

                for &(uniques, neighbors, is_pointing) in [
                    (pointing, &line_neighbors, true),
                    (claiming, &block_neighbors, false),
                ]
                .iter()
                {
                    for digit in uniques {
                        let targets = neighbors
                            .iter()
                            .fold(Set::NONE, |cells, neighbor| cells | neighbor.cells())
                            & maps.digit_cells[digit];
                        if targets.is_empty() {
                            continue;
                        }
                        let technique = match is_pointing {
                            true => Technique::Pointing,
                            false => Technique::Claiming,
                        };
                        let conclusions = targets
                            .into_iter()
                            .map(|cell| Conclusion::elimination(cell, digit))
                            .collect();
                        let detail = StepDetail::LockedCandidates {
                            miniline,
                            digit,
                            is_pointing,
                        };
                        if ctx.add(Step::new(technique, conclusions, detail)) {
                            return Ok(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// digits that occur in exactly one of the sets
#[inline]
fn find_unique<I: Iterator<Item = Set<Digit>>>(possibilities: I) -> Set<Digit> {
    let mut unsolved = Set::NONE;
    let mut multiple_unsolved = Set::NONE;

    for poss_digits in possibilities {
        multiple_unsolved |= unsolved & poss_digits;
        unsolved |= poss_digits;
    }
    unsolved.without(multiple_unsolved)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SearchMode};
    use crate::board::{Candidate, Grid};

    fn find_all(grid: &Grid) -> Vec<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(grid, &maps, &config, SearchMode::CollectAll);
        LockedCandidatesSearcher.search(&mut ctx).unwrap();
        ctx.into_steps()
    }

    #[test]
    fn pointing() {
        let mut grid = Grid::empty();
        // 7 in block 1 only in r1
        for &cell in &[9, 10, 11, 18, 19, 20] {
            grid.eliminate(Candidate::new(cell, 7)).unwrap();
        }
        let steps = find_all(&grid);
        let step = steps
            .iter()
            .find(|step| step.technique() == Technique::Pointing)
            .unwrap();
        let expected: Vec<_> = (3..9)
            .map(|cell| Conclusion::elimination(Cell::new(cell), Digit::new(7)))
            .collect();
        assert_eq!(step.conclusions(), &expected[..]);
    }

    #[test]
    fn claiming() {
        let mut grid = Grid::empty();
        // 4 in r5 only in block 5
        for cell in (36..45).filter(|&cell| cell % 9 < 3 || cell % 9 > 5) {
            grid.eliminate(Candidate::new(cell, 4)).unwrap();
        }
        let steps = find_all(&grid);
        let step = steps
            .iter()
            .find(|step| step.technique() == Technique::Claiming)
            .unwrap();
        let expected: Vec<_> = [30, 31, 32, 48, 49, 50]
            .iter()
            .map(|&cell| Conclusion::elimination(Cell::new(cell), Digit::new(4)))
            .collect();
        assert_eq!(step.conclusions(), &expected[..]);
    }

    #[test]
    fn nothing_on_empty_grid() {
        assert!(find_all(&Grid::empty()).is_empty());
    }
}
