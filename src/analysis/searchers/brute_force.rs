use super::prelude::*;

/// Last resort when logic fails: places the solution digit of the empty cell with
/// the fewest candidates.
pub(crate) struct BruteForceSearcher;

impl StepSearcher for BruteForceSearcher {
    fn name(&self) -> &'static str {
        "Brute Force"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::BruteForce]
    }

    fn priority(&self) -> u16 {
        1000
    }

    fn flags(&self) -> SearcherFlags {
        SearcherFlags::NEEDS_SOLUTION | SearcherFlags::SKIP_VERIFICATION
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let solution = match ctx.solution() {
            Some(solution) => solution,
            None => return Ok(()),
        };
        let maps = ctx.maps();
        let cell = maps
            .empty_cells
            .into_iter()
            .min_by_key(|&cell| maps.cell_poss_digits[cell].len());
        let (cell, digit) = match cell.and_then(|cell| solution.digit(cell).map(|digit| (cell, digit))) {
            Some(found) => found,
            None => return Ok(()),
        };
        ctx.add(Step::new(
            Technique::BruteForce,
            vec![Conclusion::assignment(cell, digit)],
            StepDetail::BruteForce { cell, digit },
        ));
        Ok(())
    }
}
