use super::prelude::*;

/// Naked pairs, triples and quads.
pub(crate) struct NakedSubsetSearcher {
    size: u8,
    technique: [Technique; 1],
}

impl NakedSubsetSearcher {
    pub(crate) fn new(size: u8) -> Self {
        let technique = match size {
            2 => Technique::NakedPair,
            3 => Technique::NakedTriple,
            4 => Technique::NakedQuad,
            _ => panic!("naked subsets have 2 to 4 cells, got {}", size),
        };
        NakedSubsetSearcher {
            size,
            technique: [technique],
        }
    }
}

impl StepSearcher for NakedSubsetSearcher {
    fn name(&self) -> &'static str {
        self.technique[0].name()
    }

    fn techniques(&self) -> &[Technique] {
        &self.technique
    }

    fn priority(&self) -> u16 {
        match self.size {
            2 => 40,
            3 => 70,
            _ => 130,
        }
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        for house in House::all() {
            if ctx.maps().house_solved_digits[house].is_full() {
                continue;
            }
            if self.walk_combinations(ctx, house, Set::ALL.into_iter(), Set::NONE, Set::NONE) {
                break;
            }
        }
        Ok(())
    }
}

impl NakedSubsetSearcher {
    // returns true when the search should stop
    fn walk_combinations(
        &self,
        ctx: &mut AnalysisContext,
        house: House,
        positions: SetIter<Position<House>>,
        position_set: Set<Position<House>>,
        total_poss_digs: Set<Digit>,
    ) -> bool {
        // subsets of 5 and more cells always have complementary hidden subsets
        if position_set.len() > self.size || total_poss_digs.len() > self.size {
            return false;
        }
        if position_set.len() == self.size {
            return total_poss_digs.len() == self.size && self.report(ctx, house, position_set, total_poss_digs);
        }

        let mut positions = positions;
        while let Some(position) = positions.next() {
            let cell_poss_digits = ctx.maps().cell_poss_digits[house.cell_at(position)];
            // solved cell
            if cell_poss_digits.is_empty() {
                continue;
            }
            if self.walk_combinations(
                ctx,
                house,
                positions,
                position_set | position,
                total_poss_digs | cell_poss_digits,
            ) {
                return true;
            }
        }
        false
    }

    fn report(&self, ctx: &mut AnalysisContext, house: House, positions: Set<Position<House>>, digits: Set<Digit>) -> bool {
        let maps = ctx.maps();
        let cells: Set<Cell> = positions.into_iter().map(|pos| house.cell_at(pos)).collect();

        // a subset inside a line and a block locks the digits in both
        let mut conclusions = vec![];
        for common_house in cells.common_houses() {
            for digit in digits {
                let targets = maps.house_cells_of(common_house, digit).without(cells);
                conclusions.extend(targets.into_iter().map(|cell| Conclusion::elimination(cell, digit)));
            }
        }
        let detail = StepDetail::Subset { house, cells, digits };
        ctx.add(Step::new(self.technique[0], conclusions, detail))
    }
}
