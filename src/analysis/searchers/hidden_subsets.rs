use super::prelude::*;

/// Hidden pairs, triples and quads.
pub(crate) struct HiddenSubsetSearcher {
    size: u8,
    technique: [Technique; 1],
}

impl HiddenSubsetSearcher {
    pub(crate) fn new(size: u8) -> Self {
        let technique = match size {
            2 => Technique::HiddenPair,
            3 => Technique::HiddenTriple,
            4 => Technique::HiddenQuad,
            _ => panic!("hidden subsets have 2 to 4 digits, got {}", size),
        };
        HiddenSubsetSearcher {
            size,
            technique: [technique],
        }
    }

    // returns true when the search should stop
    fn walk_combinations(
        &self,
        ctx: &mut AnalysisContext,
        house: House,
        digits: SetIter<Digit>,
        digit_set: Set<Digit>,
        total_poss_pos: Set<Position<House>>,
    ) -> bool {
        if digit_set.len() > self.size || total_poss_pos.len() > self.size {
            return false;
        }
        if digit_set.len() == self.size {
            if total_poss_pos.len() != self.size {
                return false;
            }
            let maps = ctx.maps();
            let cells: Set<Cell> = total_poss_pos.into_iter().map(|pos| house.cell_at(pos)).collect();
            let mut conclusions = vec![];
            for cell in cells {
                let others = maps.cell_poss_digits[cell].without(digit_set);
                conclusions.extend(others.into_iter().map(|digit| Conclusion::elimination(cell, digit)));
            }
            let detail = StepDetail::Subset {
                house,
                cells,
                digits: digit_set,
            };
            return ctx.add(Step::new(self.technique[0], conclusions, detail));
        }

        let mut digits = digits;
        while let Some(digit) = digits.next() {
            let digit_poss_pos = ctx.maps().house_poss_positions[house][digit];
            // solved digit
            if digit_poss_pos.is_empty() {
                continue;
            }
            if self.walk_combinations(ctx, house, digits, digit_set | digit, total_poss_pos | digit_poss_pos) {
                return true;
            }
        }
        false
    }
}

impl StepSearcher for HiddenSubsetSearcher {
    fn name(&self) -> &'static str {
        self.technique[0].name()
    }

    fn techniques(&self) -> &[Technique] {
        &self.technique
    }

    fn priority(&self) -> u16 {
        match self.size {
            2 => 60,
            3 => 90,
            _ => 150,
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
