use super::prelude::*;

/// Full houses and hidden singles. Blocks are searched before lines.
pub(crate) struct SinglesSearcher;

/// Cells with a single candidate left.
pub(crate) struct NakedSingleSearcher;

impl StepSearcher for SinglesSearcher {
    fn name(&self) -> &'static str {
        "Singles"
    }

    fn techniques(&self) -> &[Technique] {
        &[
            Technique::FullHouse,
            Technique::HiddenSingleBlock,
            Technique::HiddenSingleLine,
        ]
    }

    fn priority(&self) -> u16 {
        10
    }

    fn flags(&self) -> SearcherFlags {
        SearcherFlags::DIRECT_ONLY
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();

        for house in House::all() {
            let empty = maps.empty_cells & house.cells();
            if let Ok(Some(cell)) = empty.unique() {
                let digit = match maps.cell_poss_digits[cell].unique_or_contradiction(cell)? {
                    Some(digit) => digit,
                    // a contradiction in the house, left for the hidden single search
                    None => continue,
                };
                if ctx.add(single_step(Technique::FullHouse, cell, digit, Some(house))) {
                    return Ok(());
                }
            }
        }

        // blocks first
        let houses = House::all().filter(|h| h.is_block()).chain(House::all().filter(|h| !h.is_block()));
        for house in houses {
            let technique = match house.is_block() {
                true => Technique::HiddenSingleBlock,
                false => Technique::HiddenSingleLine,
            };
            for digit in !maps.house_solved_digits[house] {
                let positions = maps.house_poss_positions[house][digit];
                match positions.unique() {
                    Err(_) => return Err(Contradiction::MissingPlacement { house, digit }),
                    Ok(Some(pos)) => {
                        let cell = house.cell_at(pos);
                        if ctx.add(single_step(technique, cell, digit, Some(house))) {
                            return Ok(());
                        }
                    }
                    Ok(None) => {}
                }
            }
        }
        Ok(())
    }
}

impl StepSearcher for NakedSingleSearcher {
    fn name(&self) -> &'static str {
        "Naked Single"
    }

    fn techniques(&self) -> &[Technique] {
        &[Technique::NakedSingle]
    }

    fn priority(&self) -> u16 {
        20
    }

    fn flags(&self) -> SearcherFlags {
        SearcherFlags::DIRECT_ONLY
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        for cell in maps.empty_cells {
            if let Some(digit) = maps.cell_poss_digits[cell].unique_or_contradiction(cell)? {
                if ctx.add(single_step(Technique::NakedSingle, cell, digit, None)) {
                    break;
                }
            }
        }
        Ok(())
    }
}

fn single_step(technique: Technique, cell: Cell, digit: Digit, house: Option<House>) -> Step {
    Step::new(
        technique,
        vec![Conclusion::assignment(cell, digit)],
        StepDetail::Single { cell, digit, house },
    )
}
