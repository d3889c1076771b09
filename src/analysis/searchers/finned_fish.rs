use super::basic_fish::cover_lines;
use super::prelude::*;

/// Finned X-Wing, Swordfish and Jellyfish.
///
/// A fish whose base lines have extra candidates (fins) outside the cover lines. If all
/// fins lie in one block, either the fish holds or a fin is true. Cover line cells in
/// that block see both cases and lose the digit.
pub(crate) struct FinnedFishSearcher;

const TECHNIQUES: [Technique; 3] = [
    Technique::FinnedXWing,
    Technique::FinnedSwordfish,
    Technique::FinnedJellyfish,
];

// fins of a single block take up at most 3 positions of a line
const MAX_FIN_POSITIONS: u8 = 3;

impl StepSearcher for FinnedFishSearcher {
    fn name(&self) -> &'static str {
        "Finned Fish"
    }

    fn techniques(&self) -> &[Technique] {
        &TECHNIQUES
    }

    fn priority(&self) -> u16 {
        160
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let max_size = ctx.config().fish_size_limit().min(4);
        for size in 2..=max_size {
            if !ctx.is_enabled(TECHNIQUES[size as usize - 2]) {
                continue;
            }
            for digit in Digit::all() {
                for &lines in &[Line::ALL_ROWS, Line::ALL_COLS] {
                    if ctx.is_cancelled() || walk_base(ctx, size, digit, Set::NONE, lines.into_iter(), Set::NONE) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

// returns true when the search should stop
fn walk_base(
    ctx: &mut AnalysisContext,
    size: u8,
    digit: Digit,
    line_set: Set<Line>,
    lines: SetIter<Line>,
    union_poss_pos: Set<Position<Line>>,
) -> bool {
    if line_set.len() == size {
        return union_poss_pos.len() > size && find_covers(ctx, size, digit, line_set, union_poss_pos);
    }

    let mut lines = lines;
    while let Some(line) = lines.next() {
        let possible_pos = ctx.maps().house_poss_positions[line][digit];
        let new_union_poss_pos = union_poss_pos | possible_pos.as_line_set();
        if possible_pos.is_empty() || new_union_poss_pos.len() > size + MAX_FIN_POSITIONS {
            continue;
        }
        if walk_base(ctx, size, digit, line_set | line, lines, new_union_poss_pos) {
            return true;
        }
    }
    false
}

fn find_covers(ctx: &mut AnalysisContext, size: u8, digit: Digit, base: Set<Line>, union_poss_pos: Set<Position<Line>>) -> bool {
    let maps = ctx.maps();
    let positions: Vec<_> = union_poss_pos.into_iter().collect();
    let base_cells = base.into_iter().fold(Set::NONE, |cells, line| cells | line.cells());
    let fish_cells = base_cells & maps.digit_cells[digit];

    for mask in 0u32..1 << positions.len() {
        if mask.count_ones() != size as u32 {
            continue;
        }
        let cover_positions: Set<Position<Line>> = positions
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & 1 << i != 0)
            .map(|(_, &pos)| pos)
            .collect();
        let cover = cover_lines(base, cover_positions);
        let cover_cells = cover.into_iter().fold(Set::NONE, |cells, line| cells | line.cells());

        // every base line needs a candidate in the cover
        if base.into_iter().any(|line| !(line.cells() & fish_cells).overlaps(cover_cells)) {
            continue;
        }
        let fins = fish_cells.without(cover_cells);
        let fin_block = match fins.first() {
            Some(fin) => fin.block(),
            None => continue,
        };
        if !fin_block.cells().contains(fins) {
            continue;
        }

        let targets = (cover_cells & fin_block.cells() & maps.digit_cells[digit]).without(base_cells);
        if targets.is_empty() {
            continue;
        }
        let conclusions = targets.into_iter().map(|cell| Conclusion::elimination(cell, digit)).collect();
        let detail = StepDetail::Fish {
            digit,
            base,
            cover,
            fins,
        };
        if ctx.add(Step::new(TECHNIQUES[size as usize - 2], conclusions, detail)) {
            return true;
        }
    }
    false
}
