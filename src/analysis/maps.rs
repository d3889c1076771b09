use crate::bitset::Set;
use crate::board::{Cell, CellState, Digit, Grid, House, Position};
use crate::helper::{CellArray, DigitArray, HouseArray};

/// Candidate maps derived from a grid, shared by all searchers of one pass.
#[derive(Clone, Debug)]
pub struct GridMaps {
    // empty set for filled cells
    pub(crate) cell_poss_digits: CellArray<Set<Digit>>,
    pub(crate) house_solved_digits: HouseArray<Set<Digit>>,
    pub(crate) house_poss_positions: HouseArray<DigitArray<Set<Position<House>>>>,
    pub(crate) digit_cells: DigitArray<Set<Cell>>,
    pub(crate) empty_cells: Set<Cell>,
    pub(crate) bivalue_cells: Set<Cell>,
}

impl GridMaps {
    /// Computes all maps for `grid`.
    pub fn new(grid: &Grid) -> Self {
        let mut maps = GridMaps {
            cell_poss_digits: CellArray([Set::NONE; 81]),
            house_solved_digits: HouseArray([Set::NONE; 27]),
            house_poss_positions: HouseArray([DigitArray([Set::NONE; 9]); 27]),
            digit_cells: DigitArray([Set::NONE; 9]),
            empty_cells: Set::NONE,
            bivalue_cells: Set::NONE,
        };

        for cell in Cell::all() {
            match grid.cell_state(cell) {
                CellState::Given(digit) | CellState::Solved(digit) => {
                    for &house in cell.houses().iter() {
                        maps.house_solved_digits[house] |= digit;
                    }
                }
                CellState::Candidates(cands) => {
                    maps.cell_poss_digits[cell] = cands;
                    maps.empty_cells |= cell;
                    if cands.len() == 2 {
                        maps.bivalue_cells |= cell;
                    }
                    let positions = [cell.row_pos(), cell.col_pos(), cell.block_pos()];
                    for (&house, &pos) in cell.houses().iter().zip(positions.iter()) {
                        for digit in cands {
                            maps.house_poss_positions[house][digit] |= pos;
                            maps.digit_cells[digit] |= cell;
                        }
                    }
                }
            }
        }
        maps
    }

    /// Candidates of `cell`, empty for filled cells.
    pub fn candidates(&self, cell: Cell) -> Set<Digit> {
        self.cell_poss_digits[cell]
    }

    /// Cells that hold `digit` as a candidate.
    pub fn cells_of(&self, digit: Digit) -> Set<Cell> {
        self.digit_cells[digit]
    }

    /// Cells of `house` that hold `digit` as a candidate.
    pub fn house_cells_of(&self, house: House, digit: Digit) -> Set<Cell> {
        self.digit_cells[digit] & house.cells()
    }

    #[allow(missing_docs)]
    pub fn empty_cells(&self) -> Set<Cell> {
        self.empty_cells
    }

    #[allow(missing_docs)]
    pub fn bivalue_cells(&self) -> Set<Cell> {
        self.bivalue_cells
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maps_agree_with_grid() {
        let grid = Grid::from_str_line(
            "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..",
        )
        .unwrap();
        let maps = GridMaps::new(&grid);
        assert_eq!(maps.empty_cells(), grid.empty_cells());
        for cell in Cell::all() {
            assert_eq!(maps.candidates(cell), grid.candidates(cell));
        }
        for house in House::all() {
            for digit in Digit::all() {
                let positions = maps.house_poss_positions[house][digit];
                let cells = maps.house_cells_of(house, digit);
                assert_eq!(positions.len(), cells.len());
                for pos in positions {
                    assert!(cells.contains(house.cell_at(pos)));
                }
            }
        }
    }
}
