//! Positions on the board and the tables relating them.
//!
//! Houses are numbered rows first (`0..9`), then columns (`9..18`), then blocks (`18..27`).
//! A [`Line`] is therefore a house that isn't a block and both share their numbering.
//!
//! Every house lists its 9 cells in a fixed order. A [`Position`] is an index into that
//! list, so the position of a cell differs between its row, column and block.
//! All tables are built at compile time.
#![allow(missing_docs)]

use crate::bitset::Set;
use crate::consts::{BLOCK_OFFSET, COL_OFFSET, N_CELLS};
use std::fmt;
use std::marker::PhantomData;

macro_rules! index_type {
    ($( $(#[$attr:meta])* $name:ident : $count:expr; )*) => {$(
        $(#[$attr])*
        #[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub(crate) u8);

        impl $name {
            pub const COUNT: u8 = $count;

            #[inline]
            pub fn new(index: u8) -> Self {
                debug_assert!(index < Self::COUNT, "{} {} out of range", stringify!($name), index);
                $name(index)
            }

            #[inline]
            pub fn get(self) -> u8 {
                self.0
            }

            #[inline]
            pub fn as_index(self) -> usize {
                usize::from(self.0)
            }

            pub fn all() -> impl Iterator<Item = Self> {
                (0..Self::COUNT).map($name)
            }
        }
    )*};
}

index_type! {
    /// One of the 81 cells, numbered row by row.
    Cell: 81;
    Row: 9;
    Col: 9;
    /// Blocks are numbered left to right, top to bottom.
    Block: 9;
    /// A row or a column
    Line: 18;
    /// A row, column or block
    House: 27;
    /// The 3 cells shared by a line and a block. The 27 minirows come before the 27 minicols.
    MiniLine: 54;
    /// The 3 blocks of a band (`0..3`) or a stack (`3..6`)
    Chute: 6;
}

/// Index of a cell inside a house of kind `IN`.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Hash)]
pub struct Position<IN>(pub(crate) u8, PhantomData<IN>);

impl<IN> Position<IN> {
    pub fn new(pos: u8) -> Self {
        debug_assert!(pos < 9);
        Position(pos, PhantomData)
    }

    pub fn as_index(self) -> usize {
        usize::from(self.0)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////
//                                  Tables
///////////////////////////////////////////////////////////////////////////////////////////////

const fn house_cell(house: usize, pos: usize) -> usize {
    if house < 9 {
        house * 9 + pos
    } else if house < 18 {
        pos * 9 + house - 9
    } else {
        let block = house - 18;
        (block / 3 * 3 + pos / 3) * 9 + block % 3 * 3 + pos % 3
    }
}

const fn houses_of(cell: usize) -> [usize; 3] {
    [cell / 9, 9 + cell % 9, 18 + cell / 27 * 3 + cell % 9 / 3]
}

const fn compute_house_cells() -> [[u8; 9]; 27] {
    let mut table = [[0; 9]; 27];
    let mut house = 0;
    while house < 27 {
        let mut pos = 0;
        while pos < 9 {
            table[house][pos] = house_cell(house, pos) as u8;
            pos += 1;
        }
        house += 1;
    }
    table
}

const fn compute_house_masks() -> [u128; 27] {
    let mut masks = [0; 27];
    let mut house = 0;
    while house < 27 {
        let mut pos = 0;
        while pos < 9 {
            masks[house] |= 1 << house_cell(house, pos);
            pos += 1;
        }
        house += 1;
    }
    masks
}

const fn compute_peers() -> [u128; N_CELLS] {
    let masks = compute_house_masks();
    let mut peers = [0; N_CELLS];
    let mut cell = 0;
    while cell < N_CELLS {
        let houses = houses_of(cell);
        peers[cell] = (masks[houses[0]] | masks[houses[1]] | masks[houses[2]]) & !(1u128 << cell);
        cell += 1;
    }
    peers
}

const fn compute_miniline_masks() -> [u128; 54] {
    let mut masks = [0; 54];
    let mut ml = 0;
    while ml < 54 {
        masks[ml] = if ml < 27 {
            // row * 3 + stack
            0o7 << (ml / 3 * 9 + ml % 3 * 3)
        } else {
            // col * 3 + band
            let mc = ml - 27;
            0o001_001_001 << (mc % 3 * 27 + mc / 3)
        };
        ml += 1;
    }
    masks
}

static HOUSE_CELLS: [[u8; 9]; 27] = compute_house_cells();
static HOUSE_MASKS: [u128; 27] = compute_house_masks();
static PEERS: [u128; N_CELLS] = compute_peers();
static MINILINE_MASKS: [u128; 54] = compute_miniline_masks();

///////////////////////////////////////////////////////////////////////////////////////////////

impl Cell {
    #[inline]
    pub fn row(self) -> Row {
        Row(self.0 / 9)
    }

    #[inline]
    pub fn col(self) -> Col {
        Col(self.0 % 9)
    }

    #[inline]
    pub fn block(self) -> Block {
        Block(self.0 / 27 * 3 + self.0 % 9 / 3)
    }

    /// Row, column and block of this cell, in that order.
    pub fn houses(self) -> [House; 3] {
        let [row, col, block] = houses_of(self.as_index());
        [House(row as u8), House(col as u8), House(block as u8)]
    }

    pub fn row_pos(self) -> Position<House> {
        Position::new(self.0 % 9)
    }

    pub fn col_pos(self) -> Position<House> {
        Position::new(self.0 / 9)
    }

    pub fn block_pos(self) -> Position<House> {
        Position::new(self.0 / 9 % 3 * 3 + self.0 % 3)
    }

    /// All 20 cells sharing a house with this cell.
    #[inline]
    pub fn peers(self) -> Set<Cell> {
        Set(PEERS[self.as_index()])
    }

    /// Checks whether both cells share a house. A cell does not see itself.
    #[inline]
    pub fn sees(self, other: Cell) -> bool {
        self.peers().contains(other)
    }
}

impl House {
    pub fn cells(self) -> Set<Cell> {
        Set(HOUSE_MASKS[self.as_index()])
    }

    pub fn cell_at(self, pos: Position<House>) -> Cell {
        Cell(HOUSE_CELLS[self.as_index()][pos.as_index()])
    }

    pub fn is_block(self) -> bool {
        self.0 >= BLOCK_OFFSET
    }

    /// Returns the line this house is, if it isn't a block.
    pub fn as_line(self) -> Option<Line> {
        match self.is_block() {
            true => None,
            false => Some(Line(self.0)),
        }
    }
}

impl Line {
    pub const ALL_ROWS: Set<Line> = Set(0o000_777);
    pub const ALL_COLS: Set<Line> = Set(0o777_000);

    pub fn is_row(self) -> bool {
        self.0 < COL_OFFSET
    }

    pub fn cells(self) -> Set<Cell> {
        self.house().cells()
    }
}

impl Row {
    pub fn cells(self) -> Set<Cell> {
        self.house().cells()
    }
}

impl Col {
    pub fn cells(self) -> Set<Cell> {
        self.house().cells()
    }
}

impl Block {
    pub fn cells(self) -> Set<Cell> {
        self.house().cells()
    }
}

impl Set<Cell> {
    /// Cells that see every cell of this set. The cells of the set are never part of it.
    pub fn common_peers(self) -> Set<Cell> {
        self.into_iter().fold(Set::ALL, |peers, cell| peers & cell.peers()).without(self)
    }

    /// Houses that contain every cell of this set.
    pub fn common_houses(self) -> Set<House> {
        self.into_iter().fold(Set::ALL, |common, cell| {
            let [row, col, block] = cell.houses();
            common & (row.as_set() | col | block)
        })
    }
}

impl MiniLine {
    pub fn is_minirow(self) -> bool {
        self.0 < 27
    }

    pub fn cells(self) -> Set<Cell> {
        Set(MINILINE_MASKS[self.as_index()])
    }

    pub fn line(self) -> Line {
        match self.is_minirow() {
            true => Line(self.0 / 3),
            false => Line(COL_OFFSET + (self.0 - 27) / 3),
        }
    }

    pub fn block(self) -> Block {
        match self.is_minirow() {
            true => Block(self.0 / 9 * 3 + self.0 % 3),
            false => {
                let mc = self.0 - 27;
                Block(mc % 3 * 3 + mc / 9)
            }
        }
    }

    /// Returns the other minilines of the same line and those of the same block.
    pub fn neighbors(self) -> ([MiniLine; 2], [MiniLine; 2]) {
        // inside a chute, minilines are laid out as line_in_chute * 3 + block_in_chute
        let chute_start = self.0 - self.0 % 9;
        let (line, block) = (self.0 % 9 / 3, self.0 % 3);
        let at = |line: u8, block: u8| MiniLine(chute_start + line % 3 * 3 + block % 3);
        (
            [at(line, block + 1), at(line, block + 2)],
            [at(line + 1, block), at(line + 2, block)],
        )
    }
}

impl Chute {
    /// The 9 minilines of this chute, ordered by line first, then by block.
    pub fn minilines(self) -> [MiniLine; 9] {
        let mut minilines = [MiniLine(0); 9];
        for (i, ml) in minilines.iter_mut().enumerate() {
            *ml = MiniLine(self.0 * 9 + i as u8);
        }
        minilines
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////
//                                  Conversions
///////////////////////////////////////////////////////////////////////////////////////////////

macro_rules! widen {
    ($( $from:ty => $to:ident + $offset:expr ),* $(,)*) => {$(
        impl From<$from> for $to {
            #[inline]
            fn from(from: $from) -> $to {
                $to(from.0 + $offset)
            }
        }
    )*};
}

widen! {
    Row => Line + 0,
    Col => Line + COL_OFFSET,
    Row => House + 0,
    Col => House + COL_OFFSET,
    Block => House + BLOCK_OFFSET,
    Line => House + 0,
}

impl Set<Position<House>> {
    pub fn as_line_set(self) -> Set<Position<Line>> {
        Set(self.0)
    }
}

pub(crate) trait IntoHouse: Into<House> {
    #[inline(always)]
    fn house(self) -> House {
        self.into()
    }
}

impl<T: Into<House>> IntoHouse for T {}

///////////////////////////////////////////////////////////////////////////////////////////////
//                                  Display
///////////////////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for Cell {
    // r1c1 .. r9c9
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}c{}", self.0 / 9 + 1, self.0 % 9 + 1)
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.0 / 9 {
            0 => 'r',
            1 => 'c',
            _ => 'b',
        };
        write!(f, "{}{}", kind, self.0 % 9 + 1)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.house(), f)
    }
}

impl fmt::Display for MiniLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.line(), self.block().house())
    }
}

fn comma_separated<T: fmt::Display>(f: &mut fmt::Formatter, items: impl Iterator<Item = T>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Set<Cell> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        comma_separated(f, self.into_iter())
    }
}

impl fmt::Display for Set<Line> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        comma_separated(f, self.into_iter())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn house_numbering() {
        assert_eq!(House::new(0).cell_at(Position::new(8)), Cell::new(8));
        assert_eq!(House::new(9).cell_at(Position::new(8)), Cell::new(72));
        // block 5 starts at r4c7
        assert_eq!(House::new(23).cell_at(Position::new(0)), Cell::new(33));
        assert_eq!(House::new(23).to_string(), "b6");
        assert_eq!(Cell::new(33).to_string(), "r4c7");
    }

    #[test]
    fn houses_hold_their_cells() {
        for cell in Cell::all() {
            let [row, col, block] = cell.houses();
            assert_eq!(row, cell.row().house());
            assert_eq!(col, cell.col().house());
            assert_eq!(block, cell.block().house());
            for (house, pos) in cell.houses().iter().zip(&[cell.row_pos(), cell.col_pos(), cell.block_pos()]) {
                assert!(house.cells().contains(cell));
                assert_eq!(house.cell_at(*pos), cell);
            }
        }
        for house in House::all() {
            assert_eq!(house.cells().len(), 9);
        }
    }

    #[test]
    fn peers_are_houses_without_cell() {
        for cell in Cell::all() {
            let mut expected = Set::NONE;
            for &house in cell.houses().iter() {
                expected |= house.cells();
            }
            expected.remove(cell.as_set());
            assert_eq!(cell.peers(), expected);
            assert_eq!(cell.peers().len(), 20);
        }
    }

    #[test]
    fn miniline_lies_in_line_and_block() {
        for ml in MiniLine::all() {
            let cells = ml.cells();
            assert_eq!(cells.len(), 3);
            assert_eq!(cells & ml.line().cells(), cells);
            assert_eq!(cells & ml.block().cells(), cells);
        }
        for chute in Chute::all() {
            let cells = chute
                .minilines()
                .iter()
                .fold(Set::NONE, |cells, ml| cells | ml.cells());
            assert_eq!(cells.len(), 27);
        }
    }

    #[test]
    fn miniline_neighbors() {
        let ml = MiniLine::new(0);
        let (line_neighbors, block_neighbors) = ml.neighbors();
        assert_eq!(line_neighbors, [MiniLine::new(1), MiniLine::new(2)]);
        assert_eq!(block_neighbors, [MiniLine::new(3), MiniLine::new(6)]);
        for ml in MiniLine::all() {
            let (line_neighbors, block_neighbors) = ml.neighbors();
            assert!(line_neighbors.iter().all(|n| n.line() == ml.line() && n.block() != ml.block()));
            assert!(block_neighbors.iter().all(|n| n.block() == ml.block() && n.line() != ml.line()));
        }
    }

    #[test]
    fn common_peers() {
        let cells = Cell::new(0).as_set() | Cell::new(8);
        // rest of row 1
        assert_eq!(cells.common_peers(), Row::new(0).cells().without(cells));
        assert_eq!(cells.common_houses(), Row::new(0).house().as_set());
    }
}
