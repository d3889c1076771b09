//! Types for cells, digits and other things on a sudoku board
mod candidate;
mod cell_state;
mod digit;
mod grid;
mod candidate_grid;
pub mod positions;

pub(crate) use self::positions::*;

#[rustfmt::skip]
pub use self::{
    grid::Grid,
    digit::Digit,
    positions::{Cell, House, Line, Row, Col, Block, MiniLine, Position},
    candidate::Candidate,
    cell_state::CellState,
};
