#![warn(missing_docs)]
#![cfg_attr(feature = "cargo-clippy", allow(inline_always, match_bool, needless_pass_by_value, wrong_self_convention))]
//! Human style sudoku solving and grading
//!
//! ## Overview
//!
//! `sudoku_logic` solves sudokus the way people do: step by step, with techniques
//! from singles up to alternating inference chains. Every step names its technique,
//! what it concludes and how hard it is. The hardest step of a solution rates the puzzle.
//!
//! A fast backtracking solver is included to check that puzzles have exactly one
//! solution and to verify every logical step against it.
//!
//! ## Example
//!
//! ```
//! use sudoku_logic::Grid;
//! use sudoku_logic::analysis::{Analyzer, AnalyzerConfig, Outcome};
//!
//! let line = "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...";
//! let grid = Grid::from_str_line(line).unwrap();
//!
//! // next step only
//! let analyzer = Analyzer::default();
//! if let Some(step) = analyzer.hint(&grid) {
//!     println!("{}", step);
//! }
//!
//! // full analysis, without the slow searchers
//! let analyzer = Analyzer::new(AnalyzerConfig::default().with_ignore_slow(true));
//! let result = analyzer.analyze(&grid);
//! if result.outcome() == Outcome::Solved {
//!     println!("rated {}", result.max_difficulty());
//!     println!("{}", result.grid().to_str_line());
//! }
//! ```
mod consts;
mod helper;

pub mod analysis;
pub mod bitset;
pub mod board;
pub mod brute_force;
pub mod errors;
pub mod generator;

pub use crate::board::{Candidate, Cell, Digit, Grid};
pub use crate::brute_force::{BacktrackingSolver, BruteForceSolver, Uniqueness};
