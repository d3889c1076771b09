use super::{Conclusion, Difficulty, Technique};
use crate::bitset::Set;
use crate::board::{Cell, Digit, House, Line, MiniLine};
use std::fmt;

/// One node of a chain as shown to the user: a digit in one or more cells
/// that is assumed to be true (`on`) or false.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct ChainNode {
    pub digit: Digit,
    pub cells: Set<Cell>,
    pub on: bool,
}

/// Technique specific data of a step, for presenting it.
///
/// The analysis itself only needs the conclusions of a step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum StepDetail {
    /// Full house, hidden and naked single. `house` is unset for naked singles.
    Single {
        cell: Cell,
        digit: Digit,
        house: Option<House>,
    },
    LockedCandidates {
        miniline: MiniLine,
        digit: Digit,
        is_pointing: bool,
    },
    /// Naked and hidden subsets
    Subset {
        house: House,
        cells: Set<Cell>,
        digits: Set<Digit>,
    },
    /// Basic fish have no fins
    Fish {
        digit: Digit,
        base: Set<Line>,
        cover: Set<Line>,
        fins: Set<Cell>,
    },
    /// XY- and XYZ-Wing, `digit` is the eliminated digit
    Wing {
        hinge: Cell,
        pincers: Set<Cell>,
        digit: Digit,
    },
    UniqueRectangle {
        cells: Set<Cell>,
        digits: Set<Digit>,
    },
    Bug {
        cell: Cell,
        digit: Digit,
    },
    Als {
        first: Set<Cell>,
        second: Set<Cell>,
        restricted_common: Set<Digit>,
    },
    /// Nodes in chain order, loops repeat their first node at the end
    Chain {
        nodes: Vec<ChainNode>,
        is_loop: bool,
    },
    /// One branch per candidate of a cell, or per position of a digit in `house`.
    /// Every branch starts with its candidate assumed true and ends in the conclusion.
    ForcingChains {
        house: Option<House>,
        branches: Vec<Vec<ChainNode>>,
    },
    BruteForce {
        cell: Cell,
        digit: Digit,
    },
}

/// A solving step: the technique used, its difficulty and what it proves.
///
/// Conclusions are kept sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    technique: Technique,
    difficulty: Difficulty,
    conclusions: Vec<Conclusion>,
    detail: StepDetail,
}

impl Step {
    /// Creates a step rated with the base difficulty of `technique`.
    pub fn new(technique: Technique, conclusions: Vec<Conclusion>, detail: StepDetail) -> Self {
        let mut conclusions = conclusions;
        conclusions.sort();
        conclusions.dedup();
        Step {
            technique,
            difficulty: technique.base_difficulty(),
            conclusions,
            detail,
        }
    }

    /// Overrides the difficulty, e.g. for length dependent ratings.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[allow(missing_docs)]
    pub fn technique(&self) -> Technique {
        self.technique
    }

    #[allow(missing_docs)]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[allow(missing_docs)]
    pub fn conclusions(&self) -> &[Conclusion] {
        &self.conclusions
    }

    #[allow(missing_docs)]
    pub fn detail(&self) -> &StepDetail {
        &self.detail
    }

    pub(crate) fn retain_conclusions(&mut self, f: impl FnMut(&Conclusion) -> bool) {
        self.conclusions.retain(f);
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}):", self.technique, self.difficulty)?;
        for (i, conclusion) in self.conclusions.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, conclusion)?;
        }
        Ok(())
    }
}
