use crate::analysis::searchers::prelude::*;
use crate::analysis::{ChainNode, Difficulty};

/// How a chain ends
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ChainKind {
    /// Two different end nodes, one of which is true
    Open,
    /// Ends at the start node with the opposite value
    Discontinuous,
    /// Ends at the start node with the same value, every link is exactly one
    Continuous,
}

// a chain with more links than a threshold gets 0.1 on top of its base difficulty
const LENGTH_THRESHOLDS: [usize; 10] = [4, 6, 8, 12, 16, 24, 32, 48, 64, 96];

/// A chain found by the search, with its conclusions.
#[derive(Clone, Debug)]
pub(crate) struct Chain {
    kind: ChainKind,
    // loops repeat the start node at the end
    nodes: Vec<ChainNode>,
    conclusions: Vec<Conclusion>,
    technique: Technique,
    difficulty: Difficulty,
}

impl Chain {
    pub(crate) fn new(kind: ChainKind, nodes: Vec<ChainNode>, mut conclusions: Vec<Conclusion>) -> Self {
        conclusions.sort();
        conclusions.dedup();
        let technique = classify(kind, &nodes);
        let difficulty = technique.base_difficulty() + length_bonus(nodes.len().saturating_sub(1));
        Chain {
            kind,
            nodes,
            conclusions,
            technique,
            difficulty,
        }
    }

    pub(crate) fn technique(&self) -> Technique {
        self.technique
    }

    pub(crate) fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Number of links
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn conclusions(&self) -> &[Conclusion] {
        &self.conclusions
    }

    pub(crate) fn into_step(self) -> Step {
        let detail = StepDetail::Chain {
            nodes: self.nodes,
            is_loop: self.kind != ChainKind::Open,
        };
        Step::new(self.technique, self.conclusions, detail).with_difficulty(self.difficulty)
    }
}

/// Rating added to the base difficulty of a chain with `n_links` links.
pub(crate) fn length_bonus(n_links: usize) -> Difficulty {
    let bonus = LENGTH_THRESHOLDS.iter().filter(|&&threshold| n_links > threshold).count();
    Difficulty::from_tenths(bonus as u32)
}

fn classify(kind: ChainKind, nodes: &[ChainNode]) -> Technique {
    use self::Technique::*;
    let grouped = nodes.iter().any(|node| node.cells.len() > 1);
    let single_digit = nodes.iter().all(|node| node.digit == nodes[0].digit);

    match (kind, grouped) {
        (ChainKind::Open, true) if single_digit => GroupedXChain,
        (ChainKind::Open, true) => GroupedAic,
        (ChainKind::Open, false) if single_digit => XChain,
        (ChainKind::Open, false) if is_xy_chain(nodes) => XyChain,
        (ChainKind::Open, false) => Aic,
        (ChainKind::Discontinuous, false) => DiscontinuousNiceLoop,
        (ChainKind::Discontinuous, true) => GroupedDiscontinuousNiceLoop,
        (ChainKind::Continuous, false) => ContinuousNiceLoop,
        (ChainKind::Continuous, true) => GroupedContinuousNiceLoop,
    }
}

// strong links inside bivalue cells, weak links between cells
fn is_xy_chain(nodes: &[ChainNode]) -> bool {
    nodes.windows(2).all(|pair| {
        let (from, to) = (pair[0], pair[1]);
        match from.on {
            false => from.cells == to.cells && from.digit != to.digit,
            true => from.digit == to.digit,
        }
    })
}
