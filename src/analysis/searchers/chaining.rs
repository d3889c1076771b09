//! Alternating inference chains, nice loops and forcing chains
//!
//! All chain techniques are found by one search over a graph of strong and weak links
//! between candidates. Which links the graph holds decides which chains can be found:
//! single digit chains, chains that also pass through cells, and chains over groups
//! of cells in a mini-line. Forcing chains follow the same links from every candidate
//! of a cell or house at once.
mod chain;
mod forcing;
mod links;
mod search;

pub(crate) use self::forcing::ForcingChainSearcher;
pub(crate) use self::links::LinkTypes;

use self::chain::Chain;
use self::links::LinkGraph;
use self::search::ChainSearch;
use super::prelude::*;
use crate::analysis::Difficulty;
use std::collections::BTreeMap;

use self::Technique::*;

const SINGLE_DIGIT_TECHNIQUES: [Technique; 3] = [XChain, DiscontinuousNiceLoop, ContinuousNiceLoop];
const NORMAL_TECHNIQUES: [Technique; 5] = [XChain, XyChain, Aic, DiscontinuousNiceLoop, ContinuousNiceLoop];
const GROUPED_TECHNIQUES: [Technique; 4] = [
    GroupedXChain,
    GroupedAic,
    GroupedDiscontinuousNiceLoop,
    GroupedContinuousNiceLoop,
];

/// Searches chains over one kind of link graph.
///
/// Chains are reported from the easiest to the hardest. Of several chains with the
/// same conclusions only the easiest one is kept.
pub(crate) struct ChainingSearcher {
    link_types: LinkTypes,
    techniques: &'static [Technique],
    name: &'static str,
    priority: u16,
}

impl ChainingSearcher {
    pub(crate) fn new(link_types: LinkTypes) -> Self {
        let (techniques, name, priority): (&'static [Technique], _, _) = if link_types.is_grouped() {
            (&GROUPED_TECHNIQUES, "Grouped Chains", 210)
        } else if link_types == LinkTypes::NORMAL {
            (&NORMAL_TECHNIQUES, "Alternating Inference Chains", 200)
        } else {
            (&SINGLE_DIGIT_TECHNIQUES, "X-Chains", 190)
        };
        ChainingSearcher {
            link_types,
            techniques,
            name,
            priority,
        }
    }
}

impl StepSearcher for ChainingSearcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn techniques(&self) -> &[Technique] {
        self.techniques
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn flags(&self) -> SearcherFlags {
        match self.link_types.is_grouped() {
            true => SearcherFlags::SLOW,
            false => SearcherFlags::NONE,
        }
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        let graph = LinkGraph::build(maps, self.link_types);
        let mut search = ChainSearch::new(&graph, maps, ctx.config().max_chain_length);

        let mut chains = vec![];
        for start in graph.candidate_nodes() {
            if ctx.is_cancelled() {
                return Ok(());
            }
            search.chains_from(start, &mut chains);
        }

        let mut easiest: BTreeMap<Vec<Conclusion>, Chain> = BTreeMap::new();
        for chain in chains {
            if !self.techniques.contains(&chain.technique()) {
                continue;
            }
            let is_easier = easiest
                .get(chain.conclusions())
                .map_or(true, |known| rank(&chain) < rank(known));
            if is_easier {
                easiest.insert(chain.conclusions().to_vec(), chain);
            }
        }

        let mut chains: Vec<Chain> = easiest.into_iter().map(|(_, chain)| chain).collect();
        chains.sort_by_key(rank);
        for chain in chains {
            if ctx.add(chain.into_step()) {
                break;
            }
        }
        Ok(())
    }
}

fn rank(chain: &Chain) -> (Difficulty, usize) {
    (chain.difficulty(), chain.len())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::{AnalyzerConfig, CancellationToken, SearchMode};
    use crate::board::{Candidate, Grid};

    fn restrict(grid: &mut Grid, cell: u8, digits: &[u8]) {
        for digit in (1..=9).filter(|digit| !digits.contains(digit)) {
            grid.eliminate(Candidate::new(cell, digit)).unwrap();
        }
    }

    fn first_step(link_types: LinkTypes, grid: &Grid) -> Option<Step> {
        let maps = GridMaps::new(grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(grid, &maps, &config, SearchMode::FindOne);
        ChainingSearcher::new(link_types).search(&mut ctx).unwrap();
        ctx.into_steps().into_iter().next()
    }

    #[test]
    fn x_chain() {
        let mut grid = Grid::empty();
        // 1 in r1 only in r1c1 and r1c5, in r5 only in r5c1 and r5c6
        for &cell in &[1, 2, 3, 5, 6, 7, 8, 37, 38, 39, 40, 42, 43, 44] {
            grid.eliminate(Candidate::new(cell, 1)).unwrap();
        }
        let step = first_step(LinkTypes::SINGLE_DIGIT, &grid).unwrap();
        assert_eq!(step.technique(), Technique::XChain);
        assert_eq!(step.difficulty(), Difficulty::from_tenths(66));
        let expected: Vec<_> = [14, 23, 31, 49]
            .iter()
            .map(|&cell| Conclusion::elimination(Cell::new(cell), Digit::new(1)))
            .collect();
        assert_eq!(step.conclusions(), &expected[..]);
        match step.detail() {
            StepDetail::Chain { nodes, is_loop } => {
                assert!(!is_loop);
                assert_eq!(nodes.len(), 4);
            }
            detail => panic!("unexpected detail {:?}", detail),
        }
    }

    #[test]
    fn aic_through_bivalue_cells() {
        let mut grid = Grid::empty();
        restrict(&mut grid, 0, &[1, 2]);
        restrict(&mut grid, 44, &[1, 2]);
        // 2 in r9 only in r9c1 and r9c9
        for cell in 73..=79 {
            grid.eliminate(Candidate::new(cell, 2)).unwrap();
        }
        grid.eliminate(Candidate::new(36, 1)).unwrap();

        assert!(first_step(LinkTypes::SINGLE_DIGIT, &grid).is_none());
        let step = first_step(LinkTypes::NORMAL, &grid).unwrap();
        assert_eq!(step.technique(), Technique::Aic);
        // 5 links
        assert_eq!(step.difficulty(), Difficulty::from_tenths(71));
        assert_eq!(
            step.conclusions(),
            &[Conclusion::elimination(Cell::new(8), Digit::new(1))][..]
        );
    }

    #[test]
    fn cancelled_search_reports_nothing() {
        let mut grid = Grid::empty();
        for &cell in &[1, 2, 3, 5, 6, 7, 8, 37, 38, 39, 40, 42, 43, 44] {
            grid.eliminate(Candidate::new(cell, 1)).unwrap();
        }
        let maps = GridMaps::new(&grid);
        let config = AnalyzerConfig::default();
        let token = CancellationToken::new();
        token.cancel();
        let mut ctx = AnalysisContext::new(&grid, &maps, &config, SearchMode::CollectAll).with_cancellation(&token);
        ChainingSearcher::new(LinkTypes::SINGLE_DIGIT).search(&mut ctx).unwrap();
        assert!(ctx.steps().is_empty());
    }

    #[test]
    fn grouped_searcher_is_slow() {
        assert!(ChainingSearcher::new(LinkTypes::GROUPED)
            .flags()
            .contains(SearcherFlags::SLOW));
        assert_eq!(ChainingSearcher::new(LinkTypes::NORMAL).flags(), SearcherFlags::NONE);
    }
}
