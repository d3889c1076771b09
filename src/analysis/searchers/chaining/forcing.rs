use super::chain::length_bonus;
use super::links::{LinkGraph, LinkTypes};
use super::search::Implications;
use crate::analysis::searchers::prelude::*;
use crate::analysis::{ChainNode, Difficulty};
use std::collections::BTreeMap;

const TECHNIQUES: [Technique; 2] = [Technique::CellForcingChain, Technique::RegionForcingChain];

/// Cell and region forcing chains.
///
/// One candidate of every cell is true, as is one position of every digit in a house.
/// Whatever follows from each of them alike is proven. Sources with two candidates
/// are left to the ordinary chains.
pub(crate) struct ForcingChainSearcher;

struct Forcing {
    technique: Technique,
    house: Option<House>,
    conclusion: Conclusion,
    branches: Vec<Vec<ChainNode>>,
    n_links: usize,
    difficulty: Difficulty,
}

impl Forcing {
    fn rank(&self) -> (Difficulty, usize) {
        (self.difficulty, self.n_links)
    }

    fn into_step(self) -> Step {
        let detail = StepDetail::ForcingChains {
            house: self.house,
            branches: self.branches,
        };
        Step::new(self.technique, vec![self.conclusion], detail).with_difficulty(self.difficulty)
    }
}

// the implications of each candidate node assumed true, computed on first use
struct Cache<'a> {
    graph: &'a LinkGraph,
    max_nodes: usize,
    implications: Vec<Option<Implications>>,
}

impl<'a> Cache<'a> {
    fn new(graph: &'a LinkGraph, max_nodes: usize) -> Self {
        Cache {
            graph,
            max_nodes,
            implications: (0..graph.len()).map(|_| None).collect(),
        }
    }

    fn branches(&mut self, sources: &[usize]) -> Vec<&Implications> {
        let (graph, max_nodes) = (self.graph, self.max_nodes);
        for &source in sources {
            self.implications[source].get_or_insert_with(|| Implications::of(graph, source, true, max_nodes));
        }
        let implications = &self.implications;
        sources
            .iter()
            .filter_map(|&source| implications[source].as_ref())
            .collect()
    }
}

fn collect(
    cache: &mut Cache,
    technique: Technique,
    house: Option<House>,
    sources: &[usize],
    found: &mut BTreeMap<Conclusion, Forcing>,
) {
    let graph = cache.graph;
    let branches = cache.branches(sources);
    if branches.len() != sources.len() {
        return;
    }

    for id in (0..graph.len()).filter(|id| !sources.contains(id)) {
        let node = graph.node(id);
        if node.is_grouped() {
            continue;
        }
        let cell = match node.cells.first() {
            Some(cell) => cell,
            None => continue,
        };
        for &on in &[true, false] {
            if !branches.iter().all(|branch| branch.implies(id, on)) {
                continue;
            }
            let conclusion = match on {
                true => Conclusion::assignment(cell, node.digit),
                false => Conclusion::elimination(cell, node.digit),
            };
            let paths: Vec<Vec<ChainNode>> = branches.iter().map(|branch| branch.path(graph, id, on)).collect();
            let n_links = paths.iter().map(|path| path.len() - 1).sum();
            let forcing = Forcing {
                technique,
                house,
                conclusion,
                branches: paths,
                n_links,
                difficulty: technique.base_difficulty() + length_bonus(n_links),
            };
            let is_easier = found
                .get(&conclusion)
                .map_or(true, |known| forcing.rank() < known.rank());
            if is_easier {
                found.insert(conclusion, forcing);
            }
        }
    }
}

impl StepSearcher for ForcingChainSearcher {
    fn name(&self) -> &'static str {
        "Forcing Chains"
    }

    fn techniques(&self) -> &[Technique] {
        &TECHNIQUES
    }

    fn priority(&self) -> u16 {
        220
    }

    fn flags(&self) -> SearcherFlags {
        SearcherFlags::SLOW
    }

    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction> {
        let maps = ctx.maps();
        let graph = LinkGraph::build(maps, LinkTypes::GROUPED);
        let mut cache = Cache::new(&graph, ctx.config().max_chain_length);
        let mut found = BTreeMap::new();

        if ctx.is_enabled(Technique::CellForcingChain) {
            for cell in maps.empty_cells {
                let digits = maps.cell_poss_digits[cell];
                if digits.len() < 3 {
                    continue;
                }
                if ctx.is_cancelled() {
                    return Ok(());
                }
                let sources: Vec<usize> = digits
                    .into_iter()
                    .filter_map(|digit| graph.candidate_node(cell, digit))
                    .collect();
                collect(&mut cache, Technique::CellForcingChain, None, &sources, &mut found);
            }
        }

        if ctx.is_enabled(Technique::RegionForcingChain) {
            for house in House::all() {
                for digit in Digit::all() {
                    let cells = maps.house_cells_of(house, digit);
                    if cells.len() < 3 {
                        continue;
                    }
                    if ctx.is_cancelled() {
                        return Ok(());
                    }
                    let sources: Vec<usize> = cells
                        .into_iter()
                        .filter_map(|cell| graph.candidate_node(cell, digit))
                        .collect();
                    collect(&mut cache, Technique::RegionForcingChain, Some(house), &sources, &mut found);
                }
            }
        }

        let mut forcings: Vec<Forcing> = found.into_iter().map(|(_, forcing)| forcing).collect();
        forcings.sort_by_key(Forcing::rank);
        for forcing in forcings {
            if ctx.add(forcing.into_step()) {
                break;
            }
        }
        Ok(())
    }
}
