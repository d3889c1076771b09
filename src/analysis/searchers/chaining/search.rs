use super::chain::{Chain, ChainKind};
use super::links::{LinkGraph, Node};
use crate::analysis::searchers::prelude::*;
use crate::analysis::ChainNode;
use std::collections::VecDeque;

const UNVISITED: usize = usize::MAX;

// a state is a node together with its assumed value, `node * 2 + on`
fn state(node: usize, on: bool) -> usize {
    node * 2 + on as usize
}

fn split(state: usize) -> (usize, bool) {
    (state / 2, state % 2 == 1)
}

/// Breadth first search for chains through a [`LinkGraph`].
///
/// A chain alternates between nodes assumed true and false. A true node implies that
/// its weak neighbors are false, a false node that its strong neighbors are true.
/// Every state is reached by its shortest path only.
pub(crate) struct ChainSearch<'a> {
    graph: &'a LinkGraph,
    maps: &'a GridMaps,
    max_nodes: usize,
    parent: Vec<usize>,
    depth: Vec<usize>,
    queue: VecDeque<usize>,
}

impl<'a> ChainSearch<'a> {
    pub(crate) fn new(graph: &'a LinkGraph, maps: &'a GridMaps, max_nodes: usize) -> Self {
        ChainSearch {
            graph,
            maps,
            max_nodes,
            parent: vec![UNVISITED; graph.len() * 2],
            depth: vec![0; graph.len() * 2],
            queue: VecDeque::new(),
        }
    }

    /// Collects all chains that start at `start`, assumed true and assumed false.
    pub(crate) fn chains_from(&mut self, start: usize, chains: &mut Vec<Chain>) {
        self.search(start, true, chains);
        self.search(start, false, chains);
    }

    fn search(&mut self, start: usize, start_on: bool, chains: &mut Vec<Chain>) {
        let graph = self.graph;
        for parent in &mut self.parent {
            *parent = UNVISITED;
        }
        let start_state = state(start, start_on);
        self.parent[start_state] = start_state;
        self.depth[start_state] = 0;
        self.queue.clear();
        self.queue.push_back(start_state);

        while let Some(current) = self.queue.pop_front() {
            let depth = self.depth[current];
            if depth + 2 > self.max_nodes {
                continue;
            }
            let (node, on) = split(current);
            let neighbors = match on {
                true => graph.weak_links(node),
                false => graph.strong_links(node),
            };

            for &next in neighbors {
                if next == start {
                    if let Some(chain) = self.close_loop(current, start, start_on) {
                        chains.push(chain);
                    }
                    continue;
                }
                let next_state = state(next, !on);
                if self.parent[next_state] != UNVISITED {
                    continue;
                }
                self.parent[next_state] = current;
                self.depth[next_state] = depth + 1;
                if !start_on && !on && depth + 1 >= 3 {
                    if let Some(chain) = self.open_chain(next_state) {
                        chains.push(chain);
                    }
                }
                self.queue.push_back(next_state);
            }
        }
    }

    fn path(&self, end: usize) -> Vec<(usize, bool)> {
        trace_path(&self.parent, end)
    }

    fn chain_nodes(&self, path: &[(usize, bool)]) -> Vec<ChainNode> {
        chain_nodes(self.graph, path)
    }

    // `current` links back to the start
    fn close_loop(&self, current: usize, start: usize, start_on: bool) -> Option<Chain> {
        let (_, current_on) = split(current);
        let end_on = !current_on;
        let start_node = self.graph.node(start);
        let cell = start_node.cells.unique().ok()??;

        let mut path = self.path(current);
        path.push((start, end_on));

        let (kind, conclusions) = match (start_on, end_on) {
            // true implies false
            (true, false) => (
                ChainKind::Discontinuous,
                vec![Conclusion::elimination(cell, start_node.digit)],
            ),
            // false implies true
            (false, true) => (
                ChainKind::Discontinuous,
                vec![Conclusion::assignment(cell, start_node.digit)],
            ),
            (false, false) => {
                let n_links = path.len() - 1;
                let mut ids: Vec<usize> = path[1..].iter().map(|&(id, _)| id).collect();
                ids.sort_unstable();
                ids.dedup();
                if n_links < 4 || ids.len() != n_links {
                    return None;
                }
                // every link holds exactly one true node now
                let conclusions = path
                    .windows(2)
                    .flat_map(|link| {
                        common_exclusions(self.maps, self.graph.node(link[0].0), self.graph.node(link[1].0))
                    })
                    .collect();
                (ChainKind::Continuous, conclusions)
            }
            (true, true) => return None,
        };
        Some(Chain::new(kind, self.chain_nodes(&path), conclusions))
    }

    // starts false and ends true, so one of the two end nodes is true
    fn open_chain(&self, end: usize) -> Option<Chain> {
        let path = self.path(end);
        let first = self.graph.node(path[0].0);
        let last = self.graph.node(path[path.len() - 1].0);
        let conclusions = common_exclusions(self.maps, first, last);
        if conclusions.is_empty() {
            return None;
        }
        Some(Chain::new(ChainKind::Open, self.chain_nodes(&path), conclusions))
    }
}

/// Every state that follows from assuming one node true or false, each reached by its
/// shortest path.
pub(crate) struct Implications {
    parent: Vec<usize>,
}

impl Implications {
    pub(crate) fn of(graph: &LinkGraph, start: usize, start_on: bool, max_nodes: usize) -> Self {
        let mut parent = vec![UNVISITED; graph.len() * 2];
        let mut depth = vec![0; graph.len() * 2];
        let start_state = state(start, start_on);
        parent[start_state] = start_state;
        let mut queue = VecDeque::new();
        queue.push_back(start_state);

        while let Some(current) = queue.pop_front() {
            if depth[current] + 2 > max_nodes {
                continue;
            }
            let (node, on) = split(current);
            let neighbors = match on {
                true => graph.weak_links(node),
                false => graph.strong_links(node),
            };
            for &next in neighbors {
                let next_state = state(next, !on);
                if parent[next_state] != UNVISITED {
                    continue;
                }
                parent[next_state] = current;
                depth[next_state] = depth[current] + 1;
                queue.push_back(next_state);
            }
        }
        Implications { parent }
    }

    pub(crate) fn implies(&self, node: usize, on: bool) -> bool {
        self.parent[state(node, on)] != UNVISITED
    }

    /// Nodes from the assumption to `node`, which must be implied with value `on`.
    pub(crate) fn path(&self, graph: &LinkGraph, node: usize, on: bool) -> Vec<ChainNode> {
        debug_assert!(self.implies(node, on));
        chain_nodes(graph, &trace_path(&self.parent, state(node, on)))
    }
}

// states from the start to `end`
fn trace_path(parent: &[usize], end: usize) -> Vec<(usize, bool)> {
    let mut path = vec![split(end)];
    let mut state = end;
    while parent[state] != state {
        state = parent[state];
        path.push(split(state));
    }
    path.reverse();
    path
}

fn chain_nodes(graph: &LinkGraph, path: &[(usize, bool)]) -> Vec<ChainNode> {
    path.iter()
        .map(|&(id, on)| {
            let node = graph.node(id);
            ChainNode {
                digit: node.digit,
                cells: node.cells,
                on,
            }
        })
        .collect()
}

/// Eliminations of the candidates that exclude both nodes, if one of them must be true.
fn common_exclusions(maps: &GridMaps, a: Node, b: Node) -> Vec<Conclusion> {
    a.excluded_candidates(maps)
        .into_iter()
        .filter(|&(cell, digit)| Node::single(cell, digit).excludes(b))
        .map(|(cell, digit)| Conclusion::elimination(cell, digit))
        .collect()
}

#[cfg(test)]
mod test {
    use super::super::links::LinkTypes;
    use super::*;
    use crate::board::{Candidate, Grid};

    #[test]
    fn respects_max_length() {
        let mut grid = Grid::empty();
        // 1 in r1 only in r1c1 and r1c5, in r5 only in r5c1 and r5c6
        for &cell in &[1, 2, 3, 5, 6, 7, 8, 37, 38, 39, 40, 42, 43, 44] {
            grid.eliminate(Candidate::new(cell, 1)).unwrap();
        }
        let maps = GridMaps::new(&grid);
        let graph = LinkGraph::build(&maps, LinkTypes::SINGLE_DIGIT);

        let chains_with = |max_nodes| {
            let mut search = ChainSearch::new(&graph, &maps, max_nodes);
            let mut chains = vec![];
            for start in graph.candidate_nodes() {
                search.chains_from(start, &mut chains);
            }
            chains
        };
        assert!(chains_with(3).is_empty());
        let chains = chains_with(4);
        assert!(!chains.is_empty());
        assert!(chains.iter().all(|chain| chain.len() == 3));
    }

    #[test]
    fn implications_alternate() {
        let mut grid = Grid::empty();
        // r1c1 holds 1 or 2, 2 in r9 only in r9c1 and r9c9
        for digit in 3..=9 {
            grid.eliminate(Candidate::new(0, digit)).unwrap();
        }
        for cell in 73..=79 {
            grid.eliminate(Candidate::new(cell, 2)).unwrap();
        }
        let maps = GridMaps::new(&grid);
        let graph = LinkGraph::build(&maps, LinkTypes::NORMAL);
        let node = |cell, digit| graph.candidate_node(Cell::new(cell), Digit::new(digit)).unwrap();

        let implications = Implications::of(&graph, node(0, 1), false, 20);
        assert!(implications.implies(node(0, 2), true));
        assert!(implications.implies(node(72, 2), false));
        assert!(implications.implies(node(80, 2), true));
        assert!(!implications.implies(node(80, 2), false));
        let path = implications.path(&graph, node(80, 2), true);
        let cells: Vec<u8> = path.iter().map(|node| node.cells.first().unwrap().get()).collect();
        assert_eq!(cells, vec![0, 0, 72, 80]);
        assert!(path[3].on && !path[2].on);

        // a single link more than allowed
        let implications = Implications::of(&graph, node(0, 1), false, 3);
        assert!(implications.implies(node(72, 2), false));
        assert!(!implications.implies(node(80, 2), true));
    }
}
