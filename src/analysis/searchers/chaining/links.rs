use crate::analysis::searchers::prelude::*;
use std::collections::HashMap;

/// Which links the graph is built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LinkTypes {
    cell_links: bool,
    grouped: bool,
}

impl LinkTypes {
    /// House links of a single digit
    pub(crate) const SINGLE_DIGIT: LinkTypes = LinkTypes {
        cell_links: false,
        grouped: false,
    };
    /// House links plus the links between candidates of one cell
    pub(crate) const NORMAL: LinkTypes = LinkTypes {
        cell_links: true,
        grouped: false,
    };
    /// Normal links plus links between mini-line groups
    pub(crate) const GROUPED: LinkTypes = LinkTypes {
        cell_links: true,
        grouped: true,
    };

    pub(crate) fn is_grouped(self) -> bool {
        self.grouped
    }
}

/// A digit in one cell, or in 2-3 cells of a mini-line for grouped nodes.
/// The node is true if the digit is in one of its cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Node {
    pub(crate) digit: Digit,
    pub(crate) cells: Set<Cell>,
}

impl Node {
    pub(crate) fn single(cell: Cell, digit: Digit) -> Self {
        Node {
            digit,
            cells: cell.as_set(),
        }
    }

    pub(crate) fn is_grouped(self) -> bool {
        self.cells.len() > 1
    }

    /// Checks whether both nodes can't be true at once.
    pub(crate) fn excludes(self, other: Node) -> bool {
        match self.digit == other.digit {
            true => !self.cells.overlaps(other.cells) && !(self.cells | other.cells).common_houses().is_empty(),
            false => self.cells.len() == 1 && self.cells == other.cells,
        }
    }

    /// Candidates, other than the node itself, that can't be true together with the node.
    pub(crate) fn excluded_candidates(self, maps: &GridMaps) -> Vec<(Cell, Digit)> {
        let mut candidates: Vec<_> = (self.cells.common_peers() & maps.digit_cells[self.digit])
            .into_iter()
            .map(|cell| (cell, self.digit))
            .collect();
        if let Ok(Some(cell)) = self.cells.unique() {
            let others = maps.cell_poss_digits[cell].without(self.digit.as_set());
            candidates.extend(others.into_iter().map(|digit| (cell, digit)));
        }
        candidates
    }
}

/// Strong and weak links between the candidates of a grid.
///
/// Strong links connect two nodes of which at least one is true, weak links
/// two nodes of which at most one is true. A conjugate pair is both, so every
/// strong link is listed among the weak links as well.
pub(crate) struct LinkGraph {
    nodes: Vec<Node>,
    strong: Vec<Vec<usize>>,
    weak: Vec<Vec<usize>>,
    // one per candidate index, `None` for candidates not in the grid
    candidate_nodes: Vec<Option<usize>>,
}

impl LinkGraph {
    pub(crate) fn build(maps: &GridMaps, link_types: LinkTypes) -> Self {
        let mut graph = LinkGraph {
            nodes: vec![],
            strong: vec![],
            weak: vec![],
            candidate_nodes: vec![None; 729],
        };
        let mut node_ids = HashMap::new();

        for cell in maps.empty_cells {
            for digit in maps.cell_poss_digits[cell] {
                let id = graph.add_node(Node::single(cell, digit), &mut node_ids);
                graph.candidate_nodes[candidate_index(cell, digit)] = Some(id);
            }
        }

        // conjugate pairs
        for house in House::all() {
            for digit in Digit::all() {
                let cells = maps.house_cells_of(house, digit);
                if cells.len() != 2 {
                    continue;
                }
                let mut cells = cells.into_iter();
                if let (Some(first), Some(second)) = (cells.next(), cells.next()) {
                    let a = graph.add_node(Node::single(first, digit), &mut node_ids);
                    let b = graph.add_node(Node::single(second, digit), &mut node_ids);
                    graph.add_strong(a, b);
                }
            }
        }

        if link_types.cell_links {
            for cell in maps.bivalue_cells {
                let mut digits = maps.cell_poss_digits[cell].into_iter();
                if let (Some(first), Some(second)) = (digits.next(), digits.next()) {
                    let a = graph.add_node(Node::single(cell, first), &mut node_ids);
                    let b = graph.add_node(Node::single(cell, second), &mut node_ids);
                    graph.add_strong(a, b);
                }
            }
        }

        if link_types.grouped {
            graph.add_grouped_links(maps, &mut node_ids);
        }

        graph.weak = vec![vec![]; graph.nodes.len()];
        for a in 0..graph.nodes.len() {
            for b in a + 1..graph.nodes.len() {
                let (node_a, node_b) = (graph.nodes[a], graph.nodes[b]);
                if node_a.digit != node_b.digit && !link_types.cell_links {
                    continue;
                }
                if node_a.excludes(node_b) {
                    graph.weak[a].push(b);
                    graph.weak[b].push(a);
                }
            }
        }
        graph
    }

    // houses whose candidates of a digit lie in exactly two mini-lines,
    // with at least 2 candidates in one of them
    fn add_grouped_links(&mut self, maps: &GridMaps, node_ids: &mut HashMap<Node, usize>) {
        for house in House::all() {
            let partitions: Vec<Vec<MiniLine>> = match house.as_line() {
                Some(line) => vec![MiniLine::all().filter(|ml| ml.line() == line).collect()],
                None => [true, false]
                    .iter()
                    .map(|&rows| {
                        MiniLine::all()
                            .filter(|ml| ml.block().house() == house && ml.is_minirow() == rows)
                            .collect()
                    })
                    .collect(),
            };

            for digit in Digit::all() {
                let cells = maps.house_cells_of(house, digit);
                if cells.len() < 3 {
                    continue;
                }
                for minilines in &partitions {
                    let groups: Vec<Set<Cell>> = minilines
                        .iter()
                        .map(|ml| ml.cells() & cells)
                        .filter(|group| !group.is_empty())
                        .collect();
                    if groups.len() != 2 || groups.iter().all(|group| group.len() < 2) {
                        continue;
                    }
                    let a = self.add_node(Node { digit, cells: groups[0] }, node_ids);
                    let b = self.add_node(Node { digit, cells: groups[1] }, node_ids);
                    self.add_strong(a, b);
                }
            }
        }
    }

    fn add_node(&mut self, node: Node, node_ids: &mut HashMap<Node, usize>) -> usize {
        let nodes = &mut self.nodes;
        let strong = &mut self.strong;
        *node_ids.entry(node).or_insert_with(|| {
            nodes.push(node);
            strong.push(vec![]);
            nodes.len() - 1
        })
    }

    fn add_strong(&mut self, a: usize, b: usize) {
        if !self.strong[a].contains(&b) {
            self.strong[a].push(b);
            self.strong[b].push(a);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: usize) -> Node {
        self.nodes[id]
    }

    pub(crate) fn strong_links(&self, id: usize) -> &[usize] {
        &self.strong[id]
    }

    pub(crate) fn weak_links(&self, id: usize) -> &[usize] {
        &self.weak[id]
    }

    /// Node ids of all candidates, the possible starts of a chain
    pub(crate) fn candidate_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.candidate_nodes.iter().filter_map(|&id| id)
    }

    pub(crate) fn candidate_node(&self, cell: Cell, digit: Digit) -> Option<usize> {
        self.candidate_nodes[candidate_index(cell, digit)]
    }
}

fn candidate_index(cell: Cell, digit: Digit) -> usize {
    cell.as_index() * 9 + digit.as_index()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Candidate, Grid};

    fn restrict(grid: &mut Grid, cell: u8, digits: &[u8]) {
        for digit in (1..=9).filter(|digit| !digits.contains(digit)) {
            grid.eliminate(Candidate::new(cell, digit)).unwrap();
        }
    }

    #[test]
    fn strong_links() {
        let mut grid = Grid::empty();
        restrict(&mut grid, 0, &[1, 2]);
        // 2 in r9 only in r9c1 and r9c9
        for cell in 73..80 {
            grid.eliminate(Candidate::new(cell, 2)).unwrap();
        }
        let maps = GridMaps::new(&grid);

        let graph = LinkGraph::build(&maps, LinkTypes::NORMAL);
        let node = |cell, digit| graph.candidate_node(Cell::new(cell), Digit::new(digit)).unwrap();
        assert_eq!(graph.strong_links(node(0, 1)), &[node(0, 2)][..]);
        assert_eq!(graph.strong_links(node(72, 2)), &[node(80, 2)][..]);
        assert!(graph.weak_links(node(0, 2)).contains(&node(72, 2)));
        assert!(graph.weak_links(node(0, 2)).contains(&node(0, 1)));
        assert!(!graph.weak_links(node(0, 2)).contains(&node(80, 2)));

        let graph = LinkGraph::build(&maps, LinkTypes::SINGLE_DIGIT);
        let node = |cell, digit| graph.candidate_node(Cell::new(cell), Digit::new(digit)).unwrap();
        assert!(graph.strong_links(node(0, 1)).is_empty());
        assert!(!graph.weak_links(node(0, 2)).contains(&node(0, 1)));
    }

    #[test]
    fn grouped_links() {
        let mut grid = Grid::empty();
        // 5 in r1 only in r1c1, r1c2 and r1c8
        for &cell in &[2, 3, 4, 5, 6, 8] {
            grid.eliminate(Candidate::new(cell, 5)).unwrap();
        }
        let maps = GridMaps::new(&grid);
        let graph = LinkGraph::build(&maps, LinkTypes::GROUPED);
        let group = Node {
            digit: Digit::new(5),
            cells: Cell::new(0).as_set() | Cell::new(1),
        };
        let group_id = (0..graph.len()).find(|&id| graph.node(id) == group).unwrap();
        let single = graph.candidate_node(Cell::new(7), Digit::new(5)).unwrap();
        assert_eq!(graph.strong_links(group_id), &[single][..]);
        assert!(graph.node(group_id).is_grouped());
    }

    #[test]
    fn exclusion() {
        let five = Digit::new(5);
        let group = Node {
            digit: five,
            cells: Cell::new(0).as_set() | Cell::new(1),
        };
        assert!(group.excludes(Node::single(Cell::new(20), five)));
        assert!(group.excludes(Node::single(Cell::new(8), five)));
        assert!(!group.excludes(Node::single(Cell::new(9 * 5), five)));
        assert!(!group.excludes(Node::single(Cell::new(1), five)));
        assert!(Node::single(Cell::new(3), five).excludes(Node::single(Cell::new(3), Digit::new(4))));
    }
}
