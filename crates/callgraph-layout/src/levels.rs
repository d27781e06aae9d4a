use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// Topological depth of every node of a graph
#[derive(Debug, Clone)]
pub struct Levels<N>
where
    N: Copy + Eq + Hash,
{
    level_of: HashMap<N, usize>,
    max_level: usize,
}

impl<N> Levels<N>
where
    N: Copy + Eq + Hash,
{
    /// Level of a node, 0 for nodes the propagation never reached
    pub fn level(&self, node: N) -> usize {
        self.level_of.get(&node).copied().unwrap_or(0)
    }

    /// Whether the propagation assigned a level to this node
    pub fn is_leveled(&self, node: N) -> bool {
        self.level_of.contains_key(&node)
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Number of levels, including empty ones
    pub fn count(&self) -> usize {
        self.max_level + 1
    }

    /// Group the given nodes by level, keeping their relative order
    pub fn group<I>(&self, nodes: I) -> Vec<Vec<N>>
    where
        I: IntoIterator<Item = N>,
    {
        let mut layers = vec![Vec::new(); self.count()];
        for node in nodes {
            layers[self.level(node)].push(node);
        }
        layers
    }
}

/// Assign each node the length of the longest path reaching it from a node
/// without callers
///
/// Kahn-style propagation: nodes are released once every caller has been
/// processed, and each release pushes `level + 1` onto its callees. Nodes on
/// a cycle that no source leads into are never released; they keep the
/// level pushed onto them so far, or 0 when nothing reached them. Always
/// terminates since every node is released at most once.
pub fn assign_levels<G>(graph: G) -> Levels<G::NodeId>
where
    G: IntoNodeIdentifiers + IntoNeighborsDirected,
    G::NodeId: Copy + Eq + Hash,
{
    let mut in_degree: HashMap<G::NodeId, usize> = HashMap::new();
    let mut level_of = HashMap::new();
    let mut queue = VecDeque::new();

    for node in graph.node_identifiers() {
        let degree = graph.neighbors_directed(node, Direction::Incoming).count();
        in_degree.insert(node, degree);
        if degree == 0 {
            level_of.insert(node, 0);
            queue.push_back(node);
        }
    }

    let mut released = 0;
    while let Some(node) = queue.pop_front() {
        released += 1;
        let level = level_of.get(&node).copied().unwrap_or(0);

        for succ in graph.neighbors_directed(node, Direction::Outgoing) {
            let succ_level = level_of.entry(succ).or_insert(0);
            *succ_level = (*succ_level).max(level + 1);

            if let Some(remaining) = in_degree.get_mut(&succ) {
                if *remaining > 0 {
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push_back(succ);
                    }
                }
            }
        }
    }

    let max_level = level_of.values().copied().max().unwrap_or(0);
    let stuck = in_degree.len() - released;
    if stuck > 0 {
        debug!("{stuck} nodes sit on cycles, their levels are approximate");
    }

    Levels {
        level_of,
        max_level,
    }
}
