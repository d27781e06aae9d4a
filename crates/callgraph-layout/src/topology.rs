use crate::format::{format_latency_label, format_seconds};
use crate::model::{GraphData, NodeId};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Data carried by a layout edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Text of the latency label drawn on the edge
    pub text: String,
}

/// A link of the input that survived validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLink {
    /// Index of the link in [`GraphData::links`]
    pub index: usize,
    pub source: NodeId,
    pub target: NodeId,
    /// Latency and its change, as drawn on the edge
    pub label: String,
}

/// Validated graph structure of a call graph
///
/// Parallel links collapse into a single layout edge, while every valid link
/// is still kept for routing.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: DiGraphMap<NodeId, EdgeLabel>,
    names: HashMap<NodeId, String>,
    order: Vec<NodeId>,
    links: Vec<ValidLink>,
}

impl Topology {
    pub fn new(data: &GraphData) -> Self {
        let mut graph = DiGraphMap::new();
        let mut names = HashMap::new();
        let mut order = Vec::with_capacity(data.nodes.len());

        for node in &data.nodes {
            if names.contains_key(&node.id) {
                warn!("Ignoring duplicate node id {} ({:?})", node.id, node.name);
                continue;
            }
            names.insert(node.id, node.name.clone());
            order.push(node.id);
            graph.add_node(node.id);
        }

        let mut links = Vec::with_capacity(data.links.len());
        for (index, link) in data.links.iter().enumerate() {
            if !graph.contains_node(link.source) || !graph.contains_node(link.target) {
                warn!(
                    "Skipping link {index} from {} to {}: unknown node",
                    link.source, link.target
                );
                continue;
            }

            if !graph.contains_edge(link.source, link.target) {
                let text = format!("{} ", format_seconds(link.latency.value()));
                graph.add_edge(link.source, link.target, EdgeLabel { text });
            }

            links.push(ValidLink {
                index,
                source: link.source,
                target: link.target,
                label: format_latency_label(link.latency.value(), link.latency.increase()),
            });
        }

        debug!(
            "Topology with {} nodes, {} edges, {} links",
            graph.node_count(),
            graph.edge_count(),
            links.len()
        );

        Self {
            graph,
            names,
            order,
            links,
        }
    }

    pub fn graph(&self) -> &DiGraphMap<NodeId, EdgeLabel> {
        &self.graph
    }

    /// Node ids in input order
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.names.contains_key(&node)
    }

    pub fn name(&self, node: NodeId) -> &str {
        self.names.get(&node).map(String::as_str).unwrap_or_default()
    }

    /// Direct callees of a node, sorted by name
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        let mut children: Vec<_> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        children.sort_by(|a, b| self.name(*a).cmp(self.name(*b)).then(a.cmp(b)));
        children
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        self.graph.contains_node(node)
            && self
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .next()
                .is_some()
    }

    /// Layout edges, one per connected pair of nodes
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeLabel)> {
        self.graph.all_edges()
    }

    /// Number of layout edges touching a node, in either direction
    pub fn degree(&self, node: NodeId) -> usize {
        if !self.graph.contains_node(node) {
            return 0;
        }
        self.graph.neighbors_directed(node, Direction::Outgoing).count()
            + self.graph.neighbors_directed(node, Direction::Incoming).count()
    }

    /// Valid links in input order
    pub fn links(&self) -> &[ValidLink] {
        &self.links
    }
}
