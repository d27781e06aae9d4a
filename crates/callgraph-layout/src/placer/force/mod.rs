mod forces;
mod simulation;

pub use simulation::Simulation;

use super::{Columns, Placer, Positions, Slots};
use crate::config::{ForceConfig, LayoutConfig};
use crate::levels::Levels;
use crate::model::NodeId;
use crate::topology::Topology;
use crate::{Point, Vec2};
use forces::{Body, Collision, ForceKind, HeightTarget, Links, PullX, PullY, Repulsion, Spring};
use std::collections::HashMap;

/// Rest length of a link never drops below this
const MIN_LINK_DISTANCE: f32 = 200.0;

/// Average width of a glyph of the edge label font
const LABEL_GLYPH_WIDTH: f32 = 8.0;

/// Room left around an edge label for the node boxes
const LABEL_CLEARANCE: f32 = 120.0;

/// Rest length of a link, long enough to show its label uncompressed
pub(crate) fn link_distance(label: &str) -> f32 {
    MIN_LINK_DISTANCE.max(label.chars().count() as f32 * LABEL_GLYPH_WIDTH + LABEL_CLEARANCE)
}

/// Placement by force relaxation
///
/// Bodies start in their level slots and are then moved by pairwise
/// repulsion and collision, springs along the edges, a pull towards their
/// level column and a pull towards the mean height of their callees.
/// Unlike [`StaticPlacer`](super::StaticPlacer), callers can drive the
/// relaxation tick by tick through [`DynamicPlacer::simulation`].
#[derive(Debug, Clone)]
pub struct DynamicPlacer {
    canvas: Vec2,
    level_padding: f32,
    min_node_spacing: f32,
    forces: ForceConfig,
}

impl DynamicPlacer {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            canvas: config.canvas,
            level_padding: config.level_padding,
            min_node_spacing: config.min_node_spacing,
            forces: config.forces.clone(),
        }
    }

    /// Set up a simulation for this graph without running it
    pub fn simulation(&self, topology: &Topology, levels: &Levels<NodeId>) -> Simulation {
        let columns = Columns::new(self.canvas.x, levels.max_level(), self.level_padding);

        let mut layers = levels.group(topology.nodes().iter().copied());
        for layer in &mut layers {
            layer.sort_by(|a, b| topology.name(*a).cmp(topology.name(*b)));
        }

        let mut bodies = Vec::with_capacity(topology.nodes().len());
        for (level, layer) in layers.iter().enumerate() {
            let slots = Slots::new(layer.len(), self.canvas.y, self.min_node_spacing);
            for (i, &node) in layer.iter().enumerate() {
                bodies.push(Body::new(node, Point::new(columns.x(level), slots.y(i))));
            }
        }

        let index: HashMap<NodeId, usize> = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (body.id, i))
            .collect();

        let degrees: Vec<usize> = bodies.iter().map(|b| topology.degree(b.id)).collect();
        let springs = topology
            .edges()
            .filter_map(|(source, target, label)| {
                Some(Spring::new(
                    *index.get(&source)?,
                    *index.get(&target)?,
                    link_distance(&label.text),
                    &degrees,
                ))
            })
            .collect();

        let x_targets = bodies
            .iter()
            .map(|body| columns.x(levels.level(body.id)))
            .collect();
        let y_targets = bodies
            .iter()
            .map(|body| {
                let children: Vec<usize> = topology
                    .children(body.id)
                    .iter()
                    .filter_map(|child| index.get(child).copied())
                    .collect();
                if children.is_empty() {
                    HeightTarget::Fixed(body.seed.y)
                } else {
                    HeightTarget::Centroid(children)
                }
            })
            .collect();

        let config = &self.forces;
        let forces = vec![
            ForceKind::from(Links { springs }),
            ForceKind::from(Repulsion {
                strength: config.repulsion_strength,
                range: config.repulsion_range * self.canvas.x,
            }),
            ForceKind::from(Collision {
                radius: config.collision_radius,
                strength: 1.0,
            }),
            ForceKind::from(PullX {
                targets: x_targets,
                strength: config.x_strength,
            }),
            ForceKind::from(PullY {
                targets: y_targets,
                strength: config.y_strength,
            }),
        ];

        Simulation::new(bodies, forces, config)
    }
}

impl Placer for DynamicPlacer {
    fn place(&self, topology: &Topology, levels: &Levels<NodeId>) -> Positions {
        let mut simulation = self.simulation(topology, levels);
        simulation.run();
        simulation.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::assign_levels;
    use crate::model::{GraphData, Link, Node};
    use test_log::test;

    fn chain() -> GraphData {
        GraphData {
            nodes: vec![
                Node::new(1, "frontend"),
                Node::new(2, "auth"),
                Node::new(3, "orders"),
                Node::new(4, "db"),
            ],
            links: vec![Link::new(1, 2), Link::new(1, 3), Link::new(2, 4), Link::new(3, 4)],
        }
    }

    #[test]
    fn link_distance_fits_the_label() {
        assert_eq!(link_distance("45ms "), MIN_LINK_DISTANCE);
        assert_eq!(link_distance("0123456789ab"), 12.0 * 8.0 + 120.0);
    }

    #[test]
    fn relaxed_layout_keeps_levels_in_order() {
        let data = chain();
        let topology = Topology::new(&data);
        let levels = assign_levels(topology.graph());
        let positions = DynamicPlacer::new(&LayoutConfig::default()).place(&topology, &levels);

        assert_eq!(positions.len(), 4);
        assert!(positions.values().all(|p| p.is_finite()));
        assert!(positions[&1].x < positions[&2].x);
        assert!(positions[&1].x < positions[&3].x);
        assert!(positions[&2].x < positions[&4].x);
        assert!(positions[&3].x < positions[&4].x);

        let siblings = (positions[&2] - positions[&3]).length();
        assert!(siblings > 80.0, "siblings only {siblings} apart");
    }

    #[test]
    fn simulation_starts_in_level_slots() {
        let data = chain();
        let topology = Topology::new(&data);
        let levels = assign_levels(topology.graph());
        let simulation = DynamicPlacer::new(&LayoutConfig::default()).simulation(&topology, &levels);

        let columns = Columns::new(800.0, 2, 150.0);
        let start = simulation.positions();
        assert_eq!(start[&1], Point::new(columns.x(0), 300.0));
        assert_eq!(start[&2].x, columns.x(1));
        assert!(start[&2].y < start[&3].y);
        assert_eq!(simulation.ticks(), 0);
    }

    #[test]
    fn cycles_and_self_loops_settle() {
        let data = GraphData {
            nodes: vec![
                Node::new(1, "a"),
                Node::new(2, "b"),
                Node::new(3, "c"),
                Node::new(4, "d"),
            ],
            links: vec![Link::new(1, 2), Link::new(2, 3), Link::new(3, 2), Link::new(4, 4)],
        };
        let topology = Topology::new(&data);
        let levels = assign_levels(topology.graph());
        let config = LayoutConfig::default();
        let mut simulation = DynamicPlacer::new(&config).simulation(&topology, &levels);

        let ticks = simulation.run();

        assert!(ticks <= config.forces.max_ticks);
        assert!(!simulation.is_running());
        let positions = simulation.positions();
        assert_eq!(positions.len(), 4);
        for node in topology.nodes() {
            assert!(positions[node].is_finite(), "node {node} at {:?}", positions[node]);
        }
    }

    #[test]
    fn same_input_same_result() {
        let data = chain();
        let topology = Topology::new(&data);
        let levels = assign_levels(topology.graph());
        let placer = DynamicPlacer::new(&LayoutConfig::default());

        assert_eq!(
            placer.place(&topology, &levels),
            placer.place(&topology, &levels)
        );
    }
}
