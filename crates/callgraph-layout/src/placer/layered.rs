use super::{Columns, Placer, Positions, Slots};
use crate::config::LayoutConfig;
use crate::levels::Levels;
use crate::model::NodeId;
use crate::topology::Topology;
use crate::{Point, Vec2};
use tracing::debug;

/// Deterministic placement in level columns
///
/// Nodes are first spread evenly over their level's column in name order.
/// Then, from the second to last level back to the first, every caller is
/// moved to the mean height of its callees and the level is spread evenly
/// again in its new order, which keeps callers next to what they call
/// without letting them overlap.
#[derive(Debug, Clone)]
pub struct StaticPlacer {
    canvas: Vec2,
    level_padding: f32,
    min_node_spacing: f32,
}

impl StaticPlacer {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            canvas: config.canvas,
            level_padding: config.level_padding,
            min_node_spacing: config.min_node_spacing,
        }
    }

    fn slots(&self, count: usize) -> Slots {
        Slots::new(count, self.canvas.y, self.min_node_spacing)
    }
}

impl Placer for StaticPlacer {
    fn place(&self, topology: &Topology, levels: &Levels<NodeId>) -> Positions {
        let columns = Columns::new(self.canvas.x, levels.max_level(), self.level_padding);

        let mut layers = levels.group(topology.nodes().iter().copied());
        for layer in &mut layers {
            layer.sort_by(|a, b| topology.name(*a).cmp(topology.name(*b)));
        }

        let mut positions = Positions::with_capacity(topology.nodes().len());
        for (level, layer) in layers.iter().enumerate() {
            let slots = self.slots(layer.len());
            for (index, &node) in layer.iter().enumerate() {
                positions.insert(node, Point::new(columns.x(level), slots.y(index)));
            }
        }

        for level in (0..levels.max_level()).rev() {
            let layer = &mut layers[level];

            for &node in layer.iter() {
                let children_y: Vec<f32> = topology
                    .children(node)
                    .iter()
                    .filter_map(|child| positions.get(child))
                    .map(|pos| pos.y)
                    .collect();
                if children_y.is_empty() {
                    continue;
                }

                let y = children_y.iter().sum::<f32>() / children_y.len() as f32;
                positions.insert(node, Point::new(columns.x(level), y));
            }

            if layer.len() > 1 {
                // Stable, so nodes at the same height keep their name order
                layer.sort_by(|a, b| positions[a].y.total_cmp(&positions[b].y));

                let slots = self.slots(layer.len());
                for (index, node) in layer.iter().enumerate() {
                    if let Some(pos) = positions.get_mut(node) {
                        pos.y = slots.y(index);
                    }
                }
            }
        }

        debug!(
            "Placed {} nodes on {} levels",
            positions.len(),
            levels.count()
        );

        positions
    }
}
