//! Node placement strategies

mod force;
mod layered;

pub use force::{DynamicPlacer, Simulation};
pub use layered::StaticPlacer;

use crate::config::{LayoutConfig, PlacementMode};
use crate::levels::Levels;
use crate::model::NodeId;
use crate::topology::Topology;
use crate::Point;
use enum_dispatch::enum_dispatch;
use std::collections::HashMap;

/// Position of every node, keyed by id
pub type Positions = HashMap<NodeId, Point>;

/// Assigns coordinates to the nodes of a leveled graph
#[enum_dispatch]
pub trait Placer {
    /// Compute final positions for every node of `topology`
    fn place(&self, topology: &Topology, levels: &Levels<NodeId>) -> Positions;
}

/// Placer selected by [`PlacementMode`]
#[enum_dispatch(Placer)]
#[derive(Debug, Clone)]
pub enum AnyPlacer {
    Static(StaticPlacer),
    Dynamic(DynamicPlacer),
}

impl AnyPlacer {
    pub fn from_config(config: &LayoutConfig) -> Self {
        match config.mode {
            PlacementMode::Static => StaticPlacer::new(config).into(),
            PlacementMode::Dynamic => DynamicPlacer::new(config).into(),
        }
    }
}

/// Horizontal layout of the level columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Columns {
    width: f32,
    padding: f32,
}

impl Columns {
    pub(crate) fn new(canvas_width: f32, max_level: usize, padding: f32) -> Self {
        Self {
            width: canvas_width / (max_level + 1) as f32,
            padding,
        }
    }

    /// Center x of a level's column
    pub(crate) fn x(&self, level: usize) -> f32 {
        let level = level as f32;
        self.width * level + self.width / 2.0 + self.padding * level
    }
}

/// Evenly spaced vertical slots for the nodes of one level
///
/// Nodes use 80% of the canvas height, but never sit closer than
/// `min_spacing`, and the whole group is centered on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Slots {
    start: f32,
    spacing: f32,
}

impl Slots {
    pub(crate) fn new(count: usize, canvas_height: f32, min_spacing: f32) -> Self {
        let spacing = min_spacing.max(canvas_height * 0.8 / (count + 1) as f32);
        let total = spacing * count.saturating_sub(1) as f32;
        Self {
            start: (canvas_height - total) / 2.0,
            spacing,
        }
    }

    pub(crate) fn y(&self, index: usize) -> f32 {
        self.start + index as f32 * self.spacing
    }
}
