use crate::config::LayoutConfig;
use crate::levels::{assign_levels, Levels};
use crate::model::{GraphData, NodeId};
use crate::placer::{AnyPlacer, DynamicPlacer, Placer, Positions, Simulation};
use crate::router::{RoutedEdge, Router};
use crate::sizes::NodeSizes;
use crate::topology::Topology;
use crate::{LayoutError, Point};
use serde::Serialize;
use tracing::debug;

/// Lays out call graphs according to a [`LayoutConfig`]
///
/// Every call starts from scratch: nothing is kept between two graphs.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// # Errors
    /// Returns [`LayoutError::InvalidConfig`] if the configuration is unusable
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place every node of `data` with the configured placement mode
    ///
    /// In dynamic mode the relaxation runs until it settles.
    pub fn render(&self, data: &GraphData) -> Scene {
        let (topology, levels) = prepare(data);
        let positions = AnyPlacer::from_config(&self.config).place(&topology, &levels);
        self.scene(topology, levels, positions)
    }

    /// Prepare a force relaxation driven by the caller, one tick at a time
    ///
    /// Used regardless of the configured placement mode.
    pub fn simulate(&self, data: &GraphData) -> LiveScene {
        let (topology, levels) = prepare(data);
        let simulation = DynamicPlacer::new(&self.config).simulation(&topology, &levels);
        let positions = simulation.positions();
        LiveScene {
            scene: self.scene(topology, levels, positions),
            simulation,
        }
    }

    fn scene(&self, topology: Topology, levels: Levels<NodeId>, positions: Positions) -> Scene {
        Scene {
            topology,
            levels,
            positions,
            router: Router::new(self.config.route_style),
            allow_drag: self.config.allow_drag,
        }
    }
}

fn prepare(data: &GraphData) -> (Topology, Levels<NodeId>) {
    let topology = Topology::new(data);
    let levels = assign_levels(topology.graph());
    debug!(
        "Graph spans {} levels over {} nodes",
        levels.count(),
        topology.nodes().len()
    );
    (topology, levels)
}

/// A laid out graph
#[derive(Debug, Clone)]
pub struct Scene {
    topology: Topology,
    levels: Levels<NodeId>,
    positions: Positions,
    router: Router,
    allow_drag: bool,
}

impl Scene {
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn levels(&self) -> &Levels<NodeId> {
        &self.levels
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.positions.get(&node).copied()
    }

    pub fn level(&self, node: NodeId) -> usize {
        self.levels.level(node)
    }

    /// Move a node, e.g. at the end of a drag. Edges follow on the next
    /// [`route`](Scene::route).
    ///
    /// # Errors
    /// - [`LayoutError::DragDisabled`] if dragging is turned off
    /// - [`LayoutError::UnknownNode`] if the node is not in the graph
    /// - [`LayoutError::InvalidPosition`] if `to` is not finite
    pub fn move_node(&mut self, node: NodeId, to: Point) -> Result<(), LayoutError> {
        if !self.allow_drag {
            return Err(LayoutError::DragDisabled);
        }
        if !to.is_finite() {
            return Err(LayoutError::InvalidPosition(node));
        }
        let position = self
            .positions
            .get_mut(&node)
            .ok_or(LayoutError::UnknownNode(node))?;
        *position = to;
        Ok(())
    }

    /// Edge geometry for the current positions
    pub fn route<S>(&self, sizes: &S) -> Vec<RoutedEdge>
    where
        S: NodeSizes<NodeId>,
    {
        self.router.route(&self.topology, &self.positions, sizes)
    }

    /// Snapshot of nodes and edges for the rendering layer
    pub fn layout<S>(&self, sizes: &S) -> Layout
    where
        S: NodeSizes<NodeId>,
    {
        let nodes = self
            .topology
            .nodes()
            .iter()
            .filter_map(|&id| {
                let position = self.position(id)?;
                Some(PlacedNode {
                    id,
                    name: self.topology.name(id).to_string(),
                    level: self.level(id),
                    x: position.x,
                    y: position.y,
                })
            })
            .collect();

        Layout {
            max_level: self.levels.max_level(),
            nodes,
            edges: self.route(sizes),
        }
    }
}

/// A scene whose positions are relaxed by a running simulation
#[derive(Debug, Clone)]
pub struct LiveScene {
    scene: Scene,
    simulation: Simulation,
}

impl LiveScene {
    /// The positions as of the last tick
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// Advance the simulation by one tick, returns whether it is still running
    pub fn tick(&mut self) -> bool {
        let running = self.simulation.tick();
        self.scene.positions = self.simulation.positions();
        running
    }

    /// Tick until the simulation settles, routing the edges after every tick
    pub fn run<S, F>(&mut self, sizes: &S, mut on_frame: F) -> usize
    where
        S: NodeSizes<NodeId>,
        F: FnMut(&Scene, Vec<RoutedEdge>),
    {
        let mut ticks = 0;
        while self.is_running() {
            self.tick();
            ticks += 1;
            on_frame(&self.scene, self.scene.route(sizes));
        }
        ticks
    }

    /// Hold a node where the pointer is while it is dragged
    ///
    /// # Errors
    /// Same as [`Scene::move_node`]
    pub fn pin(&mut self, node: NodeId, at: Point) -> Result<(), LayoutError> {
        self.scene.move_node(node, at)?;
        self.simulation.pin(node, at)
    }

    /// End a drag, letting the node move freely again
    ///
    /// # Errors
    /// - [`LayoutError::DragDisabled`] if dragging is turned off
    /// - [`LayoutError::UnknownNode`] if the node is not in the graph
    pub fn release(&mut self, node: NodeId) -> Result<(), LayoutError> {
        if !self.scene.allow_drag {
            return Err(LayoutError::DragDisabled);
        }
        self.simulation.release(node)
    }

    /// Stop simulating and keep the current positions
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

/// Final position of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub id: NodeId,
    pub name: String,
    pub level: usize,
    pub x: f32,
    pub y: f32,
}

/// Everything the rendering layer needs to draw a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub max_level: usize,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<RoutedEdge>,
}
