//! Layout and edge routing for service call graphs
//!
//! Nodes are services and edges are calls between them. The engine assigns
//! every node a level (its depth in the call graph), places the nodes in
//! level columns, either deterministically or by force relaxation, and
//! computes a path and a label anchor for every call.
//!
//! # Example
//!
//! ```
//! use callgraph_layout::{GraphData, LayoutConfig, LayoutEngine, Link, Node, NodeId, Vec2};
//!
//! let data = GraphData {
//!     nodes: vec![Node::new(1, "frontend"), Node::new(2, "auth"), Node::new(3, "users")],
//!     links: vec![Link::new(1, 2), Link::new(2, 3)],
//! };
//!
//! let engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
//! let scene = engine.render(&data);
//!
//! // Box sizes come from whatever draws the labels
//! let sizes = |_node: NodeId| Vec2::new(100.0, 30.0);
//! let layout = scene.layout(&sizes);
//!
//! assert_eq!(layout.max_level, 2);
//! assert_eq!(layout.edges.len(), 2);
//! ```

mod config;
mod engine;
mod error;
mod geometry;
mod sizes;

pub mod curve;
pub mod format;
pub mod levels;
pub mod model;
pub mod placer;
pub mod router;
pub mod topology;

pub use config::{ForceConfig, LayoutConfig, PlacementMode, RouteStyle};
pub use engine::{Layout, LayoutEngine, LiveScene, PlacedNode, Scene};
pub use error::LayoutError;
pub use geometry::{intersect, Point, Vec2};
pub use sizes::{LabelEstimate, NodeSizes};

pub use curve::{CubicBezier, EdgePath};
pub use levels::{assign_levels, Levels};
pub use model::{Comparison, GraphData, Latency, Link, Node, NodeId, SubEdge};
pub use placer::{DynamicPlacer, Placer, Positions, Simulation, StaticPlacer};
pub use router::{RoutedEdge, Router};
pub use topology::Topology;
