use crate::model::NodeId;
use thiserror::Error;

/// Errors reported by the layout engine
///
/// Laying out a graph never fails; these cover configuration and
/// interactive edits only.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A configuration value is out of range
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// The node is not part of the laid out graph
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A node was asked to move to a non-finite position
    #[error("invalid position for node {0}")]
    InvalidPosition(NodeId),

    /// Nodes cannot be moved with the current configuration
    #[error("node dragging is disabled")]
    DragDisabled,
}
