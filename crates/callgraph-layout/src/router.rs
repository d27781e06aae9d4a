use crate::config::RouteStyle;
use crate::curve::{curve_between, EdgePath};
use crate::geometry::intersect;
use crate::model::NodeId;
use crate::placer::Positions;
use crate::sizes::NodeSizes;
use crate::topology::Topology;
use crate::{Point, Vec2};
use serde::Serialize;
use std::f32::consts::PI;
use tracing::warn;

/// Geometry of one input link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    /// Index of the link in the input
    pub link: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub path: EdgePath,
    /// Where the edge label is centered
    pub label: Point,
    /// Text of the edge label
    pub text: String,
}

/// Computes edge paths from node positions and box sizes
///
/// Only reads positions, so it can be rerun after every simulation tick or
/// drag without caring how the positions were produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct Router {
    style: RouteStyle,
}

impl Router {
    pub fn new(style: RouteStyle) -> Self {
        Self { style }
    }

    /// Path and label anchor between two boxes given by center and full size
    pub fn route_boxes(
        &self,
        source: Point,
        source_size: Vec2,
        target: Point,
        target_size: Vec2,
    ) -> (EdgePath, Point) {
        match self.style {
            RouteStyle::Curved => {
                let start = source + intersect(0.0, source_size.half());
                let end = target + intersect(PI, target_size.half());
                let path = curve_between(start, end);
                (path, path.midpoint())
            }
            RouteStyle::Direct => {
                let delta = target - source;
                let angle = delta.y.atan2(delta.x);
                let path = EdgePath::Line {
                    start: source + intersect(angle, source_size.half()),
                    end: target + intersect(angle + PI, target_size.half()),
                };
                (path, source.midpoint(target))
            }
        }
    }

    /// Route every valid link of the topology
    ///
    /// Links with an end that has no position are skipped.
    pub fn route<S>(&self, topology: &Topology, positions: &Positions, sizes: &S) -> Vec<RoutedEdge>
    where
        S: NodeSizes<NodeId>,
    {
        topology
            .links()
            .iter()
            .filter_map(|link| {
                let (Some(&source), Some(&target)) =
                    (positions.get(&link.source), positions.get(&link.target))
                else {
                    warn!(
                        "Link {} from {} to {} has an unplaced end",
                        link.index, link.source, link.target
                    );
                    return None;
                };

                let (path, label) = self.route_boxes(
                    source,
                    sizes.size(link.source),
                    target,
                    sizes.size(link.target),
                );

                Some(RoutedEdge {
                    link: link.index,
                    source: link.source,
                    target: link.target,
                    path,
                    label,
                    text: link.label.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::curve_strength;
    use crate::model::{GraphData, Latency, Link, Node};
    use std::collections::HashMap;
    use test_log::test;

    const EPS: f32 = 1e-3;

    fn no_size(_: NodeId) -> Vec2 {
        Vec2::zero()
    }

    #[test]
    fn level_nodes_get_a_straight_edge() {
        let router = Router::default();
        let (path, label) = router.route_boxes(
            Point::new(100.0, 300.0),
            Vec2::new(80.0, 30.0),
            Point::new(450.0, 300.0),
            Vec2::new(60.0, 30.0),
        );

        let EdgePath::Line { start, end } = path else {
            panic!("expected a line, got {path:?}");
        };
        assert!((start.x - 140.0).abs() < EPS && (start.y - 300.0).abs() < EPS);
        assert!((end.x - 420.0).abs() < EPS && (end.y - 300.0).abs() < EPS);
        assert!((label.x - 280.0).abs() < EPS);
    }

    #[test]
    fn offset_nodes_get_a_curve() {
        let router = Router::default();
        let (path, label) = router.route_boxes(
            Point::new(0.0, 0.0),
            Vec2::zero(),
            Point::new(200.0, 100.0),
            Vec2::zero(),
        );

        let EdgePath::Cubic(curve) = path else {
            panic!("expected a curve, got {path:?}");
        };
        let chord = curve.end - curve.start;
        let strength = curve_strength(chord.x, chord.y);
        assert!((strength - 60.0).abs() < EPS);
        assert!((curve.control1.y - strength / 2.0).abs() < EPS);
        assert!((curve.control2.y - (100.0 + strength / 2.0)).abs() < EPS);

        // The label follows the curve, below the chord midpoint
        assert_eq!(label, curve.point_at(0.5));
        assert!(label.y > 50.0);
    }

    #[test]
    fn direct_style_follows_the_center_line() {
        let router = Router::new(RouteStyle::Direct);
        let (path, label) = router.route_boxes(
            Point::new(0.0, 0.0),
            Vec2::new(20.0, 20.0),
            Point::new(100.0, 100.0),
            Vec2::new(20.0, 20.0),
        );

        assert!(matches!(path, EdgePath::Line { .. }));
        assert!((path.start().x - 10.0).abs() < EPS && (path.start().y - 10.0).abs() < EPS);
        assert!((path.end().x - 90.0).abs() < EPS && (path.end().y - 90.0).abs() < EPS);
        assert_eq!(label, Point::new(50.0, 50.0));
    }

    #[test]
    fn routes_every_placed_link() {
        let data = GraphData {
            nodes: vec![Node::new(1, "a"), Node::new(2, "b"), Node::new(3, "c")],
            links: vec![
                Link::new(1, 2).with_latency(Latency::Seconds(0.2)),
                Link::new(1, 2),
                Link::new(9, 2),
                Link::new(2, 3),
            ],
        };
        let topology = Topology::new(&data);
        let positions: Positions = HashMap::from([
            (1, Point::new(0.0, 0.0)),
            (2, Point::new(300.0, 0.0)),
        ]);

        let edges = Router::default().route(&topology, &positions, &no_size);

        let links: Vec<_> = edges.iter().map(|e| e.link).collect();
        assert_eq!(links, vec![0, 1]);
        assert_eq!(edges[0].text, "200ms (+0µs)");
        assert_eq!(edges[1].text, "0µs (+0µs)");
        assert!(edges.iter().all(|e| e.label.is_finite()));
    }
}
