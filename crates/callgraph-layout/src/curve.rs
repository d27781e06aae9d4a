use crate::Point;
use serde::Serialize;
use std::fmt::Write;

/// Largest vertical control point offset of a curved edge, in pixels
pub const MAX_CURVE_STRENGTH: f32 = 150.0;

/// Vertical distance under which two points count as level with each other
pub const ALIGNMENT_EPSILON: f32 = 1.0;

/// Cubic Bézier curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// Evaluate the curve at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;

        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }
}

/// Geometry of a routed edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgePath {
    Line { start: Point, end: Point },
    Cubic(CubicBezier),
}

impl EdgePath {
    pub fn start(&self) -> Point {
        match self {
            EdgePath::Line { start, .. } => *start,
            EdgePath::Cubic(curve) => curve.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            EdgePath::Line { end, .. } => *end,
            EdgePath::Cubic(curve) => curve.end,
        }
    }

    /// Point halfway along the path. For curves this follows the curve
    /// itself rather than the chord.
    pub fn midpoint(&self) -> Point {
        match self {
            EdgePath::Line { start, end } => start.midpoint(*end),
            EdgePath::Cubic(curve) => curve.point_at(0.5),
        }
    }

    /// SVG path data (`d` attribute) for this path
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        // Writing to a String cannot fail
        let _ = match self {
            EdgePath::Line { start, end } => {
                write!(d, "M{},{}L{},{}", start.x, start.y, end.x, end.y)
            }
            EdgePath::Cubic(c) => write!(
                d,
                "M{},{} C{},{} {},{} {},{}",
                c.start.x,
                c.start.y,
                c.control1.x,
                c.control1.y,
                c.control2.x,
                c.control2.y,
                c.end.x,
                c.end.y
            ),
        };
        d
    }
}

/// How far the control points of a curve are pulled off the chord
///
/// Grows with the distance covered and is capped at [`MAX_CURVE_STRENGTH`].
pub fn curve_strength(dx: f32, dy: f32) -> f32 {
    (dx.abs() * 0.3)
        .max(dy.abs() * 0.5)
        .min(MAX_CURVE_STRENGTH)
}

/// Path between two boundary points
///
/// Points that are level with each other are joined by a straight line.
/// Otherwise the path is a cubic curve with control points at one and two
/// thirds of the horizontal span, pushed in the direction of travel.
pub fn curve_between(start: Point, end: Point) -> EdgePath {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dy.abs() < ALIGNMENT_EPSILON {
        return EdgePath::Line { start, end };
    }

    let strength = curve_strength(dx, dy);
    let offset = if end.y < start.y {
        -strength / 2.0
    } else {
        strength / 2.0
    };

    EdgePath::Cubic(CubicBezier {
        start,
        control1: Point::new(start.x + dx * 0.33, start.y + offset),
        control2: Point::new(start.x + dx * 0.67, end.y + offset),
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const EPS: f32 = 1e-3;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn level_points_route_straight() {
        let path = curve_between(Point::new(0.0, 100.0), Point::new(250.0, 100.4));
        assert!(matches!(path, EdgePath::Line { .. }));
        assert!(close(path.midpoint(), Point::new(125.0, 100.2)));
    }

    #[test]
    fn strength_prefers_larger_component_and_caps() {
        assert!((curve_strength(200.0, 100.0) - 60.0).abs() < EPS);
        assert!((curve_strength(20.0, 100.0) - 50.0).abs() < EPS);
        assert!((curve_strength(-2000.0, 10.0) - MAX_CURVE_STRENGTH).abs() < EPS);
    }

    #[test]
    fn downward_curve_offsets_control_points_down() {
        let path = curve_between(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        let EdgePath::Cubic(curve) = path else {
            panic!("expected a curve, got {path:?}");
        };
        assert!(close(curve.control1, Point::new(66.0, 30.0)));
        assert!(close(curve.control2, Point::new(134.0, 130.0)));
    }

    #[test]
    fn upward_curve_offsets_control_points_up() {
        let path = curve_between(Point::new(0.0, 100.0), Point::new(200.0, 0.0));
        let EdgePath::Cubic(curve) = path else {
            panic!("expected a curve, got {path:?}");
        };
        assert!(close(curve.control1, Point::new(66.0, 70.0)));
        assert!(close(curve.control2, Point::new(134.0, -30.0)));
    }

    #[test]
    fn colinear_curve_midpoint_is_chord_midpoint() {
        let curve = CubicBezier {
            start: Point::new(0.0, 0.0),
            control1: Point::new(10.0, 5.0),
            control2: Point::new(20.0, 10.0),
            end: Point::new(30.0, 15.0),
        };
        assert!(close(curve.point_at(0.5), Point::new(15.0, 7.5)));
        assert!(close(curve.point_at(0.0), curve.start));
        assert!(close(curve.point_at(1.0), curve.end));
    }

    #[test]
    fn svg_path_data() {
        let line = EdgePath::Line {
            start: Point::new(1.0, 2.0),
            end: Point::new(3.0, 4.0),
        };
        assert_eq!(line.to_svg(), "M1,2L3,4");

        let curve = curve_between(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(curve.to_svg().starts_with("M0,0 C"));
    }
}
