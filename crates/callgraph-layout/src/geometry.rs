use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 2D vector with f32 coordinates, used for sizes and offsets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a zero vector
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Half of this vector, e.g. the half extents of a box size
    pub fn half(self) -> Self {
        self * 0.5
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// 2D point with f32 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Offset from a rectangle's center to the point where a ray cast at `angle`
/// (radians) leaves the rectangle.
///
/// `half` holds the half width and half height of the rectangle. A rectangle
/// with no area yields a zero offset, so the ray starts at the center.
pub fn intersect(angle: f32, half: Vec2) -> Vec2 {
    let (w, h) = (half.x, half.y);
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) || !angle.is_finite() {
        return Vec2::zero();
    }

    let (y, x) = angle.sin_cos();

    if x.abs() * h > y.abs() * w {
        // Leaves through the left or right side
        Vec2::new(w * x.signum(), y * w / x.abs())
    } else {
        // Leaves through the top or bottom side
        Vec2::new(x * h / y.abs(), h * y.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    use test_log::test;

    const EPS: f32 = 1e-3;

    #[test]
    fn horizontal_rays_hit_the_sides() {
        let half = Vec2::new(40.0, 10.0);

        let right = intersect(0.0, half);
        assert!((right.x - 40.0).abs() < EPS && right.y.abs() < EPS);

        let left = intersect(PI, half);
        assert!((left.x + 40.0).abs() < EPS && left.y.abs() < EPS);
    }

    #[test]
    fn vertical_rays_hit_top_and_bottom() {
        let half = Vec2::new(40.0, 10.0);

        let down = intersect(FRAC_PI_2, half);
        assert!(down.x.abs() < EPS && (down.y - 10.0).abs() < EPS);

        let up = intersect(-FRAC_PI_2, half);
        assert!(up.x.abs() < EPS && (up.y + 10.0).abs() < EPS);
    }

    #[test]
    fn diagonal_ray_on_wide_box_hits_horizontal_edge() {
        let hit = intersect(FRAC_PI_4, Vec2::new(40.0, 10.0));
        assert!((hit.x - 10.0).abs() < EPS);
        assert!((hit.y - 10.0).abs() < EPS);
    }

    #[test]
    fn hits_stay_on_the_box_and_are_symmetric() {
        let half = Vec2::new(37.5, 12.0);
        for step in 0..72 {
            let angle = step as f32 * PI / 36.0;
            let hit = intersect(angle, half);
            assert!(hit.x.abs() <= half.x + EPS, "x out of box at {angle}");
            assert!(hit.y.abs() <= half.y + EPS, "y out of box at {angle}");

            let opposite = intersect(angle + PI, half);
            assert!((opposite.x + hit.x).abs() < EPS, "asymmetric x at {angle}");
            assert!((opposite.y + hit.y).abs() < EPS, "asymmetric y at {angle}");
        }
    }

    #[test]
    fn empty_box_returns_center() {
        assert_eq!(intersect(0.3, Vec2::zero()), Vec2::zero());
        assert_eq!(intersect(0.0, Vec2::new(0.0, 5.0)), Vec2::zero());
        assert_eq!(intersect(PI, Vec2::new(f32::NAN, 5.0)), Vec2::zero());
    }
}
