//! 2-D vectors and axis-aligned collision boxes.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2-D vector of 64-bit floats, used for positions, speeds and extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit-normalised copy. Degenerates to the zero vector when the
    /// normalised components are not finite (zero-length input).
    pub fn unit(&self) -> Vec2 {
        let len = self.length();
        let unit = Vec2::new(self.x / len, self.y / len);
        if unit.x.is_finite() && unit.y.is_finite() {
            unit
        } else {
            Vec2::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

/// Width and height of an axis-aligned box whose lower-left corner sits at
/// its owner's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionArea {
    pub x: f64,
    pub y: f64,
}

impl CollisionArea {
    pub fn new(x: f64, y: f64) -> Self {
        CollisionArea { x, y }
    }
}

/// An axis-aligned box in world coordinates.
///
/// Overlap is strict: boxes that merely touch along an edge do not
/// intersect, so an object resting flush against a wall is legal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub bottom_left: Vec2,
    pub top_right: Vec2,
    pub rigid: bool,
}

impl CollisionBox {
    pub fn new(bottom_left: Vec2, top_right: Vec2, rigid: bool) -> Self {
        CollisionBox {
            bottom_left,
            top_right,
            rigid,
        }
    }

    /// Box of `area` placed with its lower-left corner at `position`.
    pub fn from_area(position: Vec2, area: CollisionArea, rigid: bool) -> Self {
        CollisionBox {
            bottom_left: position,
            top_right: position + Vec2::new(area.x, area.y),
            rigid,
        }
    }

    /// A copy shifted by `offset`.
    pub fn translate(&self, offset: Vec2) -> CollisionBox {
        CollisionBox {
            bottom_left: self.bottom_left + offset,
            top_right: self.top_right + offset,
            rigid: self.rigid,
        }
    }

    pub fn overlaps_on_x(&self, other: &CollisionBox) -> bool {
        self.top_right.x.min(other.top_right.x) > self.bottom_left.x.max(other.bottom_left.x)
    }

    pub fn overlaps_on_y(&self, other: &CollisionBox) -> bool {
        self.top_right.y.min(other.top_right.y) > self.bottom_left.y.max(other.bottom_left.y)
    }

    pub fn intersects(&self, other: &CollisionBox) -> bool {
        self.overlaps_on_x(other) && self.overlaps_on_y(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -4.0);

        assert_eq!(a + b, Vec2::new(4.0, -2.0));
        assert_eq!(a - b, Vec2::new(-2.0, 6.0));
        assert_eq!(a * 2.5, Vec2::new(2.5, 5.0));
    }

    #[test]
    fn test_vector_length() {
        assert_approx_eq!(Vec2::new(3.0, 4.0).length(), 5.0, 1e-12);
        assert_eq!(Vec2::ZERO.length(), 0.0);
    }

    #[test]
    fn test_unit_vector() {
        let unit = Vec2::new(3.0, 4.0).unit();
        assert_approx_eq!(unit.x, 0.6, 1e-12);
        assert_approx_eq!(unit.y, 0.8, 1e-12);
        assert_approx_eq!(unit.length(), 1.0, 1e-12);
    }

    #[test]
    fn test_unit_of_zero_vector_is_zero() {
        assert_eq!(Vec2::ZERO.unit(), Vec2::ZERO);
    }

    #[test]
    fn test_box_from_area() {
        let b = CollisionBox::from_area(Vec2::new(1.0, 2.0), CollisionArea::new(0.9, 0.9), true);
        assert_eq!(b.bottom_left, Vec2::new(1.0, 2.0));
        assert_eq!(b.top_right, Vec2::new(1.9, 2.9));
        assert!(b.rigid);
    }

    #[test]
    fn test_box_translate() {
        let b = CollisionBox::from_area(Vec2::ZERO, CollisionArea::new(1.0, 1.0), true);
        let moved = b.translate(Vec2::new(2.0, -1.0));
        assert_eq!(moved.bottom_left, Vec2::new(2.0, -1.0));
        assert_eq!(moved.top_right, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_box_overlap() {
        let a = CollisionBox::from_area(Vec2::ZERO, CollisionArea::new(2.0, 2.0), true);
        let b = CollisionBox::from_area(Vec2::new(1.0, 1.0), CollisionArea::new(2.0, 2.0), true);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_box_exact_touch_is_not_overlap() {
        let a = CollisionBox::from_area(Vec2::ZERO, CollisionArea::new(2.0, 2.0), true);
        let b = CollisionBox::from_area(Vec2::new(2.0, 0.0), CollisionArea::new(2.0, 2.0), true);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_box_overlap_single_axis_only() {
        let a = CollisionBox::from_area(Vec2::ZERO, CollisionArea::new(2.0, 2.0), true);
        let b = CollisionBox::from_area(Vec2::new(1.0, 5.0), CollisionArea::new(2.0, 2.0), true);
        assert!(a.overlaps_on_x(&b));
        assert!(!a.overlaps_on_y(&b));
        assert!(!a.intersects(&b));
    }
}
