//! Axis-aligned bounding boxes.

use meshray_math::{Point3, Vec3};

use crate::triangle::Triangle;

/// Axis-aligned bounding box in 3D.
///
/// A freshly created box is empty (`min = +inf`, `max = -inf`) and becomes
/// valid after the first [`grow`](Aabb::grow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True until a point has been added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand to include a point.
    #[inline]
    pub fn grow(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Expand to include all three vertices of a triangle.
    #[inline]
    pub fn grow_triangle(&mut self, tri: &Triangle) {
        self.grow(&tri.v0);
        self.grow(&tri.v1);
        self.grow(&tri.v2);
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Edge lengths.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half the surface area: `ex*ey + ey*ez + ez*ex`.
    ///
    /// Only meaningful for relative cost comparisons. Empty boxes report 0.
    #[inline]
    pub fn half_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.extent();
        e.x * e.y + e.y * e.z + e.z * e.x
    }

    /// Test whether a point lies inside or on the boundary.
    pub fn contains_point(&self, p: &Point3) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] <= self.max[axis])
    }

    /// Test whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.is_empty() || (self.contains_point(&other.min) && self.contains_point(&other.max))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box() {
        let b = Aabb::empty();
        assert!(b.is_empty());
        assert_eq!(b.half_area(), 0.0);
    }

    #[test]
    fn test_grow_keeps_min_below_max() {
        let mut b = Aabb::empty();
        b.grow(&Point3::new(3.0, -1.0, 2.0));
        b.grow(&Point3::new(-2.0, 4.0, 2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Point3::new(-2.0, -1.0, 2.0));
        assert_eq!(b.max, Point3::new(3.0, 4.0, 2.0));
    }

    #[test]
    fn test_half_area() {
        let b = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        // 1*2 + 2*3 + 3*1
        assert_eq!(b.half_area(), 11.0);
    }

    #[test]
    fn test_flat_box_has_area() {
        let b = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 0.0));
        assert_eq!(b.half_area(), 6.0);
    }

    #[test]
    fn test_union_and_contains() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(2.0, -1.0, 0.5), Point3::new(3.0, 0.0, 4.0));
        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert!(!a.contains(&b));
        assert!(a.contains(&Aabb::empty()));
    }

    #[test]
    fn test_grow_triangle() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, -1.0),
        );
        let mut b = Aabb::empty();
        b.grow_triangle(&tri);
        assert_eq!(b.min, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(b.max, Point3::new(1.0, 1.0, 0.0));
    }
}
