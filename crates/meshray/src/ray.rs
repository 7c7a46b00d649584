//! Ray representation, hit record and the ray-box slab test.

use meshray_math::{Point2, Point3, Vec3};

use crate::aabb::Aabb;

/// A ray with a valid parameter interval `[t_min, t_max]`.
///
/// The direction is used as given; `t` is measured in multiples of it.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Smallest accepted parameter.
    pub t_min: f64,
    /// Largest accepted parameter.
    pub t_max: f64,
    /// Reciprocal of direction components. Zero components become infinities.
    inv_direction: Vec3,
    /// Per axis, 1 when the reciprocal is negative. Selects the near bound.
    sign: [usize; 3],
}

impl Ray {
    /// Create a ray valid over `[0, inf)`.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, 0.0, f64::INFINITY)
    }

    /// Create a ray valid over `[t_min, t_max]`.
    pub fn with_interval(origin: Point3, direction: Vec3, t_min: f64, t_max: f64) -> Self {
        let inv_direction = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            (inv_direction.x < 0.0) as usize,
            (inv_direction.y < 0.0) as usize,
            (inv_direction.z < 0.0) as usize,
        ];
        Self {
            origin,
            direction,
            t_min,
            t_max,
            inv_direction,
            sign,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Reciprocal direction used by the slab test.
    #[inline]
    pub fn inv_direction(&self) -> &Vec3 {
        &self.inv_direction
    }

    /// Intersect the ray's supporting line with a box using the slab method.
    ///
    /// Returns `(t_enter, t_exit)`, possibly with `t_exit < t_enter` when the
    /// line misses. Axis-parallel directions rely on the infinite reciprocal:
    /// an origin inside the slab yields `(-inf, inf)` for that axis, one
    /// outside yields an empty interval. An origin on a slab face gives
    /// `0 * inf = NaN` for that bound, which `max`/`min` drop, so the face
    /// counts as inside.
    #[inline]
    pub fn slab(&self, aabb: &Aabb) -> (f64, f64) {
        let bounds = [aabb.min, aabb.max];
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        for axis in 0..3 {
            let inv = self.inv_direction[axis];
            let near = (bounds[self.sign[axis]][axis] - self.origin[axis]) * inv;
            let far = (bounds[1 - self.sign[axis]][axis] - self.origin[axis]) * inv;
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
        }
        (t_enter, t_exit)
    }

    /// Test ray-AABB intersection, pruning boxes entered beyond `closest`.
    ///
    /// Returns the entry parameter when the box can still hold a hit.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb, closest: f64) -> Option<f64> {
        let (t_enter, t_exit) = self.slab(aabb);
        if t_exit < t_enter || t_exit <= 0.0 || t_enter > closest {
            None
        } else {
            Some(t_enter)
        }
    }
}

/// Result of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter along the ray where intersection occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Flat face normal of the triangle that was hit.
    pub normal: Vec3,
    /// Material of the triangle that was hit.
    pub material_index: u32,
    /// Barycentric weights of `v1` and `v2` at the hit.
    pub uv: Point2,
}
