//! Ray-triangle intersection (Moller-Trumbore).
//!
//! The visible-hit and occlusion variants share one solver so they always
//! agree on which faces block a ray.

use meshray_math::Point2;

use crate::ray::{Hit, Ray};
use crate::triangle::{CullMode, Triangle};

/// Determinants smaller than this in magnitude count as a ray parallel to the
/// triangle plane.
pub const DETERMINANT_EPSILON: f64 = 1e-8;

/// Solve for `(t, u, v)`, applying the cull policy and the ray interval.
///
/// Hits must lie strictly in front of the origin, `t > 0`, on top of
/// `t_min <= t <= t_max`. Box pruning rejects boxes with `t_exit <= 0`, and
/// this keeps a ray leaving a surface from hitting that surface at `t = 0`.
#[inline]
fn solve(tri: &Triangle, ray: &Ray, cull_mode: CullMode) -> Option<(f64, f64, f64)> {
    let e1 = tri.v1 - tri.v0;
    let e2 = tri.v2 - tri.v0;
    let p = ray.direction.cross(&e2);
    let det = e1.dot(&p);

    if det.abs() < DETERMINANT_EPSILON {
        return None;
    }

    // det > 0: the ray arrives at the front face.
    match cull_mode {
        CullMode::BackFaceCulling if det < 0.0 => return None,
        CullMode::FrontFaceCulling if det > 0.0 => return None,
        _ => {}
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - tri.v0;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    if t <= 0.0 || t < ray.t_min || t > ray.t_max {
        return None;
    }

    Some((t, u, v))
}

/// Intersect a ray with a single triangle.
pub fn intersect_triangle(tri: &Triangle, ray: &Ray, cull_mode: CullMode) -> Option<Hit> {
    solve(tri, ray, cull_mode).map(|(t, u, v)| Hit {
        t,
        point: ray.at(t),
        normal: tri.normal,
        material_index: tri.material_index,
        uv: Point2::new(u, v),
    })
}

/// Test whether a triangle blocks the ray, without building a hit record.
#[inline]
pub fn occludes(tri: &Triangle, ray: &Ray, cull_mode: CullMode) -> bool {
    solve(tri, ray, cull_mode).is_some()
}

/// Brute-force closest hit over a slice of triangles.
///
/// A later triangle replaces the current hit only when strictly closer.
pub fn intersect_triangles(triangles: &[Triangle], ray: &Ray, cull_mode: CullMode) -> Option<Hit> {
    let mut closest: Option<Hit> = None;
    for tri in triangles {
        if let Some(hit) = intersect_triangle(tri, ray, cull_mode) {
            if closest.map_or(true, |c| hit.t < c.t) {
                closest = Some(hit);
            }
        }
    }
    closest
}
