//! Ray queries over the node array.
//!
//! Both queries walk the tree with an explicit stack in pre-order, left child
//! before right, so skewed trees cannot exhaust the call stack.

use rayon::prelude::*;

use super::Bvh;
use crate::intersect::{intersect_triangle, occludes};
use crate::ray::{Hit, Ray};

/// Typical depth is logarithmic; the stack grows past this only on skewed trees.
const STACK_HINT: usize = 64;

impl Bvh {
    /// Closest hit along the ray within `[t_min, t_max]`.
    ///
    /// Boxes entered beyond the closest hit found so far are skipped.
    pub fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = ray.t_max;

        let mut stack = Vec::with_capacity(STACK_HINT);
        stack.push(0usize);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if ray.intersect_aabb(&node.aabb, closest_t).is_none() {
                continue;
            }

            if node.is_leaf() {
                for tri in &self.triangles[node.triangle_range()] {
                    if let Some(hit) = intersect_triangle(tri, ray, self.cull_mode) {
                        if closest.map_or(true, |c| hit.t < c.t) {
                            closest_t = hit.t;
                            closest = Some(hit);
                        }
                    }
                }
            } else {
                stack.push(node.right_child());
                stack.push(node.left_child);
            }
        }

        closest
    }

    /// True if any triangle blocks the ray within `[t_min, t_max]`.
    ///
    /// Returns on the first blocking triangle.
    pub fn any_hit(&self, ray: &Ray) -> bool {
        let mut stack = Vec::with_capacity(STACK_HINT);
        stack.push(0usize);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if ray.intersect_aabb(&node.aabb, ray.t_max).is_none() {
                continue;
            }

            if node.is_leaf() {
                if self.triangles[node.triangle_range()]
                    .iter()
                    .any(|tri| occludes(tri, ray, self.cull_mode))
                {
                    return true;
                }
            } else {
                stack.push(node.right_child());
                stack.push(node.left_child);
            }
        }

        false
    }

    /// Closest hit for each ray, traced in parallel.
    pub fn closest_hits(&self, rays: &[Ray]) -> Vec<Option<Hit>> {
        rays.par_iter().map(|ray| self.closest_hit(ray)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::Triangle;
    use meshray_math::{Point3, Vec3};

    /// Quadratic spacing along X, which unbalances the candidate planes.
    fn skewed_triangles(count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|i| {
                let x = (i * i) as f64;
                Triangle::new(
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(x + 0.5, 0.0, 0.0),
                    Point3::new(x, 0.5, 0.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_every_triangle_reachable() {
        let triangles = skewed_triangles(400);
        let bvh = Bvh::build(&triangles).unwrap();
        for tri in &triangles {
            let origin = Point3::new(tri.v0.x + 0.1, 0.1, 1.0);
            let ray = Ray::new(origin, Vec3::new(0.0, 0.0, -1.0));
            let hit = bvh.closest_hit(&ray).expect("every triangle is reachable");
            assert_eq!(hit.t, 1.0);
            assert!(bvh.any_hit(&ray));
        }
    }

    #[test]
    fn test_miss_everything() {
        let bvh = Bvh::build(&skewed_triangles(50)).unwrap();
        let ray = Ray::new(Point3::new(-10.0, 5.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.closest_hit(&ray).is_none());
        assert!(!bvh.any_hit(&ray));
    }

    #[test]
    fn test_empty_batch() {
        let bvh = Bvh::build(&skewed_triangles(5)).unwrap();
        assert!(bvh.closest_hits(&[]).is_empty());
    }
}
