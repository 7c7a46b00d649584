//! SAH-based BVH builder.
//!
//! Each node tries a fixed number of evenly spaced split planes per axis and
//! keeps the cheapest one if it beats leaving the node as a leaf. Triangles are
//! partitioned in place, so every subtree owns a contiguous range of the
//! triangle array.

use tracing::{trace, warn};

use super::BvhNode;
use crate::aabb::Aabb;
use crate::error::{BvhError, Result};
use crate::settings::BuildSettings;
use crate::triangle::Triangle;

/// Cheapest split found for a node.
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    axis: usize,
    position: f64,
    cost: f64,
}

/// Per-build state. The node counter never outlives a single build.
struct BvhBuilder<'a> {
    nodes: Vec<BvhNode>,
    triangles: Vec<Triangle>,
    nodes_used: usize,
    settings: &'a BuildSettings,
}

/// Build the node array and the reordered triangle array.
///
/// Returns the nodes truncated to the number actually used.
pub(super) fn build(
    triangles: &[Triangle],
    settings: &BuildSettings,
) -> Result<(Vec<BvhNode>, Vec<Triangle>)> {
    if triangles.is_empty() {
        warn!("refusing to build a BVH over an empty triangle set");
        return Err(BvhError::EmptyMesh);
    }
    if let Err(err) = settings.validate() {
        warn!(%err, "refusing to build a BVH");
        return Err(err);
    }

    let count = triangles.len();
    let owned = triangles
        .iter()
        .map(|tri| Triangle {
            centroid: tri.compute_centroid(),
            ..*tri
        })
        .collect();

    let mut builder = BvhBuilder {
        nodes: vec![BvhNode::default(); 2 * count - 1],
        triangles: owned,
        nodes_used: 1,
        settings,
    };

    builder.nodes[0] = BvhNode {
        aabb: Aabb::empty(),
        left_child: 0,
        first_triangle: 0,
        triangle_count: count,
    };
    builder.update_bounds(0);

    // Popping the left child first reproduces recursive left-then-right
    // numbering without growing the call stack.
    let mut stack = vec![0usize];
    while let Some(node_idx) = stack.pop() {
        if let Some(left) = builder.subdivide(node_idx) {
            stack.push(left + 1);
            stack.push(left);
        }
    }

    let BvhBuilder {
        mut nodes,
        triangles,
        nodes_used,
        ..
    } = builder;
    nodes.truncate(nodes_used);
    Ok((nodes, triangles))
}

impl BvhBuilder<'_> {
    /// Recompute a node's box from every vertex in its range.
    fn update_bounds(&mut self, node_idx: usize) {
        let range = self.nodes[node_idx].triangle_range();
        let mut aabb = Aabb::empty();
        for tri in &self.triangles[range] {
            aabb.grow_triangle(tri);
        }
        self.nodes[node_idx].aabb = aabb;
    }

    /// Split a node in two if the SAH says it pays off.
    ///
    /// Returns the index of the new left child, or `None` if the node stays a
    /// leaf.
    fn subdivide(&mut self, node_idx: usize) -> Option<usize> {
        let node = self.nodes[node_idx];
        let count = node.triangle_count;
        if count <= self.settings.max_leaf_triangles {
            return None;
        }

        let split = self.find_best_split(&node);
        let parent_cost = count as f64 * node.aabb.half_area();
        if parent_cost <= split.cost {
            return None;
        }

        let first = node.first_triangle;
        let left_count = partition(
            &mut self.triangles[node.triangle_range()],
            split.axis,
            split.position,
        );
        if left_count == 0 || left_count == count {
            trace!(node_idx, axis = split.axis, "split left one side empty; keeping leaf");
            return None;
        }

        let left = self.nodes_used;
        self.nodes_used += 2;

        self.nodes[left] = BvhNode {
            aabb: Aabb::empty(),
            left_child: 0,
            first_triangle: first,
            triangle_count: left_count,
        };
        self.nodes[left + 1] = BvhNode {
            aabb: Aabb::empty(),
            left_child: 0,
            first_triangle: first + left_count,
            triangle_count: count - left_count,
        };
        self.update_bounds(left);
        self.update_bounds(left + 1);

        let parent = &mut self.nodes[node_idx];
        parent.left_child = left;
        parent.triangle_count = 0;

        Some(left)
    }

    /// Scan the candidate planes axis by axis; ties keep the earliest.
    fn find_best_split(&self, node: &BvhNode) -> SplitCandidate {
        let candidates = self.settings.split_candidates_per_axis;
        let extent = node.aabb.extent();

        let mut best = SplitCandidate {
            axis: 0,
            position: 0.0,
            cost: f64::INFINITY,
        };

        for axis in 0..3 {
            for k in 1..=candidates {
                let offset = k as f64 / (candidates + 1) as f64;
                let position = node.aabb.min[axis] + extent[axis] * offset;
                let cost = self.evaluate_sah(node, axis, position);
                if cost < best.cost {
                    best = SplitCandidate {
                        axis,
                        position,
                        cost,
                    };
                }
            }
        }

        best
    }

    /// SAH cost of splitting `node` at `position` along `axis`.
    ///
    /// Triangles are bucketed by centroid; the side boxes cover their full
    /// geometry. A split leaving one side empty costs infinity.
    fn evaluate_sah(&self, node: &BvhNode, axis: usize, position: f64) -> f64 {
        let mut left_box = Aabb::empty();
        let mut right_box = Aabb::empty();
        let mut left_count = 0usize;
        let mut right_count = 0usize;

        for tri in &self.triangles[node.triangle_range()] {
            if tri.centroid[axis] < position {
                left_count += 1;
                left_box.grow_triangle(tri);
            } else {
                right_count += 1;
                right_box.grow_triangle(tri);
            }
        }

        if left_count == 0 || right_count == 0 {
            return f64::INFINITY;
        }
        left_count as f64 * left_box.half_area() + right_count as f64 * right_box.half_area()
    }
}

/// Move triangles with `centroid[axis] < position` to the front.
///
/// Returns how many went to the front. Order within each side is not kept.
fn partition(triangles: &mut [Triangle], axis: usize, position: f64) -> usize {
    let mut left = 0;
    let mut right = triangles.len();

    while left < right {
        if triangles[left].centroid[axis] < position {
            left += 1;
        } else {
            right -= 1;
            triangles.swap(left, right);
        }
    }

    left
}
