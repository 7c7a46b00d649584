//! Tree statistics for debugging and tuning.

use serde::{Deserialize, Serialize};

use super::Bvh;

/// Shape summary of a built BVH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BvhStats {
    /// Triangles stored.
    pub triangle_count: usize,
    /// Nodes in use.
    pub node_count: usize,
    /// Nodes holding triangles.
    pub leaf_count: usize,
    /// Nodes holding children.
    pub internal_count: usize,
    /// Edges on the longest root-to-leaf path (0 for a lone root leaf).
    pub max_depth: usize,
    /// Fewest triangles in any leaf.
    pub min_leaf_triangles: usize,
    /// Most triangles in any leaf.
    pub max_leaf_triangles: usize,
}

impl Bvh {
    /// Walk the tree and summarize its shape.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            triangle_count: self.triangles.len(),
            node_count: self.nodes.len(),
            leaf_count: 0,
            internal_count: 0,
            max_depth: 0,
            min_leaf_triangles: usize::MAX,
            max_leaf_triangles: 0,
        };

        let mut stack = vec![(0usize, 0usize)];
        while let Some((node_idx, depth)) = stack.pop() {
            let node = &self.nodes[node_idx];
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
                stats.min_leaf_triangles = stats.min_leaf_triangles.min(node.triangle_count);
                stats.max_leaf_triangles = stats.max_leaf_triangles.max(node.triangle_count);
            } else {
                stats.internal_count += 1;
                stack.push((node.right_child(), depth + 1));
                stack.push((node.left_child, depth + 1));
            }
        }

        stats
    }
}
