//! Bounding Volume Hierarchy for accelerated ray-triangle intersection.
//!
//! Nodes live in a flat array with index links. Root is node 0 and the two
//! children of an internal node are always stored as a contiguous pair, so
//! only the left child index is kept and the right child is `left_child + 1`.
//! Leaves reference a contiguous range of the BVH's own triangle array, which
//! the builder reorders in place.

mod build;
mod stats;
mod traverse;

pub use stats::BvhStats;

use std::ops::Range;

use tracing::debug;

use crate::aabb::Aabb;
use crate::error::Result;
use crate::settings::BuildSettings;
use crate::triangle::{CullMode, Triangle};

/// A node in the flat BVH array.
///
/// `triangle_count > 0` marks a leaf. `triangle_count == 0` marks an internal
/// node whose children sit at `left_child` and `left_child + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BvhNode {
    /// Tight bounds over every vertex in the node's triangle range.
    pub aabb: Aabb,
    /// Index of the left child. Only valid for internal nodes.
    pub left_child: usize,
    /// First triangle of the node's range.
    pub first_triangle: usize,
    /// Number of triangles in the range, zero for internal nodes.
    pub triangle_count: usize,
}

impl BvhNode {
    /// True when this node stores triangles directly.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.triangle_count > 0
    }

    /// Index of the right child. Only valid for internal nodes.
    #[inline]
    pub fn right_child(&self) -> usize {
        self.left_child + 1
    }

    /// Range into the BVH triangle array covered by this node.
    #[inline]
    pub fn triangle_range(&self) -> Range<usize> {
        self.first_triangle..self.first_triangle + self.triangle_count
    }
}

/// Bounding Volume Hierarchy over a set of world-space triangles.
///
/// The tree is bound to the geometry it was built from. Moving the source
/// mesh requires building a new one; there is no refit.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangles: Vec<Triangle>,
    cull_mode: CullMode,
}

impl Bvh {
    /// Build a BVH with default settings.
    ///
    /// The triangles are copied; the caller's slice is left untouched.
    pub fn build(triangles: &[Triangle]) -> Result<Self> {
        Self::build_with(triangles, &BuildSettings::default())
    }

    /// Build a BVH with explicit settings.
    #[tracing::instrument(skip_all, fields(tri_count = triangles.len()))]
    pub fn build_with(triangles: &[Triangle], settings: &BuildSettings) -> Result<Self> {
        let (nodes, triangles) = build::build(triangles, settings)?;
        let bvh = Self {
            nodes,
            triangles,
            cull_mode: CullMode::NoCulling,
        };

        let stats = bvh.stats();
        debug!(
            nodes = stats.node_count,
            leaves = stats.leaf_count,
            depth = stats.max_depth,
            max_leaf = stats.max_leaf_triangles,
            "built BVH"
        );

        Ok(bvh)
    }

    /// Use `cull_mode` for every query on this BVH.
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Change the cull mode. No rebuild is needed.
    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
    }

    /// Cull mode applied by queries.
    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Node by index.
    pub fn node(&self, index: usize) -> Option<&BvhNode> {
        self.nodes.get(index)
    }

    /// All nodes in use, root first.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Triangle by index into the reordered triangle array.
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// The reordered triangle array that leaves index into.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Bounds of the whole mesh (the root box).
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].aabb
    }
}
