//! Triangle primitive stored inside the BVH.

use meshray_math::{Point3, Vec3};

/// Which triangle faces a ray may hit.
///
/// The front face is the side the winding-order normal `(v1 - v0) x (v2 - v0)`
/// points towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Both faces are hittable.
    #[default]
    NoCulling,
    /// Rays arriving at the back face pass through.
    BackFaceCulling,
    /// Rays arriving at the front face pass through.
    FrontFaceCulling,
}

/// A world-space triangle owned by a BVH.
///
/// This is a copy of the source mesh data, so reordering triangles during a
/// build never touches the mesh buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
    /// Mean of the three vertices.
    pub centroid: Point3,
    /// Flat face normal reported on hits.
    pub normal: Vec3,
    /// Material reported on hits.
    pub material_index: u32,
}

impl Triangle {
    /// Create a triangle whose normal follows the winding order.
    ///
    /// Degenerate triangles get a zero normal.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(0.0)
            .unwrap_or_else(Vec3::zeros);
        Self::with_normal(v0, v1, v2, normal)
    }

    /// Create a triangle with an explicit face normal.
    pub fn with_normal(v0: Point3, v1: Point3, v2: Point3, normal: Vec3) -> Self {
        let mut tri = Self {
            v0,
            v1,
            v2,
            centroid: Point3::origin(),
            normal,
            material_index: 0,
        };
        tri.centroid = tri.compute_centroid();
        tri
    }

    /// Arithmetic mean of the vertices.
    pub fn compute_centroid(&self) -> Point3 {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Set the material reported on hits.
    pub fn with_material(mut self, material_index: u32) -> Self {
        self.material_index = material_index;
        self
    }

    /// The three vertices in winding order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.v0, self.v1, self.v2]
    }
}
