//! Indexed meshes placed in the world by a transform.
//!
//! A [`MeshInstance`] keeps its geometry in object space and owns the BVH built
//! over the transformed triangles. Moving the instance drops the tree, and
//! queries refuse to run until [`MeshInstance::rebuild`] is called again.

use meshray_math::{Point3, Transform, Vec3};
use tracing::debug;

use crate::bvh::Bvh;
use crate::error::{BvhError, Result};
use crate::ray::{Hit, Ray};
use crate::settings::BuildSettings;
use crate::triangle::{CullMode, Triangle};

/// Indexed triangle mesh in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// One normal per face. Empty means normals follow the winding order.
    pub normals: Vec<Vec3>,
    /// Three indices per triangle into `positions`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Mesh whose face normals follow the winding order.
    pub fn new(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            indices,
        }
    }

    /// Attach explicit per-face normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    fn vertex(&self, index: u32) -> Result<Point3> {
        self.positions
            .get(index as usize)
            .copied()
            .ok_or(BvhError::IndexOutOfRange {
                index,
                len: self.positions.len(),
            })
    }

    fn validate(&self) -> Result<()> {
        if self.positions.is_empty() || self.indices.is_empty() {
            return Err(BvhError::EmptyMesh);
        }
        if self.indices.len() % 3 != 0 {
            return Err(BvhError::MalformedIndices(self.indices.len()));
        }
        let triangles = self.num_triangles();
        if !self.normals.is_empty() && self.normals.len() != triangles {
            return Err(BvhError::NormalCountMismatch {
                normals: self.normals.len(),
                triangles,
            });
        }
        Ok(())
    }
}

/// A mesh placed in the world, with its own BVH.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    mesh: TriangleMesh,
    transform: Transform,
    material_index: u32,
    cull_mode: CullMode,
    bvh: Option<Bvh>,
}

impl MeshInstance {
    /// Place `mesh` at the origin. No BVH exists until [`rebuild`](Self::rebuild).
    pub fn new(mesh: TriangleMesh, material_index: u32, cull_mode: CullMode) -> Self {
        Self {
            mesh,
            transform: Transform::identity(),
            material_index,
            cull_mode,
            bvh: None,
        }
    }

    /// Move the instance. The BVH is discarded.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.bvh = None;
    }

    /// Current cull mode.
    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Change which faces are hittable. Takes effect without a rebuild.
    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
        if let Some(bvh) = &mut self.bvh {
            bvh.set_cull_mode(cull_mode);
        }
    }

    /// The BVH from the last rebuild, if it is still current.
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// True when queries can run.
    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    /// Triangles in world space, tagged with the instance material.
    pub fn world_triangles(&self) -> Result<Vec<Triangle>> {
        self.mesh.validate()?;

        let mut triangles = Vec::with_capacity(self.mesh.num_triangles());
        for (face, idx) in self.mesh.indices.chunks_exact(3).enumerate() {
            let v0 = self.transform.apply_point(&self.mesh.vertex(idx[0])?);
            let v1 = self.transform.apply_point(&self.mesh.vertex(idx[1])?);
            let v2 = self.transform.apply_point(&self.mesh.vertex(idx[2])?);

            let tri = match self.mesh.normals.get(face) {
                Some(n) => {
                    let normal = self
                        .transform
                        .apply_normal(n)
                        .try_normalize(0.0)
                        .unwrap_or_else(Vec3::zeros);
                    Triangle::with_normal(v0, v1, v2, normal)
                }
                None => Triangle::new(v0, v1, v2),
            };
            triangles.push(tri.with_material(self.material_index));
        }

        Ok(triangles)
    }

    /// Rebuild the BVH from the current transform.
    pub fn rebuild(&mut self, settings: &BuildSettings) -> Result<()> {
        let triangles = self.world_triangles()?;
        let bvh = Bvh::build_with(&triangles, settings)?.with_cull_mode(self.cull_mode);
        debug!(
            triangles = triangles.len(),
            nodes = bvh.nodes().len(),
            "mesh instance rebuilt"
        );
        self.bvh = Some(bvh);
        Ok(())
    }

    /// Closest hit, or [`BvhError::StaleTree`] if the BVH needs a rebuild.
    pub fn closest_hit(&self, ray: &Ray) -> Result<Option<Hit>> {
        Ok(self.built()?.closest_hit(ray))
    }

    /// Whether anything blocks the ray, or [`BvhError::StaleTree`] if the BVH
    /// needs a rebuild.
    pub fn any_hit(&self, ray: &Ray) -> Result<bool> {
        Ok(self.built()?.any_hit(ray))
    }

    fn built(&self) -> Result<&Bvh> {
        self.bvh.as_ref().ok_or(BvhError::StaleTree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit square in the XY plane facing +Z.
    fn quad() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    fn down_ray(x: f64, y: f64) -> Ray {
        Ray::new(Point3::new(x, y, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_query_before_build_is_stale() {
        let instance = MeshInstance::new(quad(), 0, CullMode::NoCulling);
        assert!(!instance.is_built());
        assert!(matches!(
            instance.closest_hit(&down_ray(0.5, 0.5)),
            Err(BvhError::StaleTree)
        ));
        assert!(matches!(
            instance.any_hit(&down_ray(0.5, 0.5)),
            Err(BvhError::StaleTree)
        ));
    }

    #[test]
    fn test_transform_invalidates_tree() {
        let mut instance = MeshInstance::new(quad(), 0, CullMode::NoCulling);
        instance.rebuild(&BuildSettings::default()).unwrap();
        assert!(instance.any_hit(&down_ray(0.5, 0.5)).unwrap());

        instance.set_transform(Transform::translation(Vec3::new(10.0, 0.0, 0.0)));
        assert!(matches!(
            instance.closest_hit(&down_ray(10.5, 0.5)),
            Err(BvhError::StaleTree)
        ));
    }

    #[test]
    fn test_translated_mesh_hit_at_new_position() {
        let mut instance = MeshInstance::new(quad(), 4, CullMode::NoCulling);
        instance.set_transform(Transform::translation(Vec3::new(10.0, 0.0, 2.0)));
        instance.rebuild(&BuildSettings::default()).unwrap();

        assert!(instance.closest_hit(&down_ray(0.5, 0.5)).unwrap().is_none());

        let hit = instance.closest_hit(&down_ray(10.5, 0.5)).unwrap().unwrap();
        assert_relative_eq!(hit.t, 3.0);
        assert_relative_eq!(hit.point, Point3::new(10.5, 0.5, 2.0));
        assert_relative_eq!(hit.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(hit.material_index, 4);
    }

    #[test]
    fn test_scaled_normals_renormalized() {
        let mesh = quad().with_normals(vec![Vec3::new(0.0, 0.0, 1.0); 2]);
        let mut instance = MeshInstance::new(mesh, 0, CullMode::NoCulling);
        instance.set_transform(Transform::scale(Vec3::new(3.0, 3.0, 0.5)));
        for tri in instance.world_triangles().unwrap() {
            assert_relative_eq!(tri.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotated_normals_follow_transform() {
        let mut instance = MeshInstance::new(quad(), 0, CullMode::NoCulling);
        instance.set_transform(Transform::rotation_y(std::f64::consts::FRAC_PI_2));
        for tri in instance.world_triangles().unwrap() {
            assert_relative_eq!(tri.normal, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_mesh() {
        let instance = MeshInstance::new(TriangleMesh::default(), 0, CullMode::NoCulling);
        assert!(matches!(instance.world_triangles(), Err(BvhError::EmptyMesh)));
    }

    #[test]
    fn test_malformed_indices() {
        let mut mesh = quad();
        mesh.indices.pop();
        let mut instance = MeshInstance::new(mesh, 0, CullMode::NoCulling);
        assert!(matches!(
            instance.rebuild(&BuildSettings::default()),
            Err(BvhError::MalformedIndices(5))
        ));
        assert!(!instance.is_built());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut mesh = quad();
        mesh.indices[4] = 9;
        let instance = MeshInstance::new(mesh, 0, CullMode::NoCulling);
        assert!(matches!(
            instance.world_triangles(),
            Err(BvhError::IndexOutOfRange { index: 9, len: 4 })
        ));
    }

    #[test]
    fn test_normal_count_mismatch() {
        let mesh = quad().with_normals(vec![Vec3::z()]);
        let instance = MeshInstance::new(mesh, 0, CullMode::NoCulling);
        assert!(matches!(
            instance.world_triangles(),
            Err(BvhError::NormalCountMismatch {
                normals: 1,
                triangles: 2
            })
        ));
    }

    #[test]
    fn test_cull_mode_change_without_rebuild() {
        let mut instance = MeshInstance::new(quad(), 0, CullMode::NoCulling);
        instance.rebuild(&BuildSettings::default()).unwrap();

        // Looking up at the back face.
        let from_below = Ray::new(Point3::new(0.5, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(instance.any_hit(&from_below).unwrap());

        instance.set_cull_mode(CullMode::BackFaceCulling);
        assert_eq!(instance.cull_mode(), CullMode::BackFaceCulling);
        assert!(instance.is_built());
        assert!(!instance.any_hit(&from_below).unwrap());
        assert!(instance.any_hit(&down_ray(0.5, 0.5)).unwrap());

        instance.set_cull_mode(CullMode::FrontFaceCulling);
        assert!(instance.any_hit(&from_below).unwrap());
        assert!(!instance.any_hit(&down_ray(0.5, 0.5)).unwrap());
    }

    #[test]
    fn test_rebuild_logs() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();

        let mut instance = MeshInstance::new(quad(), 0, CullMode::NoCulling);
        instance.rebuild(&BuildSettings::default()).unwrap();
        assert_eq!(instance.bvh().map(|b| b.triangles().len()), Some(2));
    }
}
