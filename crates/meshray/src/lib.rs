#![warn(missing_docs)]

//! Bounding volume hierarchy for ray-triangle queries.
//!
//! Triangles are copied into a flat, index-linked tree built with the surface
//! area heuristic. Queries return the closest hit along a ray or answer whether
//! anything blocks it, honoring a per-tree face culling mode.
//!
//! # Architecture
//!
//! - [`Aabb`] - Axis-aligned bounding box and its surface-area cost
//! - [`Triangle`] - World-space triangle with centroid, normal and material
//! - [`Ray`] / [`Hit`] - Ray with a `[t_min, t_max]` interval and its hit record
//! - [`intersect`] - Möller-Trumbore triangle test with face culling
//! - [`bvh`] - SAH builder, traversal and tree statistics
//! - [`mesh`] - Indexed meshes placed by a transform, owning their BVH
//!
//! # Example
//!
//! ```ignore
//! use meshray::{Bvh, Ray, Triangle};
//! use meshray_math::{Point3, Vec3};
//!
//! let tri = Triangle::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//! let bvh = Bvh::build(&[tri])?;
//!
//! let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = bvh.closest_hit(&ray);
//! ```

pub mod aabb;
pub mod bvh;
pub mod error;
pub mod intersect;
pub mod mesh;
pub mod ray;
pub mod settings;
pub mod triangle;

pub use aabb::Aabb;
pub use bvh::{Bvh, BvhNode, BvhStats};
pub use error::{BvhError, Result};
pub use intersect::{intersect_triangle, intersect_triangles, occludes};
pub use mesh::{MeshInstance, TriangleMesh};
pub use ray::{Hit, Ray};
pub use settings::BuildSettings;
pub use triangle::{CullMode, Triangle};

pub use meshray_math;
