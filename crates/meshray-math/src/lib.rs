#![warn(missing_docs)]

//! Math types for meshray.
//!
//! Thin aliases over nalgebra plus the affine [`Transform`] that carries an
//! object-space mesh into world space before its BVH is built.

use nalgebra::{Matrix3, Matrix4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A point in 2D space (barycentric coordinates on a hit).
pub type Point2 = nalgebra::Point2<f64>;

/// A 4x4 affine transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying homogeneous matrix (column vectors).
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `offset`.
    pub fn translation(offset: Vec3) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Non-uniform scale.
    pub fn scale(factors: Vec3) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&factors),
        }
    }

    /// Rotation given as a scaled axis: the direction is the axis and the
    /// length is the angle in radians.
    pub fn rotation(scaled_axis: Vec3) -> Self {
        Self {
            matrix: Matrix4::new_rotation(scaled_axis),
        }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation(Vec3::y() * angle)
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// Transform a normal with the inverse transpose of the linear part.
    ///
    /// The result is not renormalized. A singular linear part leaves the
    /// normal untouched.
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        let linear: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        match linear.try_inverse() {
            Some(inv) => inv.transpose() * n,
            None => *n,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
