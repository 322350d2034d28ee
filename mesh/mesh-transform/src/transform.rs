//! 3D transformation matrices.

use mesh_types::IndexedMesh;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// Rotation vectors no longer than this are treated as no rotation.
pub const ROTATION_EPSILON: f64 = 1e-9;

/// A 3D affine transformation stored as a 4x4 homogeneous matrix.
///
/// ```
/// use mesh_transform::Transform3D;
/// use mesh_types::{Point3, Vector3};
///
/// let spin = Transform3D::rotation_vector(Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
/// let moved = spin.then(&Transform3D::translation(1.0, 0.0, 0.0));
/// let p = moved.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for Transform3D {
    fn from(iso: Isometry3<f64>) -> Self {
        Self::from_isometry(&iso)
    }
}

impl Transform3D {
    /// Wrap a raw homogeneous matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(tx, ty, tz)`.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::from_translation(Vector3::new(tx, ty, tz))
    }

    /// Translation by a vector.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&v),
        }
    }

    /// Uniform scaling about the origin.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(factor),
        }
    }

    /// Rotation by `angle` radians about `axis` through the origin
    /// (Rodrigues' formula). Identity for a zero axis.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    // Single-char names: standard notation for the rotation formula
    #[allow(clippy::suboptimal_flops)]
    pub fn rotation_axis(axis: Vector3<f64>, angle: f64) -> Self {
        let norm = axis.norm();
        if norm < f64::EPSILON {
            return Self::identity();
        }

        let axis = axis / norm;
        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            t*x*x + c,     t*x*y - s*z,   t*x*z + s*y,   0.0,
            t*x*y + s*z,   t*y*y + c,     t*y*z - s*x,   0.0,
            t*x*z - s*y,   t*y*z + s*x,   t*z*z + c,     0.0,
            0.0,           0.0,           0.0,           1.0,
        );
        Self { matrix }
    }

    /// Rotation encoded as an axis-angle vector: direction is the axis,
    /// length the angle in radians.
    ///
    /// Vectors no longer than [`ROTATION_EPSILON`] give the identity.
    #[must_use]
    pub fn rotation_vector(theta: Vector3<f64>) -> Self {
        let angle = theta.norm();
        if angle <= ROTATION_EPSILON {
            return Self::identity();
        }
        Self::rotation_axis(theta / angle, angle)
    }

    /// Apply `inner` with `pivot` as its origin: translate by `-pivot`,
    /// apply, translate back.
    #[must_use]
    pub fn about_point(inner: &Self, pivot: &Point3<f64>) -> Self {
        Self::from_translation(-pivot.coords)
            .then(inner)
            .then(&Self::from_translation(pivot.coords))
    }

    /// Homogeneous matrix of a rigid placement.
    #[must_use]
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            matrix: iso.to_homogeneous(),
        }
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Compose: the result applies `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Inverse transformation, `None` if singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Transform a point (translation applies).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Transform a direction (translation ignored).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(vector)
    }

    /// Transformed copy of a mesh. Faces are unchanged, so winding (and
    /// the sign of the volume) is preserved for proper rigid motions.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let mut result = mesh.clone();
        self.apply_in_place(&mut result);
        result
    }

    /// Transform a mesh's vertices in place.
    pub fn apply_in_place(&self, mesh: &mut IndexedMesh) {
        for vertex in &mut mesh.vertices {
            vertex.position = self.transform_point(&vertex.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_cube;
    use nalgebra::{Translation3, UnitQuaternion};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = Transform3D::translation(10.0, 20.0, 30.0);
        assert_relative_eq!(
            t.transform_point(&Point3::new(1.0, 2.0, 3.0)),
            Point3::new(11.0, 22.0, 33.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            t.transform_vector(&Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(1.0, 2.0, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rotation_axis_quarter_turn() {
        let r = Transform3D::rotation_axis(Vector3::z(), FRAC_PI_2);
        assert_relative_eq!(r.transform_vector(&Vector3::x()), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn tiny_rotation_vector_is_identity() {
        let r = Transform3D::rotation_vector(Vector3::new(1e-10, 0.0, 0.0));
        assert_eq!(r, Transform3D::identity());
    }

    #[test]
    fn rotation_vector_matches_nalgebra() {
        let theta = Vector3::new(0.3, -0.7, 1.1);
        let ours = Transform3D::rotation_vector(theta);
        let theirs = Transform3D::from_isometry(&Isometry3::new(Vector3::zeros(), theta));
        assert_relative_eq!(ours.matrix(), theirs.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn about_point_keeps_pivot_fixed() {
        let pivot = Point3::new(0.5, 0.5, 0.5);
        let t = Transform3D::about_point(&Transform3D::rotation_axis(Vector3::x(), PI), &pivot);
        assert_relative_eq!(t.transform_point(&pivot), pivot, epsilon = 1e-12);
        assert_relative_eq!(
            t.transform_point(&Point3::new(0.5, 0.5, 1.0)),
            Point3::new(0.5, 0.5, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn inverse_round_trips() {
        let iso = Isometry3::from_parts(
            Translation3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let t = Transform3D::from(iso);
        let back = t.inverse().map(|inv| t.then(&inv));
        assert!(back.is_some());
        let p = Point3::new(3.0, 4.0, 5.0);
        let q = back.map_or(Point3::origin(), |b| b.transform_point(&p));
        assert_relative_eq!(q, p, epsilon = 1e-12);
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(Transform3D::uniform_scale(0.0).inverse().is_none());
    }

    #[test]
    fn rigid_motion_preserves_volume_sign() {
        let t = Transform3D::rotation_vector(Vector3::new(0.4, 0.4, -1.0))
            .then(&Transform3D::translation(5.0, 5.0, 5.0));
        let moved = t.apply_to_mesh(&unit_cube());
        assert_relative_eq!(moved.signed_volume(), 1.0, epsilon = 1e-10);
    }
}
