//! Triangle with resolved vertex positions.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!((tri.area() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Cross product of the two edges from `v0`.
    ///
    /// Direction follows the right-hand rule; magnitude is twice the area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, `None` for degenerate triangles.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        if len > f64::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Triangle area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Area centroid (average of the three corners).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Signed volume of the tetrahedron spanned by this triangle and `apex`.
    ///
    /// Positive when `apex` lies behind the face (on the side opposite the
    /// normal).
    #[inline]
    #[must_use]
    pub fn signed_tet_volume(&self, apex: &Point3<f64>) -> f64 {
        let a = self.v0 - apex;
        let b = self.v1 - apex;
        let c = self.v2 - apex;
        a.dot(&b.cross(&c)) / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        )
    }

    #[test]
    fn normal_follows_winding() {
        let n = right_triangle().normal().unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(n, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_has_no_normal() {
        let tri = Triangle::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0));
        assert!(tri.normal().is_none());
        assert_relative_eq!(tri.area(), 0.0);
    }

    #[test]
    fn tet_volume_sign() {
        let tri = right_triangle();
        // Apex below a +z facing triangle
        assert!(tri.signed_tet_volume(&Point3::new(0.0, 0.0, -3.0)) > 0.0);
        assert!(tri.signed_tet_volume(&Point3::new(0.0, 0.0, 3.0)) < 0.0);
        assert_relative_eq!(tri.signed_tet_volume(&Point3::new(0.0, 0.0, -3.0)), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn centroid_is_corner_average() {
        let c = right_triangle().centroid();
        assert_relative_eq!(c, Point3::new(2.0 / 3.0, 2.0 / 3.0, 0.0), epsilon = 1e-12);
    }
}
