//! Oriented plane.

use nalgebra::{Point3, Vector3};

/// A plane through `point` with unit `normal`.
///
/// The positive side is the side the normal points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// Unit normal.
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    ///
    /// Returns `None` for a zero or non-finite normal.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        Some(Self {
            point,
            normal: normal / norm,
        })
    }

    /// Horizontal plane at height `z` whose positive side is below it.
    ///
    /// This is the water surface as seen by a slicer keeping the submerged
    /// half-space.
    #[must_use]
    pub fn below(z: f64) -> Self {
        Self {
            point: Point3::new(0.0, 0.0, z),
            normal: -Vector3::z(),
        }
    }

    /// Signed distance, positive on the side the normal points to.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Orthogonal projection onto the plane.
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }

    /// Point where segment `a`-`b` crosses the plane, given the endpoint
    /// signed distances `da` and `db` of opposite sign.
    #[inline]
    #[must_use]
    pub fn edge_crossing(a: &Point3<f64>, b: &Point3<f64>, da: f64, db: f64) -> Point3<f64> {
        let t = da / (da - db);
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_is_normalized() {
        let plane = Plane::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(plane.map(|p| p.normal), Some(Vector3::z()));
    }

    #[test]
    fn zero_normal_rejected() {
        assert!(Plane::new(Point3::origin(), Vector3::zeros()).is_none());
        assert!(Plane::new(Point3::origin(), Vector3::new(f64::NAN, 0.0, 1.0)).is_none());
    }

    #[test]
    fn below_is_positive_underwater() {
        let water = Plane::below(1.5);
        assert_relative_eq!(water.signed_distance(&Point3::new(3.0, -2.0, 0.5)), 1.0);
        assert_relative_eq!(water.signed_distance(&Point3::new(0.0, 0.0, 2.0)), -0.5);
    }

    #[test]
    fn projection_lands_on_plane() {
        let plane = Plane::new(Point3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 1.0, 0.0));
        let plane = plane.unwrap_or_else(|| Plane::below(0.0));
        let p = plane.project(&Point3::new(5.0, -2.0, 7.0));
        assert_relative_eq!(plane.signed_distance(&p), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn edge_crossing_interpolates() {
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(0.0, 0.0, -3.0);
        let water = Plane::below(0.0);
        let x = Plane::edge_crossing(&a, &b, water.signed_distance(&a), water.signed_distance(&b));
        assert_relative_eq!(x, Point3::origin(), epsilon = 1e-12);
    }
}
