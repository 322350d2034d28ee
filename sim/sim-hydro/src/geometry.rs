//! The solid geometry the mesh generators operate on.

use mesh_repair::MeshAdjacency;
use mesh_slice::{SliceError, SliceParams, slice_half_space};
use mesh_transform::{Plane, Transform3D};
use mesh_types::{IndexedMesh, MeshTopology, Triangle};
use nalgebra::{Isometry3, Point3, Vector3};

/// A closed solid that can be placed, cut by a plane and measured.
///
/// Generators keep an immutable template and work on a placed copy each
/// step, so implementations only need to be cheap to clone.
pub trait SolidGeometry: Clone + Send + Sync {
    /// Error produced by [`SolidGeometry::slice_by_plane`].
    type Error: std::error::Error;

    /// True if the solid has no faces.
    fn is_empty(&self) -> bool;

    /// True if every edge is shared by exactly two faces.
    fn is_watertight(&self) -> bool;

    /// Number of edges used by a single face.
    fn boundary_edge_count(&self) -> usize;

    /// Move the solid by a rigid placement.
    fn apply_rigid_transform(&mut self, placement: &Isometry3<f64>);

    /// The part on the side `normal` points to, optionally closed with cap
    /// faces on the plane.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable plane or broken topology.
    fn slice_by_plane(
        &self,
        origin: &Point3<f64>,
        normal: &Vector3<f64>,
        cap: bool,
    ) -> Result<Self, Self::Error>;

    /// Enclosed volume.
    fn volume(&self) -> f64;

    /// Volumetric centroid, `None` when the enclosed volume vanishes.
    fn centroid(&self) -> Option<Point3<f64>>;

    /// Surface triangles with outward winding.
    fn surface_triangles(&self) -> Vec<Triangle>;
}

impl SolidGeometry for IndexedMesh {
    type Error = SliceError;

    fn is_empty(&self) -> bool {
        MeshTopology::is_empty(self)
    }

    fn is_watertight(&self) -> bool {
        !self.faces.is_empty() && MeshAdjacency::build(&self.faces).is_watertight()
    }

    fn boundary_edge_count(&self) -> usize {
        MeshAdjacency::build(&self.faces).boundary_edge_count()
    }

    fn apply_rigid_transform(&mut self, placement: &Isometry3<f64>) {
        Transform3D::from_isometry(placement).apply_in_place(self);
    }

    fn slice_by_plane(
        &self,
        origin: &Point3<f64>,
        normal: &Vector3<f64>,
        cap: bool,
    ) -> Result<Self, SliceError> {
        let plane =
            Plane::new(*origin, *normal).ok_or(SliceError::InvalidPlane([normal.x, normal.y, normal.z]))?;
        let slice = slice_half_space(self, &plane, &SliceParams::default().with_cap(cap))?;
        Ok(slice.mesh)
    }

    fn volume(&self) -> f64 {
        Self::volume(self)
    }

    fn centroid(&self) -> Option<Point3<f64>> {
        self.volume_centroid()
    }

    fn surface_triangles(&self) -> Vec<Triangle> {
        MeshTopology::triangles(self).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_cube;
    use nalgebra::{Translation3, UnitQuaternion};

    #[test]
    fn cube_is_a_closed_solid() {
        let cube = unit_cube();
        assert!(cube.is_watertight());
        assert_eq!(cube.boundary_edge_count(), 0);
        assert!(!SolidGeometry::is_empty(&cube));
        assert_relative_eq!(SolidGeometry::volume(&cube), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_is_not_watertight() {
        let empty = IndexedMesh::new();
        assert!(SolidGeometry::is_empty(&empty));
        assert!(!empty.is_watertight());
    }

    #[test]
    fn rigid_transform_moves_centroid() {
        let mut cube = unit_cube();
        let placement = Isometry3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_scaled_axis(Vector3::new(0.0, 0.0, 0.7)),
        );
        let expected = placement * Point3::new(0.5, 0.5, 0.5);
        cube.apply_rigid_transform(&placement);
        assert_relative_eq!(cube.centroid().unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(SolidGeometry::volume(&cube), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn half_cube_below_water() {
        let cube = unit_cube();
        let below = cube
            .slice_by_plane(&Point3::new(0.0, 0.0, 0.5), &-Vector3::z(), true)
            .unwrap();
        assert!(below.is_watertight());
        assert_relative_eq!(SolidGeometry::volume(&below), 0.5, epsilon = 1e-12);
        assert_relative_eq!(below.centroid().unwrap().z, 0.25, epsilon = 1e-12);

        let open = cube
            .slice_by_plane(&Point3::new(0.0, 0.0, 0.5), &-Vector3::z(), false)
            .unwrap();
        assert!(!open.is_watertight());
        assert!(open.surface_triangles().len() < below.surface_triangles().len());
    }

    #[test]
    fn zero_normal_is_rejected() {
        let err = unit_cube().slice_by_plane(&Point3::origin(), &Vector3::zeros(), true);
        assert!(matches!(err, Err(SliceError::InvalidPlane(_))));
    }
}
