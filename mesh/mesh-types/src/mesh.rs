//! Indexed triangle mesh.

use crate::{MeshTopology, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Volumes below this magnitude have no meaningful centroid.
const MIN_CENTROID_VOLUME: f64 = 1e-15;

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, faces referencing vertices by
/// index. A hull solid uses **counter-clockwise winding** viewed from outside,
/// which is what makes [`IndexedMesh::signed_volume`] positive.
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with room for the given counts.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat `xyz` coordinates and triangle indices.
    ///
    /// Trailing values that do not fill a whole vertex or face are ignored.
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        Self {
            vertices: positions
                .chunks_exact(3)
                .map(|p| Vertex::from_coords(p[0], p[1], p[2]))
                .collect(),
            faces: indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]).collect(),
        }
    }

    /// Mean vertex position, used as the apex of the tetrahedron fan.
    ///
    /// Any point gives the same volume for a closed surface; one inside the
    /// hull keeps the fan terms small when the hull sits far from the origin.
    #[allow(clippy::cast_precision_loss)]
    fn fan_apex(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum: Vector3<f64> = self.vertices.iter().map(|v| v.position.coords).sum();
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Signed enclosed volume by the divergence theorem.
    ///
    /// Positive for a closed mesh with outward winding, negative when inside
    /// out. Meaningless for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let apex = self.fan_apex();
        self.triangles().map(|tri| tri.signed_tet_volume(&apex)).sum()
    }

    /// Absolute enclosed volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// True if the faces wind inward.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Centroid of the enclosed solid, i.e. the center of buoyancy when the
    /// whole mesh is submerged.
    ///
    /// Returns `None` when the enclosed volume (nearly) vanishes.
    ///
    /// ```
    /// use mesh_types::{unit_cube, Point3};
    ///
    /// let c = unit_cube().volume_centroid().unwrap_or_else(Point3::origin);
    /// assert!((c - Point3::new(0.5, 0.5, 0.5)).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn volume_centroid(&self) -> Option<Point3<f64>> {
        let apex = self.fan_apex();
        let (total, moment) = self.triangles().fold(
            (0.0, Vector3::zeros()),
            |(total, moment), tri| {
                let v = tri.signed_tet_volume(&apex);
                let tet_centroid = (tri.v0.coords + tri.v1.coords + tri.v2.coords + apex.coords) * 0.25;
                (total + v, moment + tet_centroid * v)
            },
        );

        (total.abs() >= MIN_CENTROID_VOLUME).then(|| Point3::from(moment / total))
    }

    /// Reverse the winding of every face.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    fn triangle_at(&self, [i0, i1, i2]: [u32; 3]) -> Triangle {
        Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).map(|&f| self.triangle_at(f))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().map(|&f| self.triangle_at(f))
    }
}

/// Axis-aligned box solid spanning `min`..`max`, wound outward.
///
/// ```
/// use mesh_types::{box_mesh, Point3};
///
/// let pontoon = box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25));
/// assert!((pontoon.volume() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> IndexedMesh {
    // Corner i takes x from bit 0, y from bit 1, z from bit 2.
    let vertices = (0..8)
        .map(|i: u32| {
            Vertex::from_coords(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        })
        .collect();

    let faces = vec![
        [0, 2, 3], [0, 3, 1], // keel, -z
        [4, 5, 7], [4, 7, 6], // deck, +z
        [0, 1, 5], [0, 5, 4], // starboard, -y
        [2, 6, 7], [2, 7, 3], // port, +y
        [0, 4, 6], [0, 6, 2], // stern, -x
        [1, 3, 7], [1, 7, 5], // bow, +x
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// Cube from (0,0,0) to (1,1,1) with outward-facing normals.
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn faces_decide_emptiness() {
        let mut mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh.is_empty());

        mesh.faces.push([0, 0, 0]);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn from_raw_drops_partial_entries() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0], &[0, 0, 0, 1]);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn box_faces_point_outward() {
        let pontoon = box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25));
        let center = Point3::origin();
        for tri in pontoon.triangles() {
            let n = tri.normal().unwrap_or_else(Vector3::zeros);
            assert!(n.dot(&(tri.centroid() - center)) > 0.0);
        }
        assert_relative_eq!(pontoon.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn flipped_cube_inside_out() {
        let mut cube = unit_cube();
        assert!(!cube.is_inside_out());
        cube.flip_normals();
        assert!(cube.is_inside_out());
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn centroid_far_from_origin() {
        let hull = box_mesh(Point3::new(1e4, -3.0, 7.0), Point3::new(1e4 + 4.0, -1.0, 8.0));
        let c = hull.volume_centroid().unwrap_or_else(Point3::origin);
        assert_relative_eq!(c, Point3::new(1e4 + 2.0, -2.0, 7.5), epsilon = 1e-9);
        assert_relative_eq!(hull.volume(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn centroid_of_tetrahedron() {
        let mesh = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            &[0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        );
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0, epsilon = 1e-12);
        let c = mesh.volume_centroid().unwrap_or_else(Point3::origin);
        assert_relative_eq!(c, Point3::new(0.25, 0.25, 0.25), epsilon = 1e-12);
    }

    #[test]
    fn flat_patch_has_no_centroid() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
        assert!(mesh.volume_centroid().is_none());
    }
}
