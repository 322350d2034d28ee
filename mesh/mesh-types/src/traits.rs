//! Read-only mesh access shared by the slicing and simulation crates.

use crate::Triangle;

/// Counts and resolved triangles of a face-indexed mesh.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// A mesh without faces encloses nothing, whatever its vertices.
    fn is_empty(&self) -> bool {
        self.face_count() == 0
    }

    /// Triangle for a face index, `None` if out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Every face with its corner positions resolved.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}
