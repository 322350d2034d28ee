//! Slice result types.

use mesh_types::{IndexedMesh, MeshTopology};

/// The kept part of a sliced mesh.
#[derive(Debug, Clone, Default)]
pub struct HalfSpaceSlice {
    /// Clipped surface followed by cap faces.
    pub mesh: IndexedMesh,

    /// Index of the first cap face in `mesh.faces`. Equal to the face count
    /// when nothing was capped.
    pub cap_face_start: usize,

    /// Closed boundary loops that were capped.
    pub loop_count: usize,

    /// Boundary chains that did not close into a loop and could not be
    /// capped. Non-zero means the input was not watertight along the cut.
    pub open_chain_count: usize,
}

impl HalfSpaceSlice {
    /// True if nothing of the mesh lies in the kept half-space.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// True if every cut boundary was closed by a cap.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.open_chain_count == 0
    }

    /// Faces of the original surface (clipped).
    #[must_use]
    pub fn surface_faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces[..self.cap_face_start]
    }

    /// Cap faces lying on the cutting plane.
    #[must_use]
    pub fn cap_faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces[self.cap_face_start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_closed() {
        let slice = HalfSpaceSlice::default();
        assert!(slice.is_empty());
        assert!(slice.is_closed());
        assert!(slice.cap_faces().is_empty());
        assert!(slice.surface_faces().is_empty());
    }
}
