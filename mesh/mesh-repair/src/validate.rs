//! Mesh validation.

use std::fmt;

use mesh_types::IndexedMesh;

use crate::adjacency::MeshAdjacency;
use crate::error::{RepairError, RepairResult};

/// Faces below this area count as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Summary of a mesh's topological health.
#[derive(Debug, Clone, Default)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of distinct edges.
    pub edge_count: usize,
    /// Edges with a single adjacent face.
    pub boundary_edge_count: usize,
    /// Edges with more than two adjacent faces.
    pub non_manifold_edge_count: usize,
    /// Faces with (near) zero area.
    pub degenerate_face_count: usize,
    /// No boundary edges.
    pub is_watertight: bool,
    /// No non-manifold edges.
    pub is_manifold: bool,
    /// Negative signed volume.
    pub is_inside_out: bool,
}

impl MeshReport {
    /// Closed, manifold and outward-wound.
    #[must_use]
    pub fn is_closed_solid(&self) -> bool {
        self.is_watertight && self.is_manifold && !self.is_inside_out
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} verts, {} faces, {} edges ({} boundary, {} non-manifold, {} degenerate faces)",
            self.vertex_count,
            self.face_count,
            self.edge_count,
            self.boundary_edge_count,
            self.non_manifold_edge_count,
            self.degenerate_face_count
        )
    }
}

/// Validate a mesh and report its issues.
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::validate_mesh;
///
/// let tri = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
/// let report = validate_mesh(&tri);
/// assert_eq!(report.boundary_edge_count, 3);
/// assert!(!report.is_watertight);
/// ```
#[must_use]
pub fn validate_mesh(mesh: &IndexedMesh) -> MeshReport {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let degenerate_face_count = mesh
        .faces
        .iter()
        .filter(|&&[a, b, c]| {
            let v0 = mesh.vertices[a as usize].position;
            let v1 = mesh.vertices[b as usize].position;
            let v2 = mesh.vertices[c as usize].position;
            (v1 - v0).cross(&(v2 - v0)).norm() * 0.5 < DEGENERATE_AREA
        })
        .count();

    MeshReport {
        vertex_count: mesh.vertices.len(),
        face_count: mesh.faces.len(),
        edge_count: adjacency.edge_count(),
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        degenerate_face_count,
        is_watertight: adjacency.is_watertight(),
        is_manifold: adjacency.is_manifold(),
        is_inside_out: !mesh.faces.is_empty() && mesh.is_inside_out(),
    }
}

/// Check that a mesh can be used as a closed solid.
///
/// Face indices are bounds-checked first so later passes can index freely.
///
/// # Errors
///
/// - [`RepairError::EmptyMesh`] if there are no faces
/// - [`RepairError::InvalidIndex`] for out-of-range indices
/// - [`RepairError::NotWatertight`] if any edge is open
/// - [`RepairError::NonManifold`] if any edge has more than two faces
pub fn ensure_closed(mesh: &IndexedMesh) -> RepairResult<MeshReport> {
    if mesh.faces.is_empty() || mesh.vertices.is_empty() {
        return Err(RepairError::EmptyMesh);
    }

    let vertex_count = mesh.vertices.len();
    if let Some(&index) = mesh
        .faces
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(RepairError::InvalidIndex {
            index,
            vertex_count,
        });
    }

    let report = validate_mesh(mesh);
    if !report.is_watertight {
        return Err(RepairError::NotWatertight {
            boundary_edges: report.boundary_edge_count,
        });
    }
    if !report.is_manifold {
        return Err(RepairError::NonManifold {
            edges: report.non_manifold_edge_count,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    #[test]
    fn cube_is_closed_solid() {
        let report = validate_mesh(&unit_cube());
        assert!(report.is_closed_solid());
        assert_eq!(report.degenerate_face_count, 0);
        assert_eq!(report.edge_count, 18);
    }

    #[test]
    fn flipped_cube_is_inside_out() {
        let mut cube = unit_cube();
        cube.flip_normals();
        let report = validate_mesh(&cube);
        assert!(report.is_watertight);
        assert!(report.is_inside_out);
        assert!(!report.is_closed_solid());
    }

    #[test]
    fn open_box_is_rejected() {
        let mut cube = unit_cube();
        cube.faces.truncate(10);
        match ensure_closed(&cube) {
            Err(RepairError::NotWatertight { boundary_edges }) => assert_eq!(boundary_edges, 4),
            other => panic!("expected NotWatertight, got {other:?}"),
        }
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(
            ensure_closed(&IndexedMesh::new()),
            Err(RepairError::EmptyMesh)
        ));
    }

    #[test]
    fn bad_index_is_rejected() {
        let mut cube = unit_cube();
        cube.faces.push([0, 1, 42]);
        assert!(matches!(
            ensure_closed(&cube),
            Err(RepairError::InvalidIndex { index: 42, .. })
        ));
    }

    #[test]
    fn report_display_mentions_counts() {
        let text = validate_mesh(&unit_cube()).to_string();
        assert!(text.contains("12 faces"));
    }
}
