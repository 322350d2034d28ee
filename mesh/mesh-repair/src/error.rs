//! Error types for mesh validation.

use thiserror::Error;

/// Result type for repair and validation operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors raised when a mesh cannot serve as a closed solid.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Mesh is empty (no vertices or faces).
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// The invalid index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Mesh has open edges.
    #[error("mesh is not watertight: {boundary_edges} boundary edges")]
    NotWatertight {
        /// Number of edges with a single adjacent face.
        boundary_edges: usize,
    },

    /// Mesh has edges shared by more than two faces.
    #[error("mesh is not manifold: {edges} edges with more than two faces")]
    NonManifold {
        /// Number of non-manifold edges.
        edges: usize,
    },
}
