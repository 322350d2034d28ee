//! Mesh validation and cleanup for solid hull meshes.
//!
//! This crate provides:
//! - Edge adjacency ([`MeshAdjacency`]) with boundary/non-manifold queries
//! - Validation reports ([`validate_mesh`], [`ensure_closed`])
//! - Vertex welding for triangle-soup input ([`weld_vertices`])
//! - Degenerate face and unreferenced vertex removal
//!
//! # Layer 0
//!
//! No engine dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_repair::{ensure_closed, validate_mesh};
//!
//! let cube = unit_cube();
//! let report = validate_mesh(&cube);
//! assert!(report.is_watertight);
//! assert!(ensure_closed(&cube).is_ok());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod adjacency;
mod error;
mod repair;
mod validate;

pub use adjacency::MeshAdjacency;
pub use error::{RepairError, RepairResult};
pub use repair::{
    RepairParams, RepairSummary, remove_degenerate_triangles, remove_unreferenced_vertices,
    repair_mesh, weld_vertices,
};
pub use validate::{MeshReport, ensure_closed, validate_mesh};
