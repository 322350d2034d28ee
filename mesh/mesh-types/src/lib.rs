//! Core mesh types for hull geometry.
//!
//! This crate provides the foundational types the simulation's geometry
//! layer is built on:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`box_mesh`] - Closed box solids for tests and simple pontoons
//!
//! # Layer 0 Crate
//!
//! No rendering or engine dependencies. Only `nalgebra` (and optionally
//! `serde`).
//!
//! # Units
//!
//! Unit-agnostic. The physics crates use SI units (meters), so volumes are
//! cubic meters.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. Face winding is **counter-clockwise (CCW) when viewed
//! from outside**; normals point outward by the right-hand rule. Volume and
//! centroid computations rely on this.
//!
//! # Example
//!
//! ```
//! use mesh_types::{unit_cube, MeshTopology};
//!
//! let cube = unit_cube();
//! assert_eq!(cube.face_count(), 12);
//! assert!((cube.volume() - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use mesh::{IndexedMesh, box_mesh, unit_cube};
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
