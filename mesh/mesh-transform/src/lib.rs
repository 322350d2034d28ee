//! Mesh transformation.
//!
//! - [`Transform3D`]: 4x4 affine transforms (translate, rotate, scale),
//!   composable with [`Transform3D::then`], built from axis-angle rotation
//!   vectors or [`nalgebra::Isometry3`] placements
//! - [`Plane`]: oriented plane with signed distance
//!
//! # Layer 0
//!
//! No engine dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_transform::Transform3D;
//! use mesh_types::unit_cube;
//!
//! let lifted = Transform3D::translation(0.0, 0.0, 2.0).apply_to_mesh(&unit_cube());
//! assert!((lifted.volume() - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod plane;
mod transform;

pub use plane::Plane;
pub use transform::{ROTATION_EPSILON, Transform3D};
