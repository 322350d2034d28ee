//! Half-space slicing for closed meshes.
//!
//! Cuts a triangle mesh with a plane, keeps the part on the side the plane
//! normal points to, and optionally closes the cut with planar cap faces so
//! the result is again a closed solid whose volume and centroid can be
//! measured.
//!
//! # Features
//!
//! - **Clipping**: triangles straddling the plane are clipped, with cut
//!   points shared between neighbouring faces
//! - **Capping**: boundary loops on the plane are closed with fan
//!   triangles (exact for volume and centroid, holes included)
//! - **Diagnostics**: loop and open-chain counts on the result
//!
//! # Layer 0 Crate
//!
//! No engine dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_transform::Plane;
//! use mesh_slice::{slice_half_space, SliceParams};
//!
//! // Keep everything below z = 0.25
//! let cut = slice_half_space(&unit_cube(), &Plane::below(0.25), &SliceParams::default())?;
//! assert!(cut.is_closed());
//! assert!((cut.mesh.volume() - 0.25).abs() < 1e-12);
//! # Ok::<(), mesh_slice::SliceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod cap;
mod error;
mod params;
mod result;
mod slicer;

pub use error::{SliceError, SliceResult};
pub use params::SliceParams;
pub use result::HalfSpaceSlice;
pub use slicer::slice_half_space;
