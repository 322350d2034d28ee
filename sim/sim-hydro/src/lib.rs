//! Mesh-based hydrostatics and hydrodynamics for a rigid hull.
//!
//! Generators in this crate work on a closed hull solid given in body
//! coordinates. Each step they place a working copy at the hull pose, cut it
//! at the water surface and integrate over the result:
//!
//! - [`MeshBuoyancy`]: Archimedes force at the submerged centroid
//! - [`MeshGravity`]: weight at the hull centroid
//! - [`MeshBodyDrag`]: pressure drag over the wetted faces
//!
//! The solid is abstracted by [`SolidGeometry`], implemented for
//! [`IndexedMesh`](mesh_types::IndexedMesh). Hull files are read with
//! [`load_solid`].
//!
//! [`ScenarioConfig`] bundles initial values, generators and run settings,
//! and can be read from JSON with the `serde` feature.
//!
//! # Example
//!
//! ```
//! use mesh_types::box_mesh;
//! use sim_core::Simulation;
//! use sim_hydro::{MeshBuoyancy, MeshGravity};
//! use sim_types::{BoatState, BodyKinematics, MassProperties, Point3, Vector3};
//!
//! // 2 × 1 × 0.5 m pontoon of 250 kg floats with its keel 0.125 m deep.
//! let hull = box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25));
//! let state = BoatState::new(
//!     BodyKinematics::at_rest(Vector3::new(0.0, 0.0, 0.125)),
//!     MassProperties::solid_box(250.0, Vector3::new(2.0, 1.0, 0.5)),
//! )
//! .with_labels([("rho__water", 1000.0), ("r_z__water", 0.0)]);
//!
//! let mut sim = Simulation::builder(state)
//!     .generator(MeshGravity::new("gravity", &hull).unwrap())
//!     .generator(MeshBuoyancy::new("buoyancy", hull).unwrap())
//!     .build()
//!     .unwrap();
//!
//! sim.simulate(0.1, 0.01).unwrap();
//! assert!(sim.state().body.r.z.abs() < 0.2);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-hydro/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error conditions are on the generator types
)]

mod body_drag;
mod buoyancy;
mod geometry;
mod gravity;
mod loader;
mod scenario;

pub use body_drag::MeshBodyDrag;
pub use buoyancy::MeshBuoyancy;
pub use geometry::SolidGeometry;
pub use gravity::MeshGravity;
pub use loader::load_solid;
pub use scenario::{GeneratorConfig, ScenarioConfig};
