//! Core types for boat hull dynamics.
//!
//! This crate provides the data the simulation crates exchange:
//!
//! - [`BoatState`] - Time, kinematics, mass properties, wrenches and labels
//! - [`LabeledState`] - Insertion-ordered named scalars
//! - [`Wrench`] - A force/torque pair
//! - [`SimulationConfig`] - Timestep and duration
//! - [`SimError`] - Every failure the simulation reports
//!
//! # Design Philosophy
//!
//! These types are **pure data**. Force models live in `sim-core` and
//! `sim-hydro`; this crate only defines what they read and write.
//!
//! # Coordinate System
//!
//! - X: forward
//! - Y: port
//! - Z: up
//! - Right-handed
//!
//! Forces are expressed in the world frame, torques about the center of mass
//! in the body frame. Orientation is an axis-angle vector.
//!
//! # Example
//!
//! ```
//! use sim_types::{BoatState, BodyKinematics, MassProperties, Vector3};
//!
//! let state = BoatState::new(
//!     BodyKinematics::at_rest(Vector3::new(0.0, 0.0, 0.5)),
//!     MassProperties::principal(100.0, Vector3::new(10.0, 20.0, 20.0)),
//! )
//! .with_label("rho__water", 1000.0);
//!
//! let flat = state.to_labels();
//! assert_eq!(flat.get("r_z__boat").unwrap(), 0.5);
//! assert_eq!(flat.get("rho__water").unwrap(), 1000.0);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-types/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod config;
mod error;
mod labeled;
pub mod labels;
mod state;

pub use config::{STANDARD_GRAVITY, SimulationConfig, step_count, validate_timestep};
pub use error::SimError;
pub use labeled::LabeledState;
pub use labels::{AXES, Axis};
pub use state::{BoatState, BodyKinematics, Contributions, FORCE, MassProperties, TORQUE, Wrench};

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix3, Point3, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
