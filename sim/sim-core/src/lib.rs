//! Core dynamics engine for a rigid hull.
//!
//! This crate provides the force pipeline, the Newton-Euler solve, time
//! integration and the simulation loop. It builds on [`sim_types`] for the
//! data structures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  Orchestrates: generators → totals → solve → snapshot        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ForceGenerator                           │
//! │  ConstantForce, SimpleBodyDrag, WaterWheel, mesh models      │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   RigidBodyIntegrator                        │
//! │  Block-diagonal Newton-Euler, Euler bootstrap, Verlet       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layer 0 Crate
//!
//! No rendering or engine dependencies. Mesh-based generators live in
//! `sim-hydro`, which implements [`ForceGenerator`] on top of this crate.
//!
//! # Quick Start
//!
//! ```
//! use sim_core::{Simulation, SimpleBodyDrag, WaterWheel};
//! use sim_types::{BoatState, BodyKinematics, MassProperties, Vector3};
//!
//! let state = BoatState::new(
//!     BodyKinematics::default(),
//!     MassProperties::principal(50.0, Vector3::new(1e3, 1e3, 1e3)),
//! )
//! .with_labels([
//!     ("rho__water", 1000.0),
//!     ("r_z__water", 0.0),
//!     ("v_x__water", 0.0),
//!     ("v_y__water", 0.0),
//!     ("v_z__water", 0.0),
//!     ("gamma__wheel", 0.0),
//! ]);
//!
//! let mut sim = Simulation::builder(state)
//!     .generator(WaterWheel::new("wheel", 0.5, 0.2, 0.3, 8).with_phase_rate(3.0))
//!     .generator(SimpleBodyDrag::new("drag", 1.0, 0.5))
//!     .build()
//!     .unwrap();
//!
//! sim.simulate(1.0, 0.01).unwrap();
//!
//! let table = sim.history().to_table();
//! assert_eq!(table.rows.len(), 100);
//! assert!(table.column("force_x__wheel").is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/sim-core/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
)]

mod drag;
pub mod frames;
mod generator;
mod history;
pub mod integrators;
mod simulation;
mod water_wheel;

pub use drag::SimpleBodyDrag;
pub use frames::{BodyFrame, rotation_from_axis_angle};
pub use generator::{ConstantForce, ForceGenerator};
pub use history::{History, HistoryTable};
pub use integrators::{Accelerations, RigidBodyIntegrator};
pub use simulation::{Simulation, SimulationBuilder};
pub use water_wheel::WaterWheel;

// Re-export key types from sim-types for convenience
pub use sim_types::{
    BoatState, BodyKinematics, LabeledState, MassProperties, Result, SimError, SimulationConfig,
    Wrench,
};
