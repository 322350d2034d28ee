//! Newton-Euler solve and time integration for the hull.
//!
//! # Acceleration
//!
//! The generalised mass matrix is block diagonal:
//!
//! ```text
//! M = | m·I₃   0    |
//!     |  0    I_cm  |
//! ```
//!
//! The coupling blocks that a center-of-mass offset would introduce are kept
//! at zero. Accelerations solve `M·[a; α] = [F; T − ω × (I_cm·ω)]`.
//!
//! # Position update
//!
//! The first step of a run has no previous position, so it bootstraps with
//! an explicit Euler step:
//!
//! ```text
//! v' = v + a·dt
//! r' = r + v·dt + ½·a·dt²
//! ```
//!
//! Every later step uses central differences against the previous snapshot:
//!
//! ```text
//! r' = 2·r − r_prev + a·dt²
//! v' = (r' − r_prev) / (2·dt)
//! ```
//!
//! Orientation and angular velocity follow the same rules with `theta`,
//! `omega` and `alpha`.
//!
//! # Example
//!
//! ```
//! use sim_core::RigidBodyIntegrator;
//! use sim_types::{BoatState, Vector3, Wrench};
//!
//! let integrator = RigidBodyIntegrator::new();
//! let mut state = BoatState::default();
//! state.total = Wrench::force(Vector3::new(0.0, 0.0, -9.81));
//!
//! integrator.solve(&mut state).unwrap();
//! let next = integrator.advance(&state, None, 0.1);
//!
//! assert!(next.body.v.z < 0.0);
//! assert!((next.time - 0.1).abs() < 1e-12);
//! ```

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};
use sim_types::{BoatState, MassProperties, Result, SimError, Wrench};

/// Linear and angular acceleration of the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accelerations {
    /// Linear acceleration (m/s²).
    pub linear: Vector3<f64>,
    /// Angular acceleration (rad/s²).
    pub angular: Vector3<f64>,
}

/// Converts the total wrench into accelerations and advances kinematics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RigidBodyIntegrator;

impl RigidBodyIntegrator {
    /// Create an integrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Labels the integrator reads from the state's labeled namespace.
    ///
    /// Everything it needs lives in the typed groups of [`BoatState`].
    #[must_use]
    pub fn required_state_labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Generalised mass matrix of the hull.
    #[must_use]
    pub fn mass_matrix(mass: &MassProperties) -> Matrix6<f64> {
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(Matrix3::identity() * mass.mass));
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&mass.inertia);
        m
    }

    /// Gyroscopic bias `ω × (I·ω)`.
    #[must_use]
    pub fn gyroscopic_bias(inertia: &Matrix3<f64>, omega: &Vector3<f64>) -> Vector3<f64> {
        omega.cross(&(inertia * omega))
    }

    /// Solve Newton-Euler for the accelerations produced by `total`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SingularMassMatrix`] if the mass matrix cannot be
    /// inverted.
    pub fn accelerations(
        mass: &MassProperties,
        omega: &Vector3<f64>,
        total: &Wrench,
    ) -> Result<Accelerations> {
        let inverse = Self::mass_matrix(mass)
            .try_inverse()
            .ok_or(SimError::SingularMassMatrix)?;

        let bias = Self::gyroscopic_bias(&mass.inertia, omega);
        let torque = total.torque - bias;
        let rhs = Vector6::new(
            total.force.x,
            total.force.y,
            total.force.z,
            torque.x,
            torque.y,
            torque.z,
        );
        let solution = inverse * rhs;
        if solution.iter().any(|x| !x.is_finite()) {
            return Err(SimError::SingularMassMatrix);
        }

        Ok(Accelerations {
            linear: solution.fixed_rows::<3>(0).into_owned(),
            angular: solution.fixed_rows::<3>(3).into_owned(),
        })
    }

    /// Write the accelerations for the state's total wrench into `a` and
    /// `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SingularMassMatrix`] if the mass matrix cannot be
    /// inverted.
    pub fn solve(&self, state: &mut BoatState) -> Result<()> {
        let acc = Self::accelerations(&state.mass, &state.body.omega, &state.total)?;
        state.body.a = acc.linear;
        state.body.alpha = acc.angular;
        Ok(())
    }

    /// The state one timestep after `current`.
    ///
    /// `previous` is the snapshot completed before `current`; `None` selects
    /// the bootstrap step. Accelerations in `current` must already be solved.
    #[must_use]
    pub fn advance(&self, current: &BoatState, previous: Option<&BoatState>, dt: f64) -> BoatState {
        let mut next = current.clone();
        let body = &current.body;
        match previous {
            None => {
                next.body.v = body.v + body.a * dt;
                next.body.r = body.r + body.v * dt + body.a * (0.5 * dt * dt);
                next.body.omega = body.omega + body.alpha * dt;
                next.body.theta = body.theta + body.omega * dt + body.alpha * (0.5 * dt * dt);
            }
            Some(prev) => {
                let (r, v) = central_difference(&body.r, &prev.body.r, &body.a, dt);
                let (theta, omega) =
                    central_difference(&body.theta, &prev.body.theta, &body.alpha, dt);
                next.body.r = r;
                next.body.v = v;
                next.body.theta = theta;
                next.body.omega = omega;
            }
        }
        next.time = current.time + dt;
        next
    }
}

fn central_difference(
    x: &Vector3<f64>,
    x_prev: &Vector3<f64>,
    acc: &Vector3<f64>,
    dt: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let x_next = 2.0 * x - x_prev + acc * (dt * dt);
    let v_next = (x_next - x_prev) / (2.0 * dt);
    (x_next, v_next)
}
