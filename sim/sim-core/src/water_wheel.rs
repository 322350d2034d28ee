//! Paddle wheel propulsion.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
use sim_types::labels::{Axis, WATER, scalar_key, vector_key, vector_keys};
use sim_types::{BoatState, Result, SimError, Wrench};

use crate::frames::BodyFrame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Paddle direction below which a paddle counts as level with the surface.
const LEVEL_EPSILON: f64 = 1e-12;

/// A paddle wheel spinning about the body y axis at a fixed rate.
///
/// Paddles are flat plates of `paddle_width × paddle_length` reaching from
/// `radius − paddle_length` to `radius` out of the hub. Paddle `k` sits at
/// phase `gamma + 2πk/paddle_count`; phase zero points straight down in the
/// body frame and a positive `phase_rate` sweeps the lowest paddle aft, which
/// pushes the hull forward along +x.
///
/// Each submerged paddle feels pressure drag `½·ρ·C_d·A·v_n²` along its
/// normal, where `A` is the wetted part of the paddle and `v_n` the normal
/// component of the paddle velocity relative to the water, evaluated at the
/// middle of the wetted span.
///
/// The phase is stored in the state as `gamma__<name>` and advanced by
/// `phase_rate·dt` every step before the paddles are evaluated. The rate is
/// written to `gammadot__<name>` for the record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaterWheel {
    /// Contribution name.
    pub name: String,
    /// Distance from the hub to the paddle tips (m).
    pub radius: f64,
    /// Radial length of each paddle (m).
    pub paddle_length: f64,
    /// Width of each paddle along the axle (m).
    pub paddle_width: f64,
    /// Number of evenly spaced paddles.
    pub paddle_count: usize,
    /// Pressure drag coefficient of a flat paddle.
    pub drag_coefficient: f64,
    /// Hub position in the body frame (m).
    pub hub_offset: Vector3<f64>,
    /// Spin rate about the body y axis (rad/s).
    pub phase_rate: f64,
}

impl WaterWheel {
    /// Create a wheel with its hub at the body origin, a flat-plate drag
    /// coefficient of 1 and no spin.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        radius: f64,
        paddle_length: f64,
        paddle_width: f64,
        paddle_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            radius,
            paddle_length,
            paddle_width,
            paddle_count,
            drag_coefficient: 1.0,
            hub_offset: Vector3::zeros(),
            phase_rate: 0.0,
        }
    }

    /// Set the drag coefficient.
    #[must_use]
    pub fn with_drag_coefficient(mut self, drag_coefficient: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    /// Set the hub position in the body frame.
    #[must_use]
    pub fn with_hub_offset(mut self, hub_offset: Vector3<f64>) -> Self {
        self.hub_offset = hub_offset;
        self
    }

    /// Set the spin rate.
    #[must_use]
    pub fn with_phase_rate(mut self, phase_rate: f64) -> Self {
        self.phase_rate = phase_rate;
        self
    }

    fn phase_key(&self) -> String {
        scalar_key("gamma", &self.name)
    }
}

/// Range of paddle radii below the water line, if any.
fn submerged_span(hub_z: f64, dir_z: f64, inner: f64, outer: f64, water_z: f64) -> Option<(f64, f64)> {
    let (lo, hi) = if dir_z.abs() < LEVEL_EPSILON {
        if hub_z < water_z {
            (inner, outer)
        } else {
            return None;
        }
    } else {
        let crossing = (water_z - hub_z) / dir_z;
        if dir_z < 0.0 {
            (inner.max(crossing), outer)
        } else {
            (inner, outer.min(crossing))
        }
    };
    (hi > lo).then_some((lo, hi))
}

impl crate::ForceGenerator for WaterWheel {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_state_labels(&self) -> Vec<String> {
        let mut labels = vec![
            self.phase_key(),
            scalar_key("rho", WATER),
            vector_key("r", Axis::Z, WATER),
        ];
        labels.extend(vector_keys("v", WATER));
        labels
    }

    fn validate(&self) -> Result<()> {
        if self.paddle_count == 0 {
            return Err(SimError::invalid_config(format!(
                "water wheel {} has no paddles",
                self.name
            )));
        }
        if !(self.paddle_length > 0.0 && self.paddle_length <= self.radius) {
            return Err(SimError::invalid_config(format!(
                "water wheel {} needs 0 < paddle_length <= radius",
                self.name
            )));
        }
        if self.paddle_width <= 0.0 || !self.paddle_width.is_finite() {
            return Err(SimError::invalid_config(format!(
                "water wheel {} needs a positive paddle width",
                self.name
            )));
        }
        Ok(())
    }

    fn compute(&self, state: &mut BoatState, dt: f64) -> Result<Wrench> {
        let rho = state.labels.get(&scalar_key("rho", WATER))?;
        let water_z = state.labels.get(&vector_key("r", Axis::Z, WATER))?;
        let water_velocity = state.labels.get_vector("v", WATER)?;
        let gamma = state.labels.get(&self.phase_key())? + self.phase_rate * dt;
        state.labels.insert(self.phase_key(), gamma);
        state
            .labels
            .insert(scalar_key("gammadot", &self.name), self.phase_rate);

        let frame = BodyFrame::from_state(state);
        let omega = frame.body_to_world_vector(&state.body.omega);
        let com = frame.com_world();
        let hub = frame.body_to_world_point(&Point3::from(self.hub_offset));
        let inner = self.radius - self.paddle_length;

        let mut total = Wrench::zero();
        for k in 0..self.paddle_count {
            let phi = gamma + TAU * k as f64 / self.paddle_count as f64;
            let (sin, cos) = phi.sin_cos();
            let direction = Vector3::new(-sin, 0.0, -cos);
            let normal = Vector3::new(-cos, 0.0, sin);

            let direction_w = frame.body_to_world_vector(&direction);
            let Some((s0, s1)) = submerged_span(hub.z, direction_w.z, inner, self.radius, water_z)
            else {
                continue;
            };
            let s = 0.5 * (s0 + s1);
            let area = self.paddle_width * (s1 - s0);
            let point = hub + direction_w * s;

            let normal_w = frame.body_to_world_vector(&normal);
            let spin = normal_w * (self.phase_rate * s);
            let velocity = state.body.v + omega.cross(&(point - com)) + spin;
            let v_n = (velocity - water_velocity).dot(&normal_w);

            let force = normal_w * (-0.5 * rho * self.drag_coefficient * area * v_n * v_n.abs());
            total.force += force;
            total.torque += frame.torque_about_com(&point, &force);
        }
        Ok(total)
    }
}
