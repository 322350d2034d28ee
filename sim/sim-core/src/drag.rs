//! Linear whole-body drag.

use sim_types::labels::{WATER, vector_keys};
use sim_types::{BoatState, Result, Wrench};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drag proportional to the hull velocity relative to the water:
/// `F = −C_d·A·(v_boat − v_water)`, with no torque.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimpleBodyDrag {
    /// Contribution name.
    pub name: String,
    /// Drag coefficient.
    pub drag_coefficient: f64,
    /// Reference area (m²).
    pub area: f64,
}

impl SimpleBodyDrag {
    /// Create a drag model.
    #[must_use]
    pub fn new(name: impl Into<String>, drag_coefficient: f64, area: f64) -> Self {
        Self {
            name: name.into(),
            drag_coefficient,
            area,
        }
    }
}

impl crate::ForceGenerator for SimpleBodyDrag {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_state_labels(&self) -> Vec<String> {
        vector_keys("v", WATER).into()
    }

    fn compute(&self, state: &mut BoatState, _dt: f64) -> Result<Wrench> {
        let water = state.labels.get_vector("v", WATER)?;
        let relative = state.body.v - water;
        Ok(Wrench::force(
            -self.drag_coefficient * self.area * relative,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ForceGenerator;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use sim_types::{BodyKinematics, MassProperties, SimError};

    fn state(v_boat: Vector3<f64>, v_water: Vector3<f64>) -> BoatState {
        let mut state = BoatState::new(
            BodyKinematics::default().with_velocity(v_boat),
            MassProperties::default(),
        );
        state.labels.insert_vector("v", WATER, &v_water);
        state
    }

    #[test]
    fn opposes_relative_velocity() {
        let drag = SimpleBodyDrag::new("drag", 0.5, 2.0);
        let mut s = state(Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let w = drag.compute(&mut s, 0.01).unwrap();
        assert_relative_eq!(w.force, Vector3::new(-2.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(w.torque.norm(), 0.0);
    }

    #[test]
    fn no_force_when_moving_with_the_water() {
        let drag = SimpleBodyDrag::new("drag", 1.0, 1.0);
        let v = Vector3::new(1.0, -1.0, 0.5);
        let mut s = state(v, v);
        assert_relative_eq!(drag.compute(&mut s, 0.01).unwrap().force.norm(), 0.0);
    }

    #[test]
    fn requires_water_velocity() {
        let drag = SimpleBodyDrag::new("drag", 1.0, 1.0);
        assert_eq!(
            drag.required_state_labels(),
            ["v_x__water", "v_y__water", "v_z__water"]
        );
        let mut s = BoatState::default();
        assert!(matches!(
            drag.compute(&mut s, 0.01),
            Err(SimError::MissingKey { .. })
        ));
    }
}
