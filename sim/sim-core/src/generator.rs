//! The force generator interface and the constant generator.

use nalgebra::Vector3;
use sim_types::{BoatState, Result, Wrench};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A source of force and torque acting on the hull.
///
/// Generators hold only immutable parameters. Anything that evolves over a
/// run (a wheel phase, a diagnostic) is stored in the state's labels under a
/// key owned by the generator, e.g. `gamma__<name>`.
pub trait ForceGenerator: Send + Sync {
    /// Name the contribution is recorded under. Must be unique within a
    /// simulation.
    fn name(&self) -> &str;

    /// Labels that must be present in [`BoatState::labels`] before a step.
    fn required_state_labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Check the generator's own parameters. Runs before the first step.
    ///
    /// # Errors
    ///
    /// Returns [`sim_types::SimError::InvalidConfig`] for unusable parameters.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Compute the wrench acting on the hull in `state`.
    ///
    /// May write auxiliary labels owned by this generator, but never another
    /// generator's keys.
    ///
    /// # Errors
    ///
    /// Returns [`sim_types::SimError::MissingKey`] if a required label is
    /// absent, or a model-specific error.
    fn compute(&self, state: &mut BoatState, dt: f64) -> Result<Wrench>;

    /// Compute the wrench and record it under [`ForceGenerator::name`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ForceGenerator::compute`].
    fn apply(&self, state: &mut BoatState, dt: f64) -> Result<()> {
        let wrench = self.compute(state, dt)?;
        state.record_contribution(self.name(), wrench);
        Ok(())
    }
}

/// A fixed force and torque.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantForce {
    /// Contribution name.
    pub name: String,
    /// World-frame force (N).
    pub force: Vector3<f64>,
    /// Torque about the center of mass (N·m).
    pub torque: Vector3<f64>,
}

impl ConstantForce {
    /// Create a constant wrench.
    #[must_use]
    pub fn new(name: impl Into<String>, force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            force,
            torque,
        }
    }

    /// A pure force.
    #[must_use]
    pub fn force(name: impl Into<String>, force: Vector3<f64>) -> Self {
        Self::new(name, force, Vector3::zeros())
    }
}

impl ForceGenerator for ConstantForce {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, _state: &mut BoatState, _dt: f64) -> Result<Wrench> {
        Ok(Wrench::new(self.force, self.torque))
    }
}
