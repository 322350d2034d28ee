//! Declarative scenarios: initial labels, generators and run settings.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sim_core::{ConstantForce, ForceGenerator, History, SimpleBodyDrag, Simulation, WaterWheel};
use sim_types::{BoatState, LabeledState, Result, SimError, SimulationConfig};
use tracing::info;

use crate::body_drag::MeshBodyDrag;
use crate::buoyancy::MeshBuoyancy;
use crate::gravity::MeshGravity;

/// One force generator in a scenario.
///
/// Mesh-based variants carry the path of their hull file, loaded when the
/// scenario is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum GeneratorConfig {
    /// Fixed force and torque.
    ConstantForce(ConstantForce),
    /// Linear drag on the hull velocity relative to the water.
    SimpleBodyDrag(SimpleBodyDrag),
    /// Paddle wheel.
    WaterWheel(WaterWheel),
    /// Weight at the centroid of a hull mesh.
    MeshGravity {
        /// Generator name.
        name: String,
        /// STL or OBJ file.
        path: PathBuf,
    },
    /// Pressure drag over the wetted surface of a hull mesh.
    MeshBodyDrag {
        /// Generator name.
        name: String,
        /// STL or OBJ file.
        path: PathBuf,
        /// Drag coefficient.
        drag_coefficient: f64,
    },
    /// Buoyancy of a hull mesh.
    MeshBuoyancy {
        /// Generator name.
        name: String,
        /// STL or OBJ file.
        path: PathBuf,
    },
}

impl GeneratorConfig {
    /// Name the generator writes its outputs under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ConstantForce(g) => g.name(),
            Self::SimpleBodyDrag(g) => g.name(),
            Self::WaterWheel(g) => g.name(),
            Self::MeshGravity { name, .. }
            | Self::MeshBodyDrag { name, .. }
            | Self::MeshBuoyancy { name, .. } => name,
        }
    }

    /// Instantiate the generator, loading meshes from disk.
    ///
    /// # Errors
    ///
    /// Returns mesh loading errors and [`SimError::InvalidConfig`] for bad
    /// wheel geometry.
    pub fn build(&self) -> Result<Box<dyn ForceGenerator>> {
        Ok(match self {
            Self::ConstantForce(g) => Box::new(g.clone()),
            Self::SimpleBodyDrag(g) => Box::new(g.clone()),
            Self::WaterWheel(g) => {
                g.validate()?;
                Box::new(g.clone())
            }
            Self::MeshGravity { name, path } => Box::new(MeshGravity::from_path(name, path)?),
            Self::MeshBodyDrag {
                name,
                path,
                drag_coefficient,
            } => Box::new(MeshBodyDrag::from_path(name, path, *drag_coefficient)?),
            Self::MeshBuoyancy { name, path } => Box::new(MeshBuoyancy::from_path(name, path)?),
        })
    }
}

/// A complete run description.
///
/// # Example
///
/// ```
/// use sim_hydro::{GeneratorConfig, ScenarioConfig};
/// use sim_core::ConstantForce;
/// use sim_types::{BoatState, SimulationConfig, Vector3};
///
/// let scenario = ScenarioConfig::new(BoatState::default())
///     .with_generator(GeneratorConfig::ConstantForce(ConstantForce::force(
///         "push",
///         Vector3::new(1.0, 0.0, 0.0),
///     )))
///     .with_simulation(SimulationConfig::with_timestep(0.01).duration(0.5));
///
/// let history = scenario.run().unwrap();
/// assert_eq!(history.len(), 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioConfig {
    /// Initial labeled values, in the order they should appear in tables.
    pub initial: Vec<(String, f64)>,
    /// Generators, applied in this order every step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub generators: Vec<GeneratorConfig>,
    /// Timestep and duration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub simulation: SimulationConfig,
}

impl ScenarioConfig {
    /// Start from an initial state with no generators and default settings.
    #[must_use]
    pub fn new(initial: BoatState) -> Self {
        Self {
            initial: initial.to_labels().into(),
            generators: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Set or replace one initial value.
    #[must_use]
    pub fn with_initial(mut self, key: impl Into<String>, value: f64) -> Self {
        let key = key.into();
        match self.initial.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.initial.push((key, value)),
        }
        self
    }

    /// Append a generator.
    #[must_use]
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generators.push(generator);
        self
    }

    /// Replace the run settings.
    #[must_use]
    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Parse a scenario from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the document does not parse.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::invalid_config(e.to_string()))
    }

    /// Serialize the scenario as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if a value cannot be represented.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::invalid_config(e.to_string()))
    }

    /// Load the meshes, build the initial state and validate everything.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for bad run settings or an empty
    /// generator list, [`SimError::MissingLabels`] if the initial values do
    /// not cover what the generators need, and any construction error.
    pub fn build(&self) -> Result<Simulation> {
        self.simulation.validate()?;
        if self.generators.is_empty() {
            return Err(SimError::invalid_config("scenario has no generators"));
        }

        let labels: LabeledState = self.initial.iter().cloned().collect();
        let state = BoatState::from_labels(&labels)?;

        let mut builder = Simulation::builder(state);
        for config in &self.generators {
            builder = builder.boxed_generator(config.build()?);
        }
        let sim = builder.build()?;
        info!(
            generators = self.generators.len(),
            timestep = self.simulation.timestep,
            duration = self.simulation.duration,
            "scenario built"
        );
        Ok(sim)
    }

    /// Build and run the scenario for its configured duration.
    ///
    /// # Errors
    ///
    /// See [`ScenarioConfig::build`] and [`Simulation::run`].
    pub fn run(&self) -> Result<History> {
        let mut sim = self.build()?;
        sim.run(&self.simulation)?;
        Ok(sim.into_history())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn push() -> GeneratorConfig {
        GeneratorConfig::ConstantForce(ConstantForce::force("push", Vector3::new(2.0, 0.0, 0.0)))
    }

    #[test]
    fn names_follow_the_generator() {
        assert_eq!(push().name(), "push");
        let mesh = GeneratorConfig::MeshBuoyancy {
            name: "hull".into(),
            path: "hull.stl".into(),
        };
        assert_eq!(mesh.name(), "hull");
    }

    #[test]
    fn with_initial_replaces_in_place() {
        let scenario = ScenarioConfig::new(BoatState::default())
            .with_initial("r_x__boat", 4.0)
            .with_initial("rho__water", 1000.0);
        let position = scenario.initial.iter().position(|(k, _)| k == "r_x__boat");
        assert_eq!(position, Some(1));
        assert_eq!(scenario.initial[1].1, 4.0);
        assert_eq!(scenario.initial.last().unwrap().0, "rho__water");
    }

    #[test]
    fn empty_scenario_is_rejected() {
        let err = ScenarioConfig::new(BoatState::default()).build().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn missing_environment_is_reported() {
        let scenario = ScenarioConfig::new(BoatState::default()).with_generator(
            GeneratorConfig::SimpleBodyDrag(SimpleBodyDrag::new("drag", 1.0, 1.0)),
        );
        let err = scenario.build().unwrap_err();
        assert!(err.is_missing_label());
    }

    #[test]
    fn run_uses_configured_steps() {
        let history = ScenarioConfig::new(BoatState::default())
            .with_generator(push())
            .with_simulation(SimulationConfig::with_timestep(0.1).duration(1.0))
            .run()
            .unwrap();
        assert_eq!(history.len(), 10);
        let last = history.last().unwrap();
        assert!(last.body.r.x > 0.0);
        assert!((last.body.a.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn bad_wheel_is_a_config_error() {
        let wheel = WaterWheel::new("wheel", 0.5, 0.2, 0.3, 0);
        let err = GeneratorConfig::WaterWheel(wheel).build().err().expect("expected a config error");
        assert!(err.is_config_error());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_roundtrip() {
        let scenario = ScenarioConfig::new(BoatState::default()).with_generator(push());
        let json = scenario.to_json().unwrap();
        assert!(json.contains("\"kind\": \"constant_force\""));
        assert_eq!(ScenarioConfig::from_json(&json).unwrap(), scenario);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ScenarioConfig::from_json("{ not json").unwrap_err();
        assert!(err.is_config_error());
    }
}
