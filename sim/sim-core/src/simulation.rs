//! The simulation loop.
//!
//! Each step runs every generator in order against a copy of the live state,
//! sums their wrenches, solves for accelerations, records a snapshot and
//! advances the state by one timestep. A failed step leaves the live state
//! untouched.
//!
//! # Example
//!
//! ```
//! use sim_core::{ConstantForce, Simulation};
//! use sim_types::{BoatState, Vector3};
//!
//! let mut sim = Simulation::builder(BoatState::default())
//!     .generator(ConstantForce::force("push", Vector3::new(1.0, 0.0, 0.0)))
//!     .build()
//!     .unwrap();
//!
//! sim.simulate(1.0, 0.01).unwrap();
//! assert_eq!(sim.history().len(), 100);
//! assert!(sim.state().body.r.x > 0.0);
//! ```

use std::fmt;

use hashbrown::HashSet;
use sim_types::{BoatState, Result, SimError, SimulationConfig, step_count, validate_timestep};
use tracing::{debug, info};

use crate::ForceGenerator;
use crate::history::History;
use crate::integrators::RigidBodyIntegrator;

/// One hull, its force generators and the record of completed steps.
pub struct Simulation {
    state: BoatState,
    generators: Vec<Box<dyn ForceGenerator>>,
    integrator: RigidBodyIntegrator,
    history: History,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.state.time)
            .field("generators", &self.generator_names().collect::<Vec<_>>())
            .field("steps", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a simulation from an initial state and ordered generators.
    #[must_use]
    pub fn new(state: BoatState, generators: Vec<Box<dyn ForceGenerator>>) -> Self {
        Self {
            state,
            generators,
            integrator: RigidBodyIntegrator::new(),
            history: History::new(),
        }
    }

    /// Start building a simulation around `state`.
    #[must_use]
    pub fn builder(state: BoatState) -> SimulationBuilder {
        SimulationBuilder::new(state)
    }

    /// The live state, i.e. the state the next step starts from.
    #[must_use]
    pub fn state(&self) -> &BoatState {
        &self.state
    }

    /// Mutable access to the live state. Recorded snapshots are unaffected.
    pub fn state_mut(&mut self) -> &mut BoatState {
        &mut self.state
    }

    /// Completed steps.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Consume the simulation, keeping its history.
    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// Generator names in evaluation order.
    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|g| g.name())
    }

    /// Every label the generators and the integrator read, without
    /// duplicates, in first-required order.
    #[must_use]
    pub fn required_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.generators
            .iter()
            .flat_map(|g| g.required_state_labels())
            .chain(self.integrator.required_state_labels())
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Check that a run can start.
    ///
    /// # Errors
    ///
    /// - [`SimError::MissingLabels`] listing every absent label
    /// - [`SimError::InvalidMassProperties`] for a non-physical mass
    /// - [`SimError::InvalidConfig`] for duplicate generator names or bad
    ///   generator parameters
    pub fn validate(&self) -> Result<()> {
        let required = self.required_labels();
        let missing = self.state.labels.missing(required.iter().map(String::as_str));
        if !missing.is_empty() {
            return Err(SimError::MissingLabels { labels: missing });
        }

        self.state.mass.validate()?;

        if !self.state.body.is_finite() {
            return Err(SimError::invalid_config("initial kinematics must be finite"));
        }

        let mut names = HashSet::new();
        for name in self.generator_names() {
            if !names.insert(name) {
                return Err(SimError::invalid_config(format!(
                    "duplicate generator name: {name}"
                )));
            }
        }
        for generator in &self.generators {
            generator.validate()?;
        }

        Ok(())
    }

    /// Advance the simulation by one step of `dt`.
    ///
    /// On error nothing is recorded and the live state is left as it was.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidTimestep`] if `dt` is not positive and finite
    /// - any generator error, tagged with the step index
    /// - [`SimError::SingularMassMatrix`] if the accelerations cannot be solved
    pub fn step(&mut self, dt: f64) -> Result<()> {
        validate_timestep(dt)?;
        let step = self.history.len();

        let mut working = self.state.clone();
        for generator in &self.generators {
            generator
                .apply(&mut working, dt)
                .map_err(|err| err.at_step(step))?;
        }
        working.aggregate_totals();
        self.integrator.solve(&mut working)?;

        self.history.push(working.clone());
        self.state = self
            .integrator
            .advance(&working, self.history.previous(), dt);

        debug!(
            step,
            time = self.state.time,
            force = ?self.state.total.force,
            "step completed"
        );
        Ok(())
    }

    /// Run `ceil(delta_t / dt)` steps.
    ///
    /// Labels, mass properties and the timestep are checked before the first
    /// step.
    ///
    /// # Errors
    ///
    /// Returns the first validation or step error.
    pub fn simulate(&mut self, delta_t: f64, dt: f64) -> Result<()> {
        self.simulate_with_progress(delta_t, dt, |_, _| {})
    }

    /// Like [`Simulation::simulate`], calling `progress(completed, total)`
    /// after every step.
    ///
    /// # Errors
    ///
    /// Returns the first validation or step error.
    pub fn simulate_with_progress<F>(&mut self, delta_t: f64, dt: f64, mut progress: F) -> Result<()>
    where
        F: FnMut(usize, usize),
    {
        validate_timestep(dt)?;
        if !delta_t.is_finite() {
            return Err(SimError::invalid_config(format!(
                "simulated span must be finite, got {delta_t}"
            )));
        }
        if !(delta_t / dt).is_finite() {
            return Err(SimError::invalid_config(format!(
                "span {delta_t} needs too many steps of {dt}"
            )));
        }
        self.validate()?;

        let total = step_count(delta_t, dt);
        info!(
            steps = total,
            dt,
            start = self.state.time,
            generators = self.generators.len(),
            "simulation started"
        );
        for completed in 1..=total {
            self.step(dt)?;
            progress(completed, total);
        }
        info!(
            time = self.state.time,
            recorded = self.history.len(),
            "simulation finished"
        );
        Ok(())
    }

    /// Run for the duration and timestep of `config`.
    ///
    /// # Errors
    ///
    /// Returns configuration errors or the first step error.
    pub fn run(&mut self, config: &SimulationConfig) -> Result<()> {
        config.validate()?;
        self.simulate(config.duration, config.timestep)
    }
}

/// Builder for [`Simulation`].
pub struct SimulationBuilder {
    state: BoatState,
    generators: Vec<Box<dyn ForceGenerator>>,
}

impl SimulationBuilder {
    /// Create a builder around the initial state.
    #[must_use]
    pub fn new(state: BoatState) -> Self {
        Self {
            state,
            generators: Vec::new(),
        }
    }

    /// Append a generator. Generators run in the order they are added.
    #[must_use]
    pub fn generator(mut self, generator: impl ForceGenerator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    /// Append an already boxed generator.
    #[must_use]
    pub fn boxed_generator(mut self, generator: Box<dyn ForceGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Add a labeled quantity to the initial state.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: f64) -> Self {
        self.state.labels.insert(key, value);
        self
    }

    /// Build and validate the simulation.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Simulation::validate`].
    pub fn build(self) -> Result<Simulation> {
        let sim = Simulation::new(self.state, self.generators);
        sim.validate()?;
        Ok(sim)
    }
}
