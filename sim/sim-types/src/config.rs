//! Configuration types for simulation.
//!
//! A run is described by its fixed timestep and the span of simulated time to
//! cover.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravitational acceleration used by the weight and buoyancy models (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Relative slack when a duration is an integer multiple of the timestep.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Main configuration for a simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed timestep for integration (seconds).
    pub timestep: f64,
    /// Simulated time covered by one run (seconds).
    pub duration: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 1000.0,
            duration: 3.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new simulation config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Set the simulated duration.
    #[must_use]
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        validate_timestep(self.timestep)?;

        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(crate::SimError::invalid_config(format!(
                "duration must be finite and non-negative, got {}",
                self.duration
            )));
        }

        Ok(())
    }

    /// Number of steps needed to cover the duration.
    #[must_use]
    pub fn step_count(&self) -> usize {
        step_count(self.duration, self.timestep)
    }

    /// Get the frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }
}

/// Check that `dt` is positive and finite.
pub fn validate_timestep(dt: f64) -> crate::Result<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(crate::SimError::InvalidTimestep(dt));
    }
    Ok(())
}

/// Number of steps of size `dt` needed to cover `delta_t`.
///
/// This is `ceil(delta_t / dt)`, except that a ratio within rounding error
/// of an integer counts as that integer. Non-positive spans need no steps.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn step_count(delta_t: f64, dt: f64) -> usize {
    if delta_t.is_nan() || dt.is_nan() || delta_t <= 0.0 || dt <= 0.0 {
        return 0;
    }
    let ratio = delta_t / dt;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= STEP_COUNT_TOLERANCE * nearest.max(1.0) {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.timestep, 1e-3, epsilon = 1e-15);
        assert_eq!(config.step_count(), 3000);
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::with_timestep(0.01).duration(0.5);
        assert_relative_eq!(config.frequency(), 100.0, epsilon = 1e-10);
        assert_eq!(config.step_count(), 50);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimulationConfig::default();
        config.timestep = -0.01;
        assert!(config.validate().is_err());

        config.timestep = 0.0;
        assert!(config.validate().is_err());

        config.timestep = f64::NAN;
        assert!(config.validate().is_err());

        config.timestep = 0.01;
        config.duration = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_step_count_rounding() {
        assert_eq!(step_count(0.3, 0.1), 3);
        assert_eq!(step_count(0.35, 0.1), 4);
        assert_eq!(step_count(1.0, 0.001), 1000);
        assert_eq!(step_count(0.0, 0.1), 0);
        assert_eq!(step_count(1.0, 0.0), 0);
    }
}
