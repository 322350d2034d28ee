//! Error types for simulation operations.

use thiserror::Error;

/// Errors that can occur while building or stepping a simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A required labeled quantity is absent.
    #[error("missing state label: {key}")]
    MissingKey {
        /// The absent key.
        key: String,
    },

    /// Preflight check found labels that no generator can do without.
    #[error("cannot compute dynamics, missing the following labels: {}", .labels.join(", "))]
    MissingLabels {
        /// Every absent label, in the order they were required.
        labels: Vec<String>,
    },

    /// A buoyant solid is not closed.
    #[error("buoyant volume mesh is not watertight ({boundary_edges} boundary edges)")]
    NonWatertightMesh {
        /// Number of edges used by a single face.
        boundary_edges: usize,
    },

    /// The submerged piece of a solid could not be closed.
    #[error("submerged volume of {generator} is not watertight at step {step}")]
    DegenerateSlice {
        /// Name of the generator that produced the slice.
        generator: String,
        /// Index of the step being computed.
        step: usize,
    },

    /// The generalised mass matrix has no inverse.
    #[error("generalised mass matrix is singular")]
    SingularMassMatrix,

    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Invalid mass properties.
    #[error("invalid mass properties: {reason}")]
    InvalidMassProperties {
        /// Description of what's wrong.
        reason: String,
    },

    /// A mesh file could not be loaded.
    #[error("failed to load mesh {path}: {reason}")]
    MeshLoad {
        /// Path as given by the caller.
        path: String,
        /// Underlying loader or repair error.
        reason: String,
    },
}

impl SimError {
    /// Create a missing key error.
    #[must_use]
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid mass properties error.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMassProperties {
            reason: reason.into(),
        }
    }

    /// Create a mesh load error.
    #[must_use]
    pub fn mesh_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::MeshLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a degenerate slice error. The step is filled in by the
    /// simulation loop through [`SimError::at_step`].
    #[must_use]
    pub fn degenerate_slice(generator: impl Into<String>) -> Self {
        Self::DegenerateSlice {
            generator: generator.into(),
            step: 0,
        }
    }

    /// Tag a step-dependent error with the index of the failing step.
    #[must_use]
    pub fn at_step(self, step: usize) -> Self {
        match self {
            Self::DegenerateSlice { generator, .. } => Self::DegenerateSlice { generator, step },
            other => other,
        }
    }

    /// Check if this error comes from a missing label.
    #[must_use]
    pub fn is_missing_label(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::MissingLabels { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::InvalidTimestep(_))
    }
}
