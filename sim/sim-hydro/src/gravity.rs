//! Weight applied at the volumetric centroid of a hull mesh.

use std::path::Path;

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use sim_core::{BodyFrame, ForceGenerator};
use sim_types::{BoatState, Result, STANDARD_GRAVITY, SimError, Wrench};

use crate::buoyancy::ensure_watertight;
use crate::geometry::SolidGeometry;
use crate::loader::load_solid;

/// Weight `m·g` along world −z acting at the centroid of a solid.
///
/// The mass comes from the state. The torque about the center of mass is
/// zero unless the solid's centroid differs from it.
#[derive(Debug, Clone)]
pub struct MeshGravity {
    name: String,
    centroid: Point3<f64>,
}

impl MeshGravity {
    /// Use the centroid of `solid`, given in body coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NonWatertightMesh`] for an open solid and
    /// [`SimError::InvalidConfig`] if it encloses no volume.
    pub fn new<G: SolidGeometry>(name: impl Into<String>, solid: &G) -> Result<Self> {
        let name = name.into();
        ensure_watertight(solid)?;
        let centroid = solid.centroid().ok_or_else(|| {
            SimError::invalid_config(format!("solid of {name} encloses no volume"))
        })?;
        Ok(Self { name, centroid })
    }

    /// Load the solid from an STL or OBJ file.
    ///
    /// # Errors
    ///
    /// See [`load_solid`] and [`MeshGravity::new`].
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let solid: IndexedMesh = load_solid(path)?;
        Self::new(name, &solid)
    }

    /// Body-frame point the weight acts at.
    #[must_use]
    pub fn centroid(&self) -> &Point3<f64> {
        &self.centroid
    }
}

impl ForceGenerator for MeshGravity {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, state: &mut BoatState, _dt: f64) -> Result<Wrench> {
        let frame = BodyFrame::from_state(state);
        let point = frame.body_to_world_point(&self.centroid);
        let force = Vector3::new(0.0, 0.0, -state.mass.mass * STANDARD_GRAVITY);
        Ok(Wrench::new(force, frame.torque_about_com(&point, &force)))
    }
}
