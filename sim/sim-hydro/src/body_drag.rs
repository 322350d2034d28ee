//! Pressure drag integrated over the wetted hull surface.

use std::path::Path;

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use sim_core::{BodyFrame, ForceGenerator};
use sim_types::labels::{Axis, WATER, scalar_key, vector_key, vector_keys};
use sim_types::{BoatState, Result, SimError, Wrench};
use tracing::warn;

use crate::buoyancy::ensure_watertight;
use crate::geometry::SolidGeometry;
use crate::loader::load_solid;

/// Relative speeds below this produce no drag.
const MIN_FLOW_SPEED: f64 = 1e-12;

/// Quadratic pressure drag on the submerged faces that face into the flow.
///
/// For every face of the wetted surface with outward normal `n`, area `A` and
/// relative flow velocity `v` at its centroid:
///
/// ```text
/// dF = −½·ρ·C_d·A·max(0, n·v̂)·|v|·v
/// ```
///
/// The cap on the water plane is not part of the wetted surface and takes no
/// load. Torques are summed about the center of mass.
#[derive(Debug, Clone)]
pub struct MeshBodyDrag<G: SolidGeometry = IndexedMesh> {
    name: String,
    solid: G,
    drag_coefficient: f64,
}

impl<G: SolidGeometry> MeshBodyDrag<G> {
    /// Wrap a solid given in body coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NonWatertightMesh`] if the solid is empty or open.
    pub fn new(name: impl Into<String>, solid: G, drag_coefficient: f64) -> Result<Self> {
        ensure_watertight(&solid)?;
        Ok(Self {
            name: name.into(),
            solid,
            drag_coefficient,
        })
    }

    /// The drag coefficient.
    #[must_use]
    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }
}

impl MeshBodyDrag<IndexedMesh> {
    /// Load the hull solid from an STL or OBJ file.
    ///
    /// # Errors
    ///
    /// See [`load_solid`].
    pub fn from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        drag_coefficient: f64,
    ) -> Result<Self> {
        Self::new(name, load_solid(path)?, drag_coefficient)
    }
}

impl<G: SolidGeometry> ForceGenerator for MeshBodyDrag<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_state_labels(&self) -> Vec<String> {
        let mut labels = vec![scalar_key("rho", WATER), vector_key("r", Axis::Z, WATER)];
        labels.extend(vector_keys("v", WATER));
        labels
    }

    fn compute(&self, state: &mut BoatState, _dt: f64) -> Result<Wrench> {
        let rho = state.labels.get(&scalar_key("rho", WATER))?;
        let water_z = state.labels.get(&vector_key("r", Axis::Z, WATER))?;
        let water_velocity = state.labels.get_vector("v", WATER)?;

        let frame = BodyFrame::from_state(state);
        let mut placed = self.solid.clone();
        placed.apply_rigid_transform(&frame.placement());
        let wetted = placed
            .slice_by_plane(&Point3::new(0.0, 0.0, water_z), &-Vector3::z(), false)
            .map_err(|e| {
                warn!(generator = %self.name, error = %e, "slicing failed");
                SimError::degenerate_slice(&self.name)
            })?;

        let omega = frame.body_to_world_vector(&state.body.omega);
        let com = frame.com_world();
        let scale = -0.5 * rho * self.drag_coefficient;

        let mut total = Wrench::zero();
        for tri in wetted.surface_triangles() {
            let Some(normal) = tri.normal() else {
                continue;
            };
            let point = tri.centroid();
            let flow = state.body.v + omega.cross(&(point - com)) - water_velocity;
            let speed = flow.norm();
            if speed < MIN_FLOW_SPEED {
                continue;
            }
            let facing = normal.dot(&flow) / speed;
            if facing <= 0.0 {
                continue;
            }
            let force = flow * (scale * tri.area() * facing * speed);
            total.force += force;
            total.torque += frame.torque_about_com(&point, &force);
        }
        Ok(total)
    }
}
