//! Buoyancy from the submerged part of a closed hull mesh.

use std::path::Path;

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use sim_core::{BodyFrame, ForceGenerator};
use sim_types::labels::{Axis, WATER, scalar_key, vector_key};
use sim_types::{BoatState, Result, STANDARD_GRAVITY, SimError, Wrench};
use tracing::{debug, warn};

use crate::geometry::SolidGeometry;
use crate::loader::load_solid;

/// Archimedes force on a closed solid cut by a flat water surface.
///
/// Each step the template solid is placed at the hull pose, cut by the
/// horizontal plane at `r_z__water` keeping the part below, and capped. The
/// submerged volume `V` yields a force `V·ρ·g` along world +z at the
/// submerged centroid. The volume is also written to
/// `submerged_volume__<name>`.
#[derive(Debug, Clone)]
pub struct MeshBuoyancy<G: SolidGeometry = IndexedMesh> {
    name: String,
    solid: G,
}

impl<G: SolidGeometry> MeshBuoyancy<G> {
    /// Wrap a solid given in body coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NonWatertightMesh`] if the solid is empty or open.
    pub fn new(name: impl Into<String>, solid: G) -> Result<Self> {
        ensure_watertight(&solid)?;
        Ok(Self {
            name: name.into(),
            solid,
        })
    }

    /// The template solid in body coordinates.
    pub fn solid(&self) -> &G {
        &self.solid
    }

    /// Key the submerged volume is written to.
    #[must_use]
    pub fn volume_key(&self) -> String {
        scalar_key("submerged_volume", &self.name)
    }

    /// Submerged piece of the solid for the hull pose in `state`.
    ///
    /// Returns `Ok(None)` when the hull is entirely out of the water.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DegenerateSlice`] if the cut fails or the piece is
    /// not closed, and [`SimError::MissingKey`] without `r_z__water`.
    pub fn submerged(&self, state: &BoatState) -> Result<Option<G>> {
        let water_z = state.labels.get(&vector_key("r", Axis::Z, WATER))?;
        let frame = BodyFrame::from_state(state);

        let mut placed = self.solid.clone();
        placed.apply_rigid_transform(&frame.placement());

        let piece = placed
            .slice_by_plane(&Point3::new(0.0, 0.0, water_z), &-Vector3::z(), true)
            .map_err(|e| {
                warn!(generator = %self.name, error = %e, "slicing failed");
                SimError::degenerate_slice(&self.name)
            })?;

        if piece.is_empty() {
            return Ok(None);
        }
        if !piece.is_watertight() {
            warn!(
                generator = %self.name,
                boundary_edges = piece.boundary_edge_count(),
                "submerged piece is open"
            );
            return Err(SimError::degenerate_slice(&self.name));
        }
        Ok(Some(piece))
    }
}

impl MeshBuoyancy<IndexedMesh> {
    /// Load the hull solid from an STL or OBJ file.
    ///
    /// # Errors
    ///
    /// See [`load_solid`].
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        Self::new(name, load_solid(path)?)
    }
}

pub(crate) fn ensure_watertight<G: SolidGeometry>(solid: &G) -> Result<()> {
    if solid.is_empty() || !solid.is_watertight() {
        return Err(SimError::NonWatertightMesh {
            boundary_edges: solid.boundary_edge_count(),
        });
    }
    Ok(())
}

impl<G: SolidGeometry> ForceGenerator for MeshBuoyancy<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_state_labels(&self) -> Vec<String> {
        vec![
            vector_key("r", Axis::Z, WATER),
            scalar_key("rho", WATER),
        ]
    }

    fn compute(&self, state: &mut BoatState, _dt: f64) -> Result<Wrench> {
        let rho = state.labels.get(&scalar_key("rho", WATER))?;
        let submerged = self.submerged(state)?;

        let (volume, centroid) = match &submerged {
            Some(piece) => (piece.volume(), piece.centroid()),
            None => (0.0, None),
        };
        state.labels.insert(self.volume_key(), volume);

        let Some(centroid) = centroid else {
            return Ok(Wrench::zero());
        };

        let force = Vector3::new(0.0, 0.0, volume * rho * STANDARD_GRAVITY);
        let torque = BodyFrame::from_state(state).torque_about_com(&centroid, &force);
        debug!(generator = %self.name, volume, ?centroid, "buoyancy");
        Ok(Wrench::new(force, torque))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{box_mesh, unit_cube};
    use nalgebra::Rotation3;
    use sim_types::{BodyKinematics, MassProperties};

    fn state_at(r: Vector3<f64>) -> BoatState {
        BoatState::new(BodyKinematics::at_rest(r), MassProperties::default())
            .with_labels([("rho__water", 1000.0), ("r_z__water", 0.0)])
    }

    fn centered_cube() -> IndexedMesh {
        box_mesh(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn open_mesh_is_rejected() {
        let mut mesh = unit_cube();
        mesh.faces.pop();
        let err = MeshBuoyancy::new("hull", mesh).unwrap_err();
        assert!(matches!(err, SimError::NonWatertightMesh { boundary_edges: 3 }));
    }

    #[test]
    fn half_submerged_cube() {
        let buoyancy = MeshBuoyancy::new("hull", centered_cube()).unwrap();
        let mut state = state_at(Vector3::zeros());
        let w = buoyancy.compute(&mut state, 0.01).unwrap();

        assert_relative_eq!(w.force.z, 0.5 * 1000.0 * STANDARD_GRAVITY, epsilon = 1e-6);
        assert_relative_eq!(state.labels.get("submerged_volume__hull").unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(w.torque.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn out_of_water_writes_zero_volume() {
        let buoyancy = MeshBuoyancy::new("hull", centered_cube()).unwrap();
        let mut state = state_at(Vector3::new(0.0, 0.0, 2.0));
        let w = buoyancy.compute(&mut state, 0.01).unwrap();
        assert_eq!(w, Wrench::zero());
        assert_eq!(state.labels.get("submerged_volume__hull").unwrap(), 0.0);
    }

    #[test]
    fn offset_centroid_produces_righting_torque() {
        // Rolled about x, the submerged centroid shifts sideways.
        let buoyancy = MeshBuoyancy::new(
            "hull",
            box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25)),
        )
        .unwrap();
        let mut state = state_at(Vector3::zeros());
        state.body.theta = Vector3::new(0.2, 0.0, 0.0);
        state.mass.com_offset = Vector3::new(0.0, 0.0, -0.2);
        let w = buoyancy.compute(&mut state, 0.01).unwrap();

        assert!(w.force.z > 0.0);
        assert!(w.torque.x < 0.0);
    }

    #[test]
    fn torque_matches_world_frame_lever_arm() {
        let buoyancy = MeshBuoyancy::new(
            "hull",
            box_mesh(Point3::new(-1.0, -0.5, -0.25), Point3::new(1.0, 0.5, 0.25)),
        )
        .unwrap();
        let mut state = state_at(Vector3::new(0.3, -0.2, 0.05));
        state.body.theta = Vector3::new(0.2, 0.1, 0.05);
        state.mass.com_offset = Vector3::new(0.1, 0.0, -0.15);

        let piece = buoyancy.submerged(&state).unwrap().unwrap();
        let centroid = piece.centroid().unwrap();
        let w = buoyancy.compute(&mut state, 0.01).unwrap();

        let rotation = Rotation3::from_scaled_axis(state.body.theta);
        let com = state.body.r + state.mass.com_offset;
        let expected = rotation.inverse() * (centroid.coords - com).cross(&w.force);
        assert_relative_eq!(w.force.z, piece.volume() * 1000.0 * STANDARD_GRAVITY, epsilon = 1e-6);
        assert_relative_eq!(w.torque, expected, epsilon = 1e-9);
        assert!(w.torque.norm() > 1.0);
    }
}
