//! Transforms between the world, body and center-of-mass frames.
//!
//! A body-frame point `p` is placed in the world by rotating it about the
//! center of mass and translating by the body position:
//!
//! ```text
//! p_w = R·(p − c) + c + r
//! ```
//!
//! where `R` is the rotation of the axis-angle orientation `theta`, `c` the
//! center-of-mass offset and `r` the body position.

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};
use sim_types::BoatState;

/// Orientations with a smaller angle than this are treated as identity.
pub const ORIENTATION_EPSILON: f64 = 1e-9;

/// Rotation of an axis-angle vector.
#[must_use]
pub fn rotation_from_axis_angle(theta: &Vector3<f64>) -> Rotation3<f64> {
    let angle = theta.norm();
    if angle <= ORIENTATION_EPSILON {
        Rotation3::identity()
    } else {
        Rotation3::from_axis_angle(&Unit::new_unchecked(theta / angle), angle)
    }
}

/// Placement of the body frame in the world at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    rotation: Rotation3<f64>,
    position: Vector3<f64>,
    com_offset: Vector3<f64>,
}

impl BodyFrame {
    /// Frame from position, axis-angle orientation and center-of-mass offset.
    #[must_use]
    pub fn new(position: Vector3<f64>, theta: &Vector3<f64>, com_offset: Vector3<f64>) -> Self {
        Self {
            rotation: rotation_from_axis_angle(theta),
            position,
            com_offset,
        }
    }

    /// Frame of the hull in `state`.
    #[must_use]
    pub fn from_state(state: &BoatState) -> Self {
        Self::new(state.body.r, &state.body.theta, state.mass.com_offset)
    }

    /// Body-to-world rotation.
    #[must_use]
    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// The rigid map from body coordinates to world coordinates.
    #[must_use]
    pub fn placement(&self) -> Isometry3<f64> {
        let translation = self.com_offset + self.position - self.rotation * self.com_offset;
        Isometry3::from_parts(
            Translation3::from(translation),
            UnitQuaternion::from_rotation_matrix(&self.rotation),
        )
    }

    /// Center of mass in world coordinates.
    #[must_use]
    pub fn com_world(&self) -> Point3<f64> {
        Point3::from(self.position + self.com_offset)
    }

    /// Place a body-frame point in the world.
    #[must_use]
    pub fn body_to_world_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * (p.coords - self.com_offset) + self.com_offset + self.position)
    }

    /// Rotate a body-frame vector into the world.
    #[must_use]
    pub fn body_to_world_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    /// Inverse of [`BodyFrame::body_to_world_point`].
    #[must_use]
    pub fn world_to_body_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(
            self.rotation.inverse() * (p.coords - self.com_offset - self.position)
                + self.com_offset,
        )
    }

    /// Rotate a world vector into the body frame.
    #[must_use]
    pub fn world_to_body_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * v
    }

    /// Express a body-frame point relative to the center of mass.
    #[must_use]
    pub fn body_to_com(&self, p: &Point3<f64>) -> Vector3<f64> {
        p.coords - self.com_offset
    }

    /// Body-frame torque about the center of mass of a world force applied at
    /// a world point.
    #[must_use]
    pub fn torque_about_com(&self, point: &Point3<f64>, force: &Vector3<f64>) -> Vector3<f64> {
        let arm = self.body_to_com(&self.world_to_body_point(point));
        arm.cross(&self.world_to_body_vector(force))
    }
}
