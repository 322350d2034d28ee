//! The typed state record advanced by the simulation.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg};

use nalgebra::{Matrix3, Vector3};

use crate::labeled::LabeledState;
use crate::labels::{AXES, Axis, BOAT, TIME, TOTAL, inertia_key, parse_vector_key, scalar_key};
use crate::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quantity prefix of generator forces.
pub const FORCE: &str = "force";

/// Quantity prefix of generator torques.
pub const TORQUE: &str = "torque";

/// A force/torque pair.
///
/// The force is expressed in the world frame, the torque about the center of
/// mass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wrench {
    /// Force (N).
    pub force: Vector3<f64>,
    /// Torque (N·m).
    pub torque: Vector3<f64>,
}

impl Default for Wrench {
    fn default() -> Self {
        Self::zero()
    }
}

impl Wrench {
    /// Create a wrench.
    #[must_use]
    pub const fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    /// Zero force and torque.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// A pure force.
    #[must_use]
    pub fn force(force: Vector3<f64>) -> Self {
        Self::new(force, Vector3::zeros())
    }

    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.force.iter().chain(self.torque.iter()).all(|x| x.is_finite())
    }
}

impl Add for Wrench {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.force + rhs.force, self.torque + rhs.torque)
    }
}

impl AddAssign for Wrench {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

impl Neg for Wrench {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.force, -self.torque)
    }
}

impl Sum for Wrench {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Wrench> for Wrench {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Per-generator wrenches in the order the generators first reported.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contributions {
    entries: Vec<(String, Wrench)>,
}

impl Contributions {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the wrench of `name`, replacing a previous one in place.
    pub fn insert(&mut self, name: impl Into<String>, wrench: Wrench) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = wrench;
        } else {
            self.entries.push((name, wrench));
        }
    }

    /// Wrench of `name`, if it reported one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Wrench> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, w)| w)
    }

    fn get_mut_or_insert(&mut self, name: &str) -> &mut Wrench {
        let i = match self.entries.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                self.entries.push((name.to_string(), Wrench::zero()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// Number of generators that reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no generator reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names and wrenches in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Wrench)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), w))
    }

    /// Sum of all contributions.
    #[must_use]
    pub fn total(&self) -> Wrench {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

/// Position, velocity and acceleration of the hull reference frame.
///
/// Orientation is an axis-angle vector: direction is the rotation axis,
/// magnitude the angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyKinematics {
    /// Position (m).
    pub r: Vector3<f64>,
    /// Linear velocity (m/s).
    pub v: Vector3<f64>,
    /// Linear acceleration (m/s²).
    pub a: Vector3<f64>,
    /// Orientation (rad, axis-angle).
    pub theta: Vector3<f64>,
    /// Angular velocity (rad/s).
    pub omega: Vector3<f64>,
    /// Angular acceleration (rad/s²).
    pub alpha: Vector3<f64>,
}

impl Default for BodyKinematics {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}

impl BodyKinematics {
    /// A body at rest at `r` with identity orientation.
    #[must_use]
    pub fn at_rest(r: Vector3<f64>) -> Self {
        Self {
            r,
            v: Vector3::zeros(),
            a: Vector3::zeros(),
            theta: Vector3::zeros(),
            omega: Vector3::zeros(),
            alpha: Vector3::zeros(),
        }
    }

    /// Set the orientation.
    #[must_use]
    pub fn with_orientation(mut self, theta: Vector3<f64>) -> Self {
        self.theta = theta;
        self
    }

    /// Set the linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, v: Vector3<f64>) -> Self {
        self.v = v;
        self
    }

    /// Set the angular velocity.
    #[must_use]
    pub fn with_angular_velocity(mut self, omega: Vector3<f64>) -> Self {
        self.omega = omega;
        self
    }

    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.r, self.v, self.a, self.theta, self.omega, self.alpha]
            .iter()
            .all(|x| x.iter().all(|c| c.is_finite()))
    }

    fn groups() -> [&'static str; 6] {
        ["r", "v", "a", "theta", "omega", "alpha"]
    }

    fn group(&self, i: usize) -> &Vector3<f64> {
        match i {
            0 => &self.r,
            1 => &self.v,
            2 => &self.a,
            3 => &self.theta,
            4 => &self.omega,
            _ => &self.alpha,
        }
    }

    fn group_mut(&mut self, i: usize) -> &mut Vector3<f64> {
        match i {
            0 => &mut self.r,
            1 => &mut self.v,
            2 => &mut self.a,
            3 => &mut self.theta,
            4 => &mut self.omega,
            _ => &mut self.alpha,
        }
    }
}

/// Mass, inertia and center-of-mass offset of the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Total mass in kg.
    pub mass: f64,
    /// Inertia tensor about the center of mass, body frame (kg·m²).
    pub inertia: Matrix3<f64>,
    /// Center of mass relative to the body reference frame.
    pub com_offset: Vector3<f64>,
}

impl MassProperties {
    /// Create mass properties with given values.
    #[must_use]
    pub const fn new(mass: f64, inertia: Matrix3<f64>, com_offset: Vector3<f64>) -> Self {
        Self {
            mass,
            inertia,
            com_offset,
        }
    }

    /// Principal inertia about the body axes with the center of mass at the
    /// reference origin.
    #[must_use]
    pub fn principal(mass: f64, inertia: Vector3<f64>) -> Self {
        Self::new(mass, Matrix3::from_diagonal(&inertia), Vector3::zeros())
    }

    /// Uniform box with the given full dimensions.
    #[must_use]
    pub fn solid_box(mass: f64, size: Vector3<f64>) -> Self {
        let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
        Self::principal(
            mass,
            Vector3::new(y2 + z2, x2 + z2, x2 + y2) * (mass / 12.0),
        )
    }

    /// Set the center-of-mass offset.
    #[must_use]
    pub fn with_com_offset(mut self, com_offset: Vector3<f64>) -> Self {
        self.com_offset = com_offset;
        self
    }

    /// Validate that the mass properties are physically valid.
    ///
    /// Conditioning of the inertia tensor is left to the solver, which
    /// reports a singular system on its own.
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimError::invalid_mass(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }

        if !self.com_offset.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_mass("center of mass must be finite"));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_mass("inertia tensor must be finite"));
        }

        Ok(())
    }
}

impl Default for MassProperties {
    fn default() -> Self {
        Self::principal(1.0, Vector3::new(1.0, 1.0, 1.0))
    }
}

/// Complete state of the hull at one instant.
///
/// The typed groups hold everything the integrator needs. Environment
/// quantities and generator-owned scalars live in [`BoatState::labels`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoatState {
    /// Simulation clock (s).
    pub time: f64,
    /// Kinematics of the body reference frame.
    pub body: BodyKinematics,
    /// Mass properties.
    pub mass: MassProperties,
    /// Wrench reported by each generator during the current step.
    pub contributions: Contributions,
    /// Sum of [`BoatState::contributions`].
    pub total: Wrench,
    /// Environment and generator-owned quantities.
    pub labels: LabeledState,
}

impl BoatState {
    /// A state at time zero.
    #[must_use]
    pub fn new(body: BodyKinematics, mass: MassProperties) -> Self {
        Self {
            body,
            mass,
            ..Self::default()
        }
    }

    /// Add a labeled quantity.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: f64) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Add labeled quantities.
    #[must_use]
    pub fn with_labels<K, I>(mut self, labels: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        self.labels.set(labels);
        self
    }

    /// Record the wrench produced by generator `name`.
    pub fn record_contribution(&mut self, name: impl Into<String>, wrench: Wrench) {
        self.contributions.insert(name, wrench);
    }

    /// Recompute [`BoatState::total`] from the contributions.
    pub fn aggregate_totals(&mut self) -> Wrench {
        self.total = self.contributions.total();
        self.total
    }

    /// Build a state from the flat key convention.
    ///
    /// Kinematic keys, `t`, `m__boat` and the principal inertia keys are
    /// required. Off-diagonal inertia components and the center-of-mass
    /// offset default to zero. `force_*` and `torque_*` vector keys become
    /// contributions (or the total, for owner `total`); every other key is
    /// kept as a label.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingLabels`] listing every absent required key.
    pub fn from_labels(flat: &LabeledState) -> Result<Self> {
        let missing = flat.missing(Self::required_labels().iter().map(String::as_str));
        if !missing.is_empty() {
            return Err(SimError::MissingLabels { labels: missing });
        }

        let mut state = Self {
            time: flat.get(TIME)?,
            ..Self::default()
        };

        let groups = BodyKinematics::groups();
        let mut inertia = Matrix3::zeros();
        let mut com_offset = Vector3::zeros();
        state.mass.mass = flat.get(&scalar_key("m", BOAT))?;

        for (key, value) in flat.iter() {
            if key == TIME || key == scalar_key("m", BOAT) {
                continue;
            }
            if let Some((row, col)) = parse_inertia_key(key) {
                inertia[(row.index(), col.index())] = value;
                continue;
            }
            match parse_vector_key(key) {
                Some((quantity, axis, BOAT)) => {
                    if let Some(g) = groups.iter().position(|&q| q == quantity) {
                        state.body.group_mut(g)[axis.index()] = value;
                        continue;
                    }
                    if quantity == "c" {
                        com_offset[axis.index()] = value;
                        continue;
                    }
                }
                Some((quantity @ (FORCE | TORQUE), axis, owner)) => {
                    let wrench = if owner == TOTAL {
                        &mut state.total
                    } else {
                        state.contributions.get_mut_or_insert(owner)
                    };
                    if quantity == FORCE {
                        wrench.force[axis.index()] = value;
                    } else {
                        wrench.torque[axis.index()] = value;
                    }
                    continue;
                }
                _ => {}
            }
            state.labels.insert(key, value);
        }

        state.mass.inertia = inertia;
        state.mass.com_offset = com_offset;
        Ok(state)
    }

    /// Flatten into the key convention.
    ///
    /// Order: time, kinematics, mass, contributions, totals, then labels.
    #[must_use]
    pub fn to_labels(&self) -> LabeledState {
        let mut flat = LabeledState::new();
        flat.insert(TIME, self.time);
        for (g, quantity) in BodyKinematics::groups().iter().enumerate() {
            flat.insert_vector(quantity, BOAT, self.body.group(g));
        }
        flat.insert(scalar_key("m", BOAT), self.mass.mass);
        for row in AXES {
            for col in AXES {
                flat.insert(
                    inertia_key(row, col),
                    self.mass.inertia[(row.index(), col.index())],
                );
            }
        }
        flat.insert_vector("c", BOAT, &self.mass.com_offset);
        for (name, wrench) in self.contributions.iter() {
            flat.insert_vector(FORCE, name, &wrench.force);
            flat.insert_vector(TORQUE, name, &wrench.torque);
        }
        flat.insert_vector(FORCE, TOTAL, &self.total.force);
        flat.insert_vector(TORQUE, TOTAL, &self.total.torque);
        for (key, value) in self.labels.iter() {
            flat.insert(key, value);
        }
        flat
    }

    /// Keys [`BoatState::from_labels`] cannot do without.
    #[must_use]
    pub fn required_labels() -> Vec<String> {
        let mut labels = vec![TIME.to_string()];
        for quantity in BodyKinematics::groups() {
            labels.extend(crate::labels::vector_keys(quantity, BOAT));
        }
        labels.push(scalar_key("m", BOAT));
        labels.extend(AXES.map(|axis| inertia_key(axis, axis)));
        labels
    }
}

fn parse_inertia_key(key: &str) -> Option<(Axis, Axis)> {
    let pair = key.strip_prefix("I_")?.strip_suffix("__boat")?;
    let mut chars = pair.chars();
    let row = chars.next()?;
    let col = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some((
        Axis::from_segment(row.encode_utf8(&mut [0; 4]))?,
        Axis::from_segment(col.encode_utf8(&mut [0; 4]))?,
    ))
}
