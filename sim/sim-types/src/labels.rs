//! Key construction for labeled quantities.
//!
//! Keys follow the convention `<quantity>_<axis>__<owner>` for vector
//! components and `<quantity>__<owner>` for scalars. The owner is `boat`,
//! `water`, `total` or a generator name.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Owner segment for the hull's own quantities.
pub const BOAT: &str = "boat";

/// Owner segment for environment quantities of the water body.
pub const WATER: &str = "water";

/// Owner segment for the summed wrench.
pub const TOTAL: &str = "total";

/// Key of the simulation clock.
pub const TIME: &str = "t";

/// A Cartesian axis of the world or body frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

/// All axes in component order.
pub const AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

impl Axis {
    /// Lower-case name used inside keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    /// Component index into a `Vector3`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Parse an axis from its key segment.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one component of a vector quantity, e.g. `v_x__water`.
#[must_use]
pub fn vector_key(quantity: &str, axis: Axis, owner: &str) -> String {
    format!("{quantity}_{axis}__{owner}")
}

/// Keys of all three components of a vector quantity.
#[must_use]
pub fn vector_keys(quantity: &str, owner: &str) -> [String; 3] {
    AXES.map(|axis| vector_key(quantity, axis, owner))
}

/// Key of a scalar quantity, e.g. `rho__water`.
#[must_use]
pub fn scalar_key(quantity: &str, owner: &str) -> String {
    format!("{quantity}__{owner}")
}

/// Key of an inertia tensor component, e.g. `I_xy__boat`.
#[must_use]
pub fn inertia_key(row: Axis, col: Axis) -> String {
    format!("I_{row}{col}__{BOAT}")
}

/// Split a vector key into its quantity, axis and owner.
///
/// Returns `None` for scalar keys and keys outside the convention.
#[must_use]
pub fn parse_vector_key(key: &str) -> Option<(&str, Axis, &str)> {
    let (head, owner) = key.split_once("__")?;
    let (quantity, axis) = head.rsplit_once('_')?;
    if quantity.is_empty() || owner.is_empty() {
        return None;
    }
    Some((quantity, Axis::from_segment(axis)?, owner))
}
