//! Slicing parameters.

/// Parameters for [`slice_half_space`](crate::slice_half_space).
#[derive(Debug, Clone)]
pub struct SliceParams {
    /// Vertices closer than this to the plane are treated as lying on it.
    ///
    /// Keeps nearly-coplanar vertices from producing sliver triangles.
    /// Default: `1e-10`.
    pub snap_tolerance: f64,

    /// Close the cut with planar cap faces. Default: `true`.
    pub cap: bool,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            snap_tolerance: 1e-10,
            cap: true,
        }
    }
}

impl SliceParams {
    /// Set the on-plane snap tolerance.
    #[must_use]
    pub const fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Enable or disable capping.
    #[must_use]
    pub const fn with_cap(mut self, cap: bool) -> Self {
        self.cap = cap;
        self
    }

    /// Surface only: clip without capping.
    #[must_use]
    pub fn uncapped() -> Self {
        Self::default().with_cap(false)
    }
}
