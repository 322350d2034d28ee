//! Error types for slicing.

use thiserror::Error;

/// Errors that can occur while slicing.
#[derive(Debug, Error)]
pub enum SliceError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Offending face.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Total number of vertices.
        vertex_count: usize,
    },

    /// The cutting plane normal is zero or not finite.
    #[error("invalid cutting plane normal: {0:?}")]
    InvalidPlane([f64; 3]),

    /// Snap tolerance is negative or not finite.
    #[error("invalid snap tolerance: {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SliceError::InvalidTolerance(-0.1);
        assert!(err.to_string().contains("-0.1"));

        let err = SliceError::InvalidIndex {
            face: 3,
            index: 9,
            vertex_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "face 3 references vertex 9, mesh has 8 vertices"
        );
    }
}
