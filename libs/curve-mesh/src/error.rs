//! # Curve Errors
//!
//! Error types for mesh preparation and the bend operation.

use thiserror::Error;

/// Errors that can occur while preparing or splitting a single mesh.
///
/// These are scoped to one source item: a bend records them per item and
/// keeps processing the rest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology {
        /// What is wrong with the topology
        message: String,
    },

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry {
        /// What is degenerate
        message: String,
    },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices {
        /// Vertex count reached
        count: usize,
        /// Configured limit
        max: usize,
    },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles {
        /// Triangle count reached
        count: usize,
        /// Configured limit
        max: usize,
    },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }
}

/// Errors that abort a whole bend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BendError {
    /// The caller cancelled the bend; partial results were discarded.
    #[error("Bend cancelled")]
    Cancelled,

    /// The background worker panicked before producing a result.
    #[error("Bend worker panicked: {message}")]
    WorkerPanicked {
        /// Panic payload, when it was a string
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_error_display() {
        let err = MeshError::invalid_topology("triangle 3 references vertex 9");
        assert_eq!(
            err.to_string(),
            "Invalid topology: triangle 3 references vertex 9"
        );

        let err = MeshError::TooManyTriangles { count: 11, max: 10 };
        assert_eq!(err.to_string(), "Too many triangles: 11 (max: 10)");
    }

    #[test]
    fn test_bend_error_display() {
        assert_eq!(BendError::Cancelled.to_string(), "Bend cancelled");
    }
}
