//! # Cut Plane
//!
//! Planes perpendicular to the bend axis, with point classification.

use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Point is in front of plane (positive side).
    Front,
    /// Point is behind plane (negative side).
    Back,
    /// Point is on the plane, within tolerance.
    Coplanar,
}

// =============================================================================
// PLANE
// =============================================================================

/// The plane `x = position`, facing +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    position: f64,
}

impl Plane {
    /// The plane `x = cut`.
    pub fn x(cut: f64) -> Self {
        Self { position: cut }
    }

    /// Signed distance from point to plane.
    ///
    /// Positive = front, negative = back, zero = on plane.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        point.x - self.position
    }

    /// Classify a point relative to this plane.
    pub fn classify_point(&self, point: DVec3, tolerance: f64) -> Classification {
        let dist = self.signed_distance(point);
        if dist > tolerance {
            Classification::Front
        } else if dist < -tolerance {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Closest point on the plane. Exact in X.
    pub fn project(&self, point: DVec3) -> DVec3 {
        DVec3::new(self.position, point.y, point.z)
    }

    /// Bit pattern identifying this plane, for hashing.
    pub(crate) fn key(&self) -> u64 {
        self.position.to_bits()
    }
}

// =============================================================================
// TESTS
// =============================================================================
