//! # Bend Geometry
//!
//! Values derived from the combined bounding box and the parameters:
//! the bend cylinder, its rotation center, and the cut planes.

use super::params::BendDirection;
use crate::bounds::Aabb;
use config::constants::{compute_cut_count, compute_cut_spacing, EPSILON};
use glam::{DMat4, DVec3};
use std::f64::consts::TAU;

/// Derived geometry of one bend.
///
/// Recomputed every time a bend runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BendGeometry {
    /// Combined bounds of the source items in the container frame
    pub bounds: Aabb,
    /// Resolved bend diameter (> 0)
    pub diameter: f64,
    /// `diameter / 2`
    pub radius: f64,
    /// `τ · radius`
    pub circumference: f64,
    /// Center of the polar mapping
    pub rotation_center: DVec3,
    /// Rotation center as stored for drawing. For a concave bend its Y is
    /// mirrored below the part so the overlay shows on the right side.
    pub rotation_offset: DVec3,
    /// X positions of the cut planes, ascending
    pub cuts: Vec<f64>,
    /// Convex or concave
    pub direction: BendDirection,
}

impl BendGeometry {
    /// Derives the bend geometry.
    ///
    /// Returns `None` when the bend is disabled: a diameter that is not
    /// positive, or bounds that are empty or have no width to bend.
    /// `start_percent` and `min_sides` are expected to be clamped already.
    pub fn new(
        bounds: &Aabb,
        diameter: f64,
        start_percent: f64,
        min_sides: f64,
        direction: BendDirection,
    ) -> Option<Self> {
        if !diameter.is_finite() || diameter <= 0.0 || bounds.is_empty() {
            return None;
        }
        let width = bounds.size().x;
        if width <= EPSILON || !bounds.min.is_finite() || !bounds.max.is_finite() {
            return None;
        }

        let radius = diameter / 2.0;
        let circumference = TAU * radius;
        let rotation_center = DVec3::new(
            bounds.min.x + width * (start_percent / 100.0),
            bounds.max.y + radius,
            bounds.center().z,
        );

        let mut rotation_offset = rotation_center;
        if direction == BendDirection::Down {
            rotation_offset.y = bounds.min.y - radius;
        }

        Some(Self {
            bounds: *bounds,
            diameter,
            radius,
            circumference,
            rotation_center,
            rotation_offset,
            cuts: cut_positions(bounds.min.x, width, circumference, min_sides),
            direction,
        })
    }

    /// Width of the bounds along the bend axis.
    pub fn width(&self) -> f64 {
        self.bounds.size().x
    }

    /// Maps a point of the (flipped, for concave bends) container frame onto
    /// the bend cylinder.
    ///
    /// The point's distance from the baseline `y = center.y` becomes its
    /// distance from the cylinder axis, and its X offset from the center
    /// becomes arc length. Z is untouched.
    #[inline]
    pub fn map_point(&self, point: DVec3) -> DVec3 {
        let center = self.rotation_center;
        let angle = (point.x - center.x) / self.circumference * TAU - TAU / 4.0;
        let distance = center.y - point.y;
        let (sin, cos) = angle.sin_cos();
        DVec3::new(
            center.x + cos * distance,
            self.radius + self.bounds.max.y + sin * distance,
            point.z,
        )
    }

    /// Transform applied before the bend map so a concave bend can reuse the
    /// convex math: a half turn about X that maps the bounds onto
    /// themselves in Y. Identity for a convex bend.
    pub fn direction_frame(&self) -> DMat4 {
        match self.direction {
            BendDirection::Up => DMat4::IDENTITY,
            BendDirection::Down => {
                DMat4::from_translation(DVec3::new(0.0, self.bounds.min.y + self.bounds.max.y, 0.0))
                    * DMat4::from_scale(DVec3::new(1.0, -1.0, -1.0))
            }
        }
    }
}

/// X positions of the cut planes for a part spanning `min_x..min_x + width`.
///
/// Cuts start one cut size in from `min_x` and are evenly spaced; see
/// [`compute_cut_count`] for how many there are. When the count is capped
/// the spacing widens so the cuts still span the whole width.
///
/// # Example
///
/// ```rust
/// use curve_mesh::ops::bend::cut_positions;
///
/// // Half a rotation, 10 sides per rotation
/// let cuts = cut_positions(0.0, 50.0, 100.0, 10.0);
/// assert_eq!(cuts, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
/// ```
pub fn cut_positions(min_x: f64, width: f64, circumference: f64, min_sides: f64) -> Vec<f64> {
    let count = compute_cut_count(width, circumference, min_sides);
    let cut_size = compute_cut_spacing(width, circumference, min_sides);
    (1..=count).map(|k| min_x + cut_size * k as f64).collect()
}
