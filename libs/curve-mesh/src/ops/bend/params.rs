//! # Bend Parameters
//!
//! Editor-facing parameters. They are persisted with the curve object and
//! may drift out of range, so out-of-range values are corrected on use
//! rather than rejected.

use crate::bounds::Aabb;
use config::constants::{
    DEFAULT_MIN_SIDES_PER_ROTATION, DEFAULT_START_PERCENT, MAX_SIDES_PER_ROTATION,
    MAX_START_PERCENT, MIN_SIDES_PER_ROTATION, MIN_START_PERCENT,
};
use serde::{Deserialize, Serialize};

/// Which side of the part the bend cylinder sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BendDirection {
    /// Convex: the part wraps around a cylinder above it.
    #[default]
    Up,
    /// Concave: the part wraps around a cylinder below it.
    Down,
}

/// Parameters of a bend.
///
/// # Example
///
/// ```rust
/// use curve_mesh::ops::bend::{BendDirection, BendParams};
///
/// let params = BendParams::new(60.0)
///     .with_start_percent(25.0)
///     .with_direction(BendDirection::Down);
/// assert_eq!(params.diameter, Some(60.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendParams {
    /// Bend cylinder diameter. `None` until first use, when it defaults to
    /// the part's width along the bend axis.
    pub diameter: Option<f64>,
    /// Where the bend starts, as a percent of the part width (0-100)
    pub start_percent: f64,
    /// Minimum number of sides per full rotation (3-360)
    pub min_sides_per_rotation: f64,
    /// Convex or concave bend
    pub direction: BendDirection,
}

impl Default for BendParams {
    fn default() -> Self {
        Self {
            diameter: None,
            start_percent: DEFAULT_START_PERCENT,
            min_sides_per_rotation: DEFAULT_MIN_SIDES_PER_ROTATION,
            direction: BendDirection::Up,
        }
    }
}

impl BendParams {
    /// Default parameters with an explicit diameter.
    pub fn new(diameter: f64) -> Self {
        Self {
            diameter: Some(diameter),
            ..Self::default()
        }
    }

    /// Sets the start percent.
    pub fn with_start_percent(mut self, start_percent: f64) -> Self {
        self.start_percent = start_percent;
        self
    }

    /// Sets the minimum sides per rotation.
    pub fn with_min_sides_per_rotation(mut self, sides: f64) -> Self {
        self.min_sides_per_rotation = sides;
        self
    }

    /// Sets the bend direction.
    pub fn with_direction(mut self, direction: BendDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Start percent clamped to 0-100. Non-finite values fall back to the
    /// default.
    pub fn clamped_start_percent(&self) -> f64 {
        if self.start_percent.is_finite() {
            self.start_percent.clamp(MIN_START_PERCENT, MAX_START_PERCENT)
        } else {
            DEFAULT_START_PERCENT
        }
    }

    /// Sides per rotation clamped to 3-360. Non-finite values fall back to
    /// the default.
    pub fn clamped_min_sides(&self) -> f64 {
        if self.min_sides_per_rotation.is_finite() {
            self.min_sides_per_rotation
                .clamp(MIN_SIDES_PER_ROTATION, MAX_SIDES_PER_ROTATION)
        } else {
            DEFAULT_MIN_SIDES_PER_ROTATION
        }
    }

    /// The diameter to bend with.
    ///
    /// An unset diameter becomes the width of `bounds` along X, truncated to
    /// a whole unit.
    pub fn resolve_diameter(&self, bounds: &Aabb) -> f64 {
        self.diameter.unwrap_or_else(|| bounds.size().x.trunc())
    }
}
