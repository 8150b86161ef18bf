//! # Configuration Constants
//!
//! Centralized constants for the curve pipeline. All precision values,
//! bend defaults, and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Bend**: Default bend parameters and their valid ranges
//! - **Limits**: Maximum values for safety bounds
//! - **Display**: Overlay and color defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon below which a triangle is considered to have no area.
///
/// Zero-area faces are passed through the splitter untouched.
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Distance from a cut plane within which a vertex counts as lying on it.
///
/// Faces are only split when they reach further than this on both sides of
/// the plane, which keeps the splitter from producing slivers.
///
/// # Example
///
/// ```rust
/// use config::constants::SPLIT_TOLERANCE;
///
/// let distance_to_plane: f64 = 0.05;
/// assert!(distance_to_plane.abs() <= SPLIT_TOLERANCE);
/// ```
pub const SPLIT_TOLERANCE: f64 = 0.1;

/// Slack added before flooring the cut count.
///
/// Width/circumference ratios that are exact on paper (0.5, 1.0, 2.0) come
/// out a few ulps low after the division.
pub const CUT_COUNT_EPSILON: f64 = 1e-9;

// =============================================================================
// BEND CONSTANTS
// =============================================================================

/// Default start of the bend, as a percent of the part width.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_START_PERCENT;
///
/// let user_start: Option<f64> = None;
/// assert_eq!(user_start.unwrap_or(DEFAULT_START_PERCENT), 50.0);
/// ```
pub const DEFAULT_START_PERCENT: f64 = 50.0;

/// Lowest valid start percent.
pub const MIN_START_PERCENT: f64 = 0.0;

/// Highest valid start percent.
pub const MAX_START_PERCENT: f64 = 100.0;

/// Default minimum number of sides per full rotation.
pub const DEFAULT_MIN_SIDES_PER_ROTATION: f64 = 10.0;

/// Fewest sides per rotation that still approximate a circle.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_SIDES_PER_ROTATION;
///
/// let requested: f64 = 2.0;
/// assert_eq!(requested.max(MIN_SIDES_PER_ROTATION), 3.0);
/// ```
pub const MIN_SIDES_PER_ROTATION: f64 = 3.0;

/// Most sides per rotation accepted from the editor.
pub const MAX_SIDES_PER_ROTATION: f64 = 360.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of cut planes generated for a single bend.
///
/// A tiny diameter on a wide part would otherwise ask for millions of cuts.
pub const MAX_CUT_PLANES: usize = 100_000;

/// Maximum number of vertices in a single mesh.
///
/// Safety limit to prevent memory exhaustion while splitting.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// DISPLAY CONSTANTS
// =============================================================================

/// Default color when none is specified (light gray).
///
/// RGBA values in range [0.0, 1.0].
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Number of segments in each ring of the bend cylinder overlay.
pub const OVERLAY_SEGMENTS: u32 = 30;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes how many cut planes a bend needs.
///
/// The part is cut often enough that every full rotation gets at least
/// `min_sides` segments. The count is never below 1 and never above
/// [`MAX_CUT_PLANES`].
///
/// # Arguments
///
/// * `width` - Extent of the part along the bend axis
/// * `circumference` - Circumference of the bend cylinder
/// * `min_sides` - Minimum sides per rotation
///
/// # Example
///
/// ```rust
/// use config::constants::compute_cut_count;
///
/// // Half a rotation at 10 sides per rotation
/// assert_eq!(compute_cut_count(5.0, 10.0, 10.0), 5);
///
/// // Never fewer than one cut
/// assert_eq!(compute_cut_count(0.1, 1000.0, 3.0), 1);
/// ```
pub fn compute_cut_count(width: f64, circumference: f64, min_sides: f64) -> usize {
    if circumference.is_nan() || circumference <= 0.0 || !width.is_finite() {
        return 1;
    }
    let cuts = (width / circumference * min_sides).max(1.0);
    let cuts = (cuts + CUT_COUNT_EPSILON).floor();
    if cuts >= MAX_CUT_PLANES as f64 {
        MAX_CUT_PLANES
    } else {
        cuts as usize
    }
}

/// Distance between neighbouring cut planes.
///
/// Spreads [`compute_cut_count`] cuts over the full width. Below the cap this
/// is one segment per `1 / min_sides` of a rotation; at the cap the spacing
/// widens so the last cut still reaches the far end of the part.
///
/// # Example
///
/// ```rust
/// use config::constants::{compute_cut_spacing, MAX_CUT_PLANES};
///
/// assert_eq!(compute_cut_spacing(5.0, 10.0, 10.0), 1.0);
///
/// // Capped: the cuts still cover the whole width
/// let spacing = compute_cut_spacing(1e9, 1.0, 360.0);
/// assert_eq!(spacing, 1e9 / MAX_CUT_PLANES as f64);
/// ```
pub fn compute_cut_spacing(width: f64, circumference: f64, min_sides: f64) -> f64 {
    if circumference.is_nan() || circumference <= 0.0 || !width.is_finite() {
        return width;
    }
    let cuts = (width / circumference * min_sides).clamp(1.0, MAX_CUT_PLANES as f64);
    width / cuts
}
