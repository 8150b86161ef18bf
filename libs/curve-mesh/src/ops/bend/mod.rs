//! # Bend (Curve) Operation
//!
//! Wraps meshes around a cylinder.
//!
//! ## Algorithm
//!
//! 1. Bounding box of all source items in the container frame
//! 2. Bend cylinder, rotation center and cut planes from the box
//! 3. Per item: copy, move into the container frame (flipped for a concave
//!    bend), split along the cut planes, map every vertex onto the
//!    cylinder, move back into item space, recompute normals
//!
//! The cut planes bound the angle each straight segment has to cover, so
//! the bent surface keeps at least `min_sides_per_rotation` facets per turn
//! however coarse the input is.
//!
//! ## Example
//!
//! ```rust
//! use curve_mesh::ops::bend::{bend, BendOutcome, BendParams};
//! use curve_mesh::primitives::create_box;
//! use curve_mesh::{CancelToken, MeshItem};
//! use glam::DVec3;
//!
//! let plate = create_box(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0)).unwrap();
//! let items = vec![MeshItem::new("plate", plate)];
//!
//! let output = bend(&items, &BendParams::new(40.0), &CancelToken::new()).unwrap();
//! assert_eq!(output.outcome, BendOutcome::Bent);
//! assert_eq!(output.items.len(), 1);
//! ```

mod geometry;
mod params;

#[cfg(test)]
mod tests;

pub use geometry::{cut_positions, BendGeometry};
pub use params::{BendDirection, BendParams};

use crate::bounds::Aabb;
use crate::error::{BendError, MeshError};
use crate::item::MeshItem;
use crate::ops::split::split_mesh_along_x;
use crate::task::CancelToken;
use config::constants::{EPSILON, MAX_CUT_PLANES, SPLIT_TOLERANCE};
use glam::{DMat4, DVec3};
use rayon::prelude::*;
use tracing::{debug, info, warn};

// =============================================================================
// OUTPUT
// =============================================================================

/// Whether the bend was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BendOutcome {
    /// The items were bent.
    Bent,
    /// The diameter was not positive or the part has no width; the valid
    /// items were returned unchanged.
    Disabled,
}

/// A source item that could not be bent.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Index of the item in the input slice
    pub index: usize,
    /// Name of the item
    pub name: String,
    /// Why it failed
    pub error: MeshError,
}

/// Result of a bend.
#[derive(Debug, Clone)]
pub struct BendOutput {
    /// Whether the bend was applied
    pub outcome: BendOutcome,
    /// One item per visible source item that did not fail, in input order.
    /// Unchanged copies when the bend is disabled.
    pub items: Vec<MeshItem>,
    /// Items that failed, in input order
    pub failures: Vec<ItemFailure>,
    /// Derived geometry, present when the bend was applied
    pub geometry: Option<BendGeometry>,
    /// Diameter after resolving an unset value
    pub diameter: f64,
    /// Start percent after clamping
    pub start_percent: f64,
}

impl BendOutput {
    /// Rotation center as stored for drawing, when the bend was applied.
    pub fn rotation_offset(&self) -> Option<DVec3> {
        self.geometry.as_ref().map(|g| g.rotation_offset)
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Bends the visible `items` around a cylinder.
///
/// The source items are never modified; every output mesh is newly
/// allocated. Items are processed in parallel and returned in input order.
/// A failure in one item is recorded in [`BendOutput::failures`] and does
/// not stop the others.
///
/// ## Errors
///
/// [`BendError::Cancelled`] if `cancel` fires before the bend completes.
/// Partial results are discarded.
pub fn bend(
    items: &[MeshItem],
    params: &BendParams,
    cancel: &CancelToken,
) -> Result<BendOutput, BendError> {
    if cancel.is_cancelled() {
        return Err(BendError::Cancelled);
    }

    let start_percent = params.clamped_start_percent();
    if start_percent != params.start_percent {
        warn!(
            requested = params.start_percent,
            used = start_percent,
            "start percent out of range, clamped"
        );
    }
    let min_sides = params.clamped_min_sides();
    if min_sides != params.min_sides_per_rotation {
        warn!(
            requested = params.min_sides_per_rotation,
            used = min_sides,
            "min sides per rotation out of range, clamped"
        );
    }

    let visible: Vec<(usize, &MeshItem)> =
        items.iter().enumerate().filter(|(_, item)| item.visible).collect();

    let mut failures = Vec::new();
    let mut valid = Vec::with_capacity(visible.len());
    for &(index, item) in &visible {
        match check_item(item) {
            Ok(()) => valid.push((index, item)),
            Err(error) => failures.push(ItemFailure {
                index,
                name: item.name.clone(),
                error,
            }),
        }
    }

    let bounds = valid.iter().fold(Aabb::EMPTY, |bounds, (_, item)| {
        bounds.union(&item.mesh.bounding_box_transformed(&item.matrix))
    });
    let diameter = params.resolve_diameter(&bounds);

    let Some(geometry) =
        BendGeometry::new(&bounds, diameter, start_percent, min_sides, params.direction)
    else {
        debug!(diameter, width = bounds.size().x, "bend disabled");
        log_failures(&failures);
        return Ok(BendOutput {
            outcome: BendOutcome::Disabled,
            items: valid.iter().map(|(_, item)| (*item).clone()).collect(),
            failures,
            geometry: None,
            diameter,
            start_percent,
        });
    };

    debug!(
        diameter,
        circumference = geometry.circumference,
        cuts = geometry.cuts.len(),
        center = ?geometry.rotation_center,
        "bend geometry"
    );
    if geometry.cuts.len() >= MAX_CUT_PLANES {
        warn!(
            cuts = geometry.cuts.len(),
            width = geometry.width(),
            "cut plane limit reached, cuts spaced wider than requested"
        );
    }

    let results: Vec<Option<Result<MeshItem, MeshError>>> = valid
        .par_iter()
        .map(|&(_, item)| bend_item(item, &geometry, cancel))
        .collect();

    if cancel.is_cancelled() {
        info!("bend cancelled");
        return Err(BendError::Cancelled);
    }

    let mut bent = Vec::with_capacity(results.len());
    for (&(index, item), result) in valid.iter().zip(results) {
        match result {
            Some(Ok(bent_item)) => bent.push(bent_item),
            Some(Err(error)) => failures.push(ItemFailure {
                index,
                name: item.name.clone(),
                error,
            }),
            None => return Err(BendError::Cancelled),
        }
    }
    failures.sort_by_key(|failure| failure.index);

    log_failures(&failures);
    info!(
        items = bent.len(),
        failed = failures.len(),
        diameter,
        direction = ?params.direction,
        "bend complete"
    );

    Ok(BendOutput {
        outcome: BendOutcome::Bent,
        items: bent,
        failures,
        geometry: Some(geometry),
        diameter,
        start_percent,
    })
}

// =============================================================================
// PER ITEM
// =============================================================================

fn log_failures(failures: &[ItemFailure]) {
    for failure in failures {
        warn!(item = %failure.name, error = %failure.error, "item not bent");
    }
}

/// Rejects items the bend cannot process.
fn check_item(item: &MeshItem) -> Result<(), MeshError> {
    item.mesh.check_topology()?;
    invert(&item.matrix).map(|_| ())
}

/// Inverse of an item frame, failing for singular or non-finite matrices.
fn invert(matrix: &DMat4) -> Result<DMat4, MeshError> {
    let determinant = matrix.determinant();
    if !determinant.is_finite() || determinant.abs() <= EPSILON {
        return Err(MeshError::degenerate(format!(
            "item transform is not invertible (determinant {determinant})"
        )));
    }
    Ok(matrix.inverse())
}

/// Bends one item. `None` means the bend was cancelled.
fn bend_item(
    item: &MeshItem,
    geometry: &BendGeometry,
    cancel: &CancelToken,
) -> Option<Result<MeshItem, MeshError>> {
    if cancel.is_cancelled() {
        return None;
    }

    let frame = geometry.direction_frame() * item.matrix;
    let inverse = match invert(&frame) {
        Ok(inverse) => inverse,
        Err(error) => return Some(Err(error)),
    };

    let mut mesh = item.mesh.clone();
    mesh.transform(&frame);
    if let Err(error) = split_mesh_along_x(&mut mesh, &geometry.cuts, SPLIT_TOLERANCE) {
        return Some(Err(error));
    }

    if cancel.is_cancelled() {
        return None;
    }

    mesh.map_vertices(|point| geometry.map_point(point));
    mesh.transform(&inverse);
    mesh.compute_normals();

    Some(Ok(MeshItem::with_world_properties_of(item, mesh)))
}
