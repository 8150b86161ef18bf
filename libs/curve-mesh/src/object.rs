//! # Curve Object
//!
//! The re-editable curve operation: a source container, the bend
//! parameters, and the bent children produced by the last rebuild.
//!
//! While the bend is applied the source is hidden and the children are
//! shown. A disabled bend (non-positive diameter) shows the source again.
//!
//! ## Example
//!
//! ```rust
//! use curve_mesh::primitives::create_box;
//! use curve_mesh::{CancelToken, CurveObject, MeshItem};
//! use glam::DVec3;
//!
//! let plate = create_box(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0)).unwrap();
//! let mut curve = CurveObject::new(vec![MeshItem::new("plate", plate)]);
//!
//! let report = curve.rebuild(&CancelToken::new()).unwrap();
//! assert!(report.properties_updated);
//! assert_eq!(curve.params.diameter, Some(60.0));
//! assert!(!curve.source_visible);
//! ```

use crate::bounds::Aabb;
use crate::error::BendError;
use crate::item::MeshItem;
use crate::ops::bend::{bend, BendOutcome, BendParams, ItemFailure};
use crate::task::CancelToken;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::info;

/// A curve operation applied to a set of source items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveObject {
    /// Bend parameters, written back by [`CurveObject::rebuild`]
    pub params: BendParams,
    /// Rotation center of the last applied bend, in the container frame
    #[serde(default)]
    pub rotation_offset: DVec3,
    /// Items being bent. Never modified by a rebuild.
    pub source: Vec<MeshItem>,
    /// Whether the source is displayed instead of the children
    pub source_visible: bool,
    /// Bent results of the last rebuild
    #[serde(default)]
    pub children: Vec<MeshItem>,
}

/// What a rebuild did.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildReport {
    /// Whether the bend was applied
    pub outcome: BendOutcome,
    /// A persisted parameter was changed (diameter resolved from unset, or
    /// start percent clamped); editors should refresh their fields.
    pub properties_updated: bool,
    /// Source items that could not be bent
    pub failures: Vec<ItemFailure>,
}

/// Preview of the bend cylinder.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderOutline {
    /// Axis center
    pub center: DVec3,
    /// Cylinder diameter
    pub diameter: f64,
    /// Extent along the axis (Z)
    pub height: f64,
    /// Circle at the bottom of the source Z extent
    pub bottom: Vec<DVec3>,
    /// Circle at the top of the source Z extent
    pub top: Vec<DVec3>,
}

impl CurveObject {
    /// Wraps `source` with default parameters. Nothing is bent until the
    /// first [`CurveObject::rebuild`].
    pub fn new(source: Vec<MeshItem>) -> Self {
        Self {
            params: BendParams::default(),
            rotation_offset: DVec3::ZERO,
            source,
            source_visible: true,
            children: Vec::new(),
        }
    }

    /// Whether the children currently replace the source.
    pub fn is_bent(&self) -> bool {
        !self.source_visible
    }

    /// The items a viewer should draw.
    pub fn displayed_items(&self) -> &[MeshItem] {
        if self.source_visible {
            &self.source
        } else {
            &self.children
        }
    }

    /// Re-runs the bend from the source items.
    ///
    /// ## Errors
    ///
    /// [`BendError::Cancelled`] if `cancel` fires. The previous children,
    /// rotation offset and visibility are kept; clamped parameters are
    /// still written back.
    pub fn rebuild(&mut self, cancel: &CancelToken) -> Result<RebuildReport, BendError> {
        let mut properties_updated = self.params.diameter.is_none();

        let start_percent = self.params.clamped_start_percent();
        if start_percent != self.params.start_percent {
            self.params.start_percent = start_percent;
            properties_updated = true;
        }

        let output = bend(&self.source, &self.params, cancel)?;
        self.params.diameter = Some(output.diameter);

        match output.outcome {
            BendOutcome::Bent => {
                if let Some(offset) = output.rotation_offset() {
                    self.rotation_offset = offset;
                }
                self.children = output.items;
                self.source_visible = false;
            }
            BendOutcome::Disabled => {
                self.children.clear();
                self.source_visible = true;
            }
        }

        info!(
            outcome = ?output.outcome,
            children = self.children.len(),
            properties_updated,
            "curve rebuilt"
        );

        Ok(RebuildReport {
            outcome: output.outcome,
            properties_updated,
            failures: output.failures,
        })
    }

    /// Outline of the bend cylinder for previewing, with `segments` points
    /// per ring (at least 3).
    ///
    /// Returns `None` while the bend is not applied.
    pub fn overlay_outline(&self, segments: u32) -> Option<CylinderOutline> {
        let diameter = self.params.diameter?;
        if !self.is_bent() || !diameter.is_finite() || diameter <= 0.0 {
            return None;
        }

        let bounds = self
            .source
            .iter()
            .filter(|item| item.visible)
            .fold(Aabb::EMPTY, |bounds, item| {
                bounds.union(&item.mesh.bounding_box_transformed(&item.matrix))
            });
        if bounds.is_empty() {
            return None;
        }

        let center = self.rotation_offset;
        let radius = diameter / 2.0;
        let segments = segments.max(3);
        let ring = |z: f64| -> Vec<DVec3> {
            (0..segments)
                .map(|i| {
                    let (sin, cos) = (TAU * f64::from(i) / f64::from(segments)).sin_cos();
                    DVec3::new(center.x + cos * radius, center.y + sin * radius, z)
                })
                .collect()
        };

        Some(CylinderOutline {
            center,
            diameter,
            height: bounds.size().z,
            bottom: ring(bounds.min.z),
            top: ring(bounds.max.z),
        })
    }
}
