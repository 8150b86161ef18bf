//! # Curve Mesh
//!
//! Bends triangle meshes around a cylinder, the way a flat strip wraps
//! around a rod.
//!
//! ## Architecture
//!
//! ```text
//! MeshItem[] → bounds → BendGeometry → split along X → map onto cylinder → MeshItem[]
//! ```
//!
//! ## Algorithms
//!
//! - **Split**: cuts triangles with planes perpendicular to X, sharing the
//!   new vertices between neighbouring faces so the result stays closed
//! - **Bend**: polar mapping that turns X offset into arc length and Y
//!   distance into radial distance; Z is untouched
//! - **Concave bends**: the convex map applied in a frame flipped upside
//!   down, then flipped back
//!
//! ## Usage
//!
//! ```rust
//! use curve_mesh::primitives::create_box;
//! use curve_mesh::{bend, BendParams, CancelToken, MeshItem};
//! use glam::DVec3;
//!
//! let plate = create_box(DVec3::ZERO, DVec3::new(100.0, 2.0, 20.0)).unwrap();
//! let items = vec![MeshItem::new("plate", plate)];
//!
//! let output = bend(&items, &BendParams::new(50.0), &CancelToken::new()).unwrap();
//! assert!(output.items[0].mesh.triangle_count() > 12);
//! ```

pub mod bounds;
pub mod error;
pub mod item;
pub mod mesh;
pub mod object;
pub mod ops;
pub mod primitives;
pub mod task;

pub use bounds::Aabb;
pub use error::{BendError, MeshError};
pub use item::MeshItem;
pub use mesh::Mesh;
pub use object::{CurveObject, CylinderOutline, RebuildReport};
pub use ops::bend::{bend, BendDirection, BendOutcome, BendOutput, BendParams, ItemFailure};
pub use task::{BendTask, CancelToken};
