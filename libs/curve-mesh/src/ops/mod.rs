//! # Mesh Operations
//!
//! Splitting meshes along cut planes, and the bend built on top of it.

pub mod bend;
pub mod split;

pub use bend::{bend, BendOutcome, BendOutput, BendParams};
pub use split::split_mesh_along_x;
