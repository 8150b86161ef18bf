//! # Mesh Items
//!
//! A mesh placed in a container, with the display properties a bend result
//! inherits from its source.

use crate::mesh::Mesh;
use config::constants::DEFAULT_COLOR;
use glam::DMat4;
use serde::{Deserialize, Serialize};

/// A named mesh with its local-to-container matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshItem {
    /// Display name
    pub name: String,
    /// Geometry in item-local space
    pub mesh: Mesh,
    /// Local-to-container transform
    pub matrix: DMat4,
    /// RGBA color
    pub color: [f32; 4],
    /// Material (extruder) index, -1 for inherited
    pub material_index: i32,
    /// Hidden items do not take part in a bend
    pub visible: bool,
}

impl MeshItem {
    /// Creates a visible item at the container origin.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            matrix: DMat4::IDENTITY,
            color: DEFAULT_COLOR,
            material_index: -1,
            visible: true,
        }
    }

    /// Sets the local-to-container transform.
    pub fn with_matrix(mut self, matrix: DMat4) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Creates an item holding `mesh` with this item's name, matrix, color,
    /// material and visibility.
    pub fn with_world_properties_of(source: &MeshItem, mesh: Mesh) -> Self {
        Self {
            name: source.name.clone(),
            mesh,
            matrix: source.matrix,
            color: source.color,
            material_index: source.material_index,
            visible: source.visible,
        }
    }
}
