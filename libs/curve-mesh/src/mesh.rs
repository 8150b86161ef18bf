//! # Mesh Data Structure
//!
//! Triangle mesh with positions, indices, and derived normals.

use crate::bounds::Aabb;
use crate::error::MeshError;
use config::constants::VERTEX_MERGE_EPSILON;
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64. Normals are derived data: anything
/// that moves vertices drops them, and [`Mesh::compute_normals`] rebuilds
/// them.
///
/// # Example
///
/// ```rust
/// use curve_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Per-vertex normals, area weighted
    #[serde(skip)]
    normals: Option<Vec<DVec3>>,
    /// Per-face unit normals
    #[serde(skip)]
    face_normals: Option<Vec<DVec3>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
            face_normals: None,
        }
    }

    /// Creates a mesh from vertex positions and triangle indices.
    ///
    /// Indices are not checked; see [`Mesh::check_topology`].
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            normals: None,
            face_normals: None,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Moves a vertex. Invalidates normals.
    pub fn set_vertex(&mut self, index: u32, position: DVec3) {
        self.vertices[index as usize] = position;
        self.clear_normals();
    }

    /// Replaces every vertex with `f(vertex)`. Invalidates normals.
    pub fn map_vertices(&mut self, mut f: impl FnMut(DVec3) -> DVec3) {
        for v in &mut self.vertices {
            *v = f(*v);
        }
        self.clear_normals();
    }

    /// Replaces the triangle list. Invalidates normals.
    pub fn set_triangles(&mut self, triangles: Vec<[u32; 3]>) {
        self.triangles = triangles;
        self.clear_normals();
    }

    /// Returns the vertex normals, if computed.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Returns the face normals, if computed.
    pub fn face_normals(&self) -> Option<&[DVec3]> {
        self.face_normals.as_deref()
    }

    fn clear_normals(&mut self) {
        self.normals = None;
        self.face_normals = None;
    }

    /// Computes face normals and area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];
        let mut face_normals = Vec::with_capacity(self.triangles.len());

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;

            face_normals.push(normal.normalize_or_zero());
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
        self.face_normals = Some(face_normals);
    }

    /// Area of the triangle at `index`.
    pub fn triangle_area(&self, index: usize) -> f64 {
        let [a, b, c] = self.triangles[index];
        triangle_area(self.vertex(a), self.vertex(b), self.vertex(c))
    }

    /// Sum of all triangle areas.
    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len()).map(|i| self.triangle_area(i)).sum()
    }

    /// Computes the axis-aligned bounding box.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Bounding box of the vertices after applying `matrix`.
    ///
    /// Tighter than transforming the local box when the matrix rotates.
    pub fn bounding_box_transformed(&self, matrix: &DMat4) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        for v in &self.vertices {
            aabb.expand(matrix.transform_point3(*v));
        }
        aabb
    }

    /// Transforms all vertices by a 4x4 matrix.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        // Transform normals if present (use inverse transpose for normals)
        if self.normals.is_some() || self.face_normals.is_some() {
            let normal_matrix = matrix.inverse().transpose();
            for normals in [&mut self.normals, &mut self.face_normals]
                .into_iter()
                .flatten()
            {
                for n in normals.iter_mut() {
                    *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
                }
            }
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (repeated index or zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        if self.check_topology().is_err() {
            return false;
        }

        for (i, tri) in self.triangles.iter().enumerate() {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            if self.triangle_area(i) < VERTEX_MERGE_EPSILON {
                return false;
            }
        }

        true
    }

    /// Checks that every index is in range and every vertex is finite.
    ///
    /// Unlike [`Mesh::validate`] this accepts degenerate triangles, which
    /// are legal input to the bend.
    pub fn check_topology(&self) -> Result<(), MeshError> {
        if let Some(i) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::degenerate(format!(
                "vertex {i} has a non-finite coordinate"
            )));
        }

        let vertex_count = self.vertices.len();
        for (i, tri) in self.triangles.iter().enumerate() {
            if let Some(bad) = tri.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MeshError::invalid_topology(format!(
                    "triangle {i} references vertex {bad} but the mesh has {vertex_count} vertices"
                )));
            }
        }

        Ok(())
    }
}

/// Area of the triangle `a b c`.
#[inline]
pub fn triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    (b - a).cross(c - a).length() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh::from_parts(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]])
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let aabb = mesh.bounding_box();
        assert_eq!(aabb.min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_mesh_area() {
        let mesh = unit_triangle();
        assert!((mesh.triangle_area(0) - 0.5).abs() < 1e-12);
        assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_compute_normals() {
        let mut mesh = unit_triangle();
        mesh.compute_normals();
        assert_eq!(mesh.face_normals(), Some(&[DVec3::Z][..]));
        assert_eq!(mesh.normals().map(|n| n.len()), Some(3));

        mesh.set_vertex(2, DVec3::new(0.0, 2.0, 0.0));
        assert!(mesh.normals().is_none(), "moving a vertex drops normals");
    }

    #[test]
    fn test_mesh_validate_valid() {
        assert!(unit_triangle().validate());
    }

    #[test]
    fn test_mesh_validate_invalid_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
        assert!(matches!(
            mesh.check_topology(),
            Err(MeshError::InvalidTopology { .. })
        ));
    }

    #[test]
    fn test_check_topology_accepts_zero_area() {
        let mesh = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0], vec![[0, 1, 2]]);
        assert!(mesh.check_topology().is_ok());
        assert!(!mesh.validate());
    }

    #[test]
    fn test_check_topology_rejects_nan() {
        let mesh = Mesh::from_parts(vec![DVec3::new(f64::NAN, 0.0, 0.0)], vec![]);
        assert!(matches!(
            mesh.check_topology(),
            Err(MeshError::DegenerateGeometry { .. })
        ));
    }
}
