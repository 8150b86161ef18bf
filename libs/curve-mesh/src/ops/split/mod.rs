//! # Plane Splitting
//!
//! Cuts mesh triangles along planes so that no face crosses a plane.
//!
//! ## Algorithm
//!
//! Each face is cut by every plane it crosses in one pass. The face boundary
//! is walked once with the crossing points inserted on each edge; the points
//! bounding each slab between two neighbouring planes form a convex polygon
//! that is fan-triangulated. A face crossing `n` planes becomes `O(n)`
//! triangles.
//!
//! Vertices inserted on an edge are cached per (edge, plane), so the two
//! faces sharing an edge reuse the same new vertex and the mesh stays
//! manifold.
//!
//! ## Example
//!
//! ```rust
//! use curve_mesh::ops::split::split_mesh_along_x;
//! use curve_mesh::Mesh;
//! use glam::DVec3;
//!
//! let mut mesh = Mesh::from_parts(
//!     vec![DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0)],
//!     vec![[0, 1, 2]],
//! );
//! let stats = split_mesh_along_x(&mut mesh, &[1.0], 0.1).unwrap();
//! assert_eq!(stats.faces_split, 1);
//! ```

mod plane;


pub use plane::{Classification, Plane};

use crate::error::MeshError;
use crate::mesh::{triangle_area, Mesh};
use config::constants::{MAX_TRIANGLES, MAX_VERTICES, VERTEX_MERGE_EPSILON};
use glam::DVec3;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// EDGE CACHE
// =============================================================================

/// Vertices already inserted where an edge meets a plane.
#[derive(Debug, Default)]
pub struct EdgeCache {
    splits: HashMap<(u32, u32, u64), u32>,
}

impl EdgeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex where edge `u v` meets `plane`, inserting it into
    /// `mesh` the first time.
    ///
    /// The point is always computed from the lower index towards the higher,
    /// so both faces of an edge agree on it bit for bit.
    fn edge_point(&mut self, mesh: &mut Mesh, u: u32, v: u32, plane: &Plane) -> u32 {
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        *self
            .splits
            .entry((lo, hi, plane.key()))
            .or_insert_with(|| {
                let a = mesh.vertex(lo);
                let b = mesh.vertex(hi);
                let da = plane.signed_distance(a);
                let db = plane.signed_distance(b);
                let t = da / (da - db);
                mesh.add_vertex(plane.project(a.lerp(b, t)))
            })
    }
}

// =============================================================================
// SINGLE FACE
// =============================================================================

/// A boundary point of a face being sliced, with the first and last slab it
/// belongs to. Slab `s` lies between plane `s - 1` and plane `s`.
type RingPoint = (u32, usize, usize);

/// Splits one triangle by every plane `x = cut` it crosses.
///
/// `cuts` must be sorted ascending and more than `2 * tolerance` apart.
/// Vertices within `tolerance` of a plane count as lying on it; a plane is
/// crossed only when the face reaches beyond the tolerance on both sides.
///
/// Every slab of the face between two neighbouring planes becomes a fan of
/// triangles. Winding is preserved and the pieces exactly cover the original
/// face. Zero-area faces are never split. Returns `None` when nothing was
/// split.
pub fn split_face(
    mesh: &mut Mesh,
    face: [u32; 3],
    cuts: &[f64],
    tolerance: f64,
    cache: &mut EdgeCache,
) -> Option<Vec<[u32; 3]>> {
    let points = face.map(|i| mesh.vertex(i));
    if triangle_area(points[0], points[1], points[2]) < VERTEX_MERGE_EPSILON {
        return None;
    }

    let min_x = points[0].x.min(points[1].x).min(points[2].x);
    let max_x = points[0].x.max(points[1].x).max(points[2].x);
    let first = cuts.partition_point(|&cut| cut <= min_x + tolerance);
    let last = cuts.partition_point(|&cut| cut < max_x - tolerance);
    if first >= last {
        return None;
    }
    let planes: Vec<Plane> = cuts[first..last].iter().map(|&cut| Plane::x(cut)).collect();

    // Face boundary in winding order, crossing points inserted
    let mut ring: Vec<RingPoint> = Vec::with_capacity(3 + 2 * planes.len());
    for k in 0..3 {
        let (a, b) = (face[k], face[(k + 1) % 3]);
        let (pa, pb) = (points[k], points[(k + 1) % 3]);
        ring.push(slab_range(a, pa, &planes, tolerance));

        let start = ring.len();
        for (j, plane) in planes.iter().enumerate() {
            if crosses(plane, pa, pb, tolerance) {
                ring.push((cache.edge_point(mesh, a, b, plane), j, j + 1));
            }
        }
        if pb.x < pa.x {
            ring[start..].reverse();
        }
    }

    let mut slabs: Vec<Vec<u32>> = vec![Vec::new(); planes.len() + 1];
    for &(index, lo, hi) in &ring {
        slabs[lo].push(index);
        if hi != lo {
            slabs[hi].push(index);
        }
    }

    let mut pieces = Vec::with_capacity(3 * slabs.len());
    for polygon in &slabs {
        for k in 1..polygon.len().saturating_sub(1) {
            pieces.push([polygon[0], polygon[k], polygon[k + 1]]);
        }
    }
    Some(pieces)
}

/// Slabs a face vertex belongs to: one, or the two either side of a plane
/// it lies on.
fn slab_range(index: u32, point: DVec3, planes: &[Plane], tolerance: f64) -> RingPoint {
    let slab = planes
        .partition_point(|plane| plane.classify_point(point, tolerance) == Classification::Front);
    match planes.get(slab) {
        Some(plane) if plane.classify_point(point, tolerance) == Classification::Coplanar => {
            (index, slab, slab + 1)
        }
        _ => (index, slab, slab),
    }
}

/// Whether the edge `a b` has its ends beyond `tolerance` on opposite sides.
fn crosses(plane: &Plane, a: DVec3, b: DVec3, tolerance: f64) -> bool {
    matches!(
        (plane.classify_point(a, tolerance), plane.classify_point(b, tolerance)),
        (Classification::Front, Classification::Back)
            | (Classification::Back, Classification::Front)
    )
}

// =============================================================================
// WHOLE MESH
// =============================================================================

/// Counters from a split pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// Faces that were replaced by smaller faces
    pub faces_split: usize,
    /// Vertices inserted on cut planes
    pub vertices_added: usize,
    /// Triangle count before splitting
    pub triangles_before: usize,
    /// Triangle count after splitting
    pub triangles_after: usize,
}

/// Splits every face of `mesh` that crosses one of the planes `x = cut`.
///
/// Cuts may be given in any order; non-finite cuts are ignored. The
/// tolerance shrinks to a quarter of the smallest gap between cuts, so a
/// vertex never lies on two planes. Fails if splitting would exceed the
/// configured vertex or triangle limits, in which case `mesh` may hold extra
/// unreferenced vertices but its faces are unchanged.
pub fn split_mesh_along_x(
    mesh: &mut Mesh,
    cuts: &[f64],
    tolerance: f64,
) -> Result<SplitStats, MeshError> {
    let mut cuts: Vec<f64> = cuts.iter().copied().filter(|c| c.is_finite()).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let triangles_before = mesh.triangle_count();
    let vertices_before = mesh.vertex_count();
    let mut stats = SplitStats {
        triangles_before,
        triangles_after: triangles_before,
        ..SplitStats::default()
    };
    if cuts.is_empty() || triangles_before == 0 {
        return Ok(stats);
    }

    let tolerance = cuts
        .windows(2)
        .fold(tolerance, |tolerance, pair| tolerance.min((pair[1] - pair[0]) / 4.0));

    let mut cache = EdgeCache::new();
    let source = mesh.triangles().to_vec();
    let mut finished = Vec::with_capacity(triangles_before);

    for face in source {
        match split_face(mesh, face, &cuts, tolerance, &mut cache) {
            Some(pieces) => {
                stats.faces_split += 1;
                finished.extend(pieces);
            }
            None => finished.push(face),
        }

        if finished.len() > MAX_TRIANGLES {
            return Err(MeshError::TooManyTriangles {
                count: finished.len(),
                max: MAX_TRIANGLES,
            });
        }
        if mesh.vertex_count() > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: mesh.vertex_count(),
                max: MAX_VERTICES,
            });
        }
    }

    stats.triangles_after = finished.len();
    stats.vertices_added = mesh.vertex_count() - vertices_before;
    mesh.set_triangles(finished);

    debug!(
        cuts = cuts.len(),
        faces_split = stats.faces_split,
        vertices_added = stats.vertices_added,
        triangles = stats.triangles_after,
        "split mesh along x"
    );

    Ok(stats)
}
