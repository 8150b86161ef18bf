//! # Bend Tests
//!
//! Tests for the bend geometry, the vertex map, and the multi-item
//! operation.

use super::*;
use crate::mesh::Mesh;
use crate::primitives::create_box;
use approx::assert_relative_eq;
use std::f64::consts::{PI, TAU};

fn plate(min: DVec3, max: DVec3) -> MeshItem {
    MeshItem::new("plate", create_box(min, max).unwrap())
}

fn bounds(width: f64) -> Aabb {
    Aabb::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(width, 4.0, 10.0))
}

fn run(items: &[MeshItem], params: &BendParams) -> BendOutput {
    bend(items, params, &CancelToken::new()).unwrap()
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[test]
fn test_center_at_midpoint_for_half_start() {
    let bounds = Aabb::new(DVec3::new(-7.0, 1.0, 2.0), DVec3::new(13.0, 5.0, 8.0));
    let geometry = BendGeometry::new(&bounds, 30.0, 50.0, 10.0, BendDirection::Up).unwrap();

    assert_relative_eq!(geometry.rotation_center.x, 3.0);
    assert_relative_eq!(geometry.rotation_center.y, 5.0 + 15.0);
    assert_relative_eq!(geometry.rotation_center.z, 5.0);
    assert_eq!(geometry.rotation_offset, geometry.rotation_center);
}

#[test]
fn test_center_follows_start_percent() {
    let geometry = BendGeometry::new(&bounds(40.0), 30.0, 0.0, 10.0, BendDirection::Up).unwrap();
    assert_relative_eq!(geometry.rotation_center.x, 0.0);

    let geometry = BendGeometry::new(&bounds(40.0), 30.0, 100.0, 10.0, BendDirection::Up).unwrap();
    assert_relative_eq!(geometry.rotation_center.x, 40.0);
}

#[test]
fn test_concave_offset_mirrored_below_part() {
    let geometry = BendGeometry::new(&bounds(40.0), 30.0, 50.0, 10.0, BendDirection::Down).unwrap();
    assert_relative_eq!(geometry.rotation_offset.y, 0.0 - 15.0);
    // The mapping center is unchanged
    assert_relative_eq!(geometry.rotation_center.y, 4.0 + 15.0);
}

#[test]
fn test_cut_counts_for_exact_ratios() {
    let diameter = 20.0;
    let circumference = PI * diameter;
    for (ratio, expected) in [(0.5, 5), (1.0, 10), (2.0, 20)] {
        let width = circumference * ratio;
        let geometry =
            BendGeometry::new(&bounds(width), diameter, 50.0, 10.0, BendDirection::Up).unwrap();
        assert_eq!(geometry.cuts.len(), expected, "ratio {ratio}");
    }
}

#[test]
fn test_cuts_evenly_spaced_from_min_x() {
    let geometry = BendGeometry::new(
        &Aabb::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(10.0 + 5.0 * PI, 1.0, 1.0)),
        10.0,
        50.0,
        10.0,
        BendDirection::Up,
    )
    .unwrap();

    // Half a rotation: 5 cuts, one every PI
    assert_eq!(geometry.cuts.len(), 5);
    for (k, cut) in geometry.cuts.iter().enumerate() {
        assert_relative_eq!(*cut, 10.0 + PI * (k + 1) as f64, epsilon = 1e-9);
    }
}

#[test]
fn test_at_least_one_cut() {
    let geometry = BendGeometry::new(&bounds(1.0), 1000.0, 50.0, 3.0, BendDirection::Up).unwrap();
    assert_eq!(geometry.cuts.len(), 1);
}

#[test]
fn test_geometry_disabled() {
    assert!(BendGeometry::new(&bounds(40.0), 0.0, 50.0, 10.0, BendDirection::Up).is_none());
    assert!(BendGeometry::new(&bounds(40.0), -3.0, 50.0, 10.0, BendDirection::Up).is_none());
    assert!(BendGeometry::new(&bounds(40.0), f64::NAN, 50.0, 10.0, BendDirection::Up).is_none());
    assert!(BendGeometry::new(&bounds(0.0), 10.0, 50.0, 10.0, BendDirection::Up).is_none());
    assert!(BendGeometry::new(&Aabb::EMPTY, 10.0, 50.0, 10.0, BendDirection::Up).is_none());
}

// =============================================================================
// VERTEX MAP
// =============================================================================

#[test]
fn test_map_point_preserves_radial_distance() {
    let geometry = BendGeometry::new(&bounds(40.0), 25.0, 30.0, 10.0, BendDirection::Up).unwrap();
    let center = geometry.rotation_center;

    for i in 0..=20 {
        for j in 0..=4 {
            let point = DVec3::new(i as f64 * 2.0, j as f64, 3.0);
            let mapped = geometry.map_point(point);

            let radial = (mapped - center).truncate().length();
            assert_relative_eq!(radial, (center.y - point.y).abs(), epsilon = 1e-9);
            assert_eq!(mapped.z, point.z);
        }
    }
}

#[test]
fn test_map_point_fixes_baseline_at_center() {
    let geometry = BendGeometry::new(&bounds(40.0), 25.0, 50.0, 10.0, BendDirection::Up).unwrap();
    let point = DVec3::new(20.0, 4.0, 1.0);
    let mapped = geometry.map_point(point);
    assert_relative_eq!(mapped.x, point.x, epsilon = 1e-9);
    assert_relative_eq!(mapped.y, point.y, epsilon = 1e-9);
}

#[test]
fn test_map_point_arc_length() {
    // A quarter circumference to the right of the center turns a quarter turn
    let geometry = BendGeometry::new(&bounds(40.0), 20.0, 50.0, 10.0, BendDirection::Up).unwrap();
    let center = geometry.rotation_center;
    let point = DVec3::new(center.x + TAU * 10.0 / 4.0, 4.0, 0.0);
    let mapped = geometry.map_point(point);
    assert_relative_eq!(mapped.x, center.x + 10.0, epsilon = 1e-9);
    assert_relative_eq!(mapped.y, center.y, epsilon = 1e-9);
}

// =============================================================================
// OPERATION
// =============================================================================

#[test]
fn test_bend_preserves_radial_distance_of_source_vertices() {
    let item = plate(DVec3::new(0.0, 0.0, -2.0), DVec3::new(60.0, 3.0, 2.0));
    let output = run(std::slice::from_ref(&item), &BendParams::new(40.0));

    let geometry = output.geometry.as_ref().unwrap();
    let center = geometry.rotation_center;
    let bent = &output.items[0].mesh;

    // Splitting only appends vertices, so the first ones are the originals
    for (i, original) in item.mesh.vertices().iter().enumerate() {
        let moved = bent.vertices()[i];
        let radial = (moved - center).truncate().length();
        assert_relative_eq!(radial, center.y - original.y, epsilon = 1e-9);
        assert_eq!(moved.z, original.z);
    }
}

#[test]
fn test_bend_splits_and_recomputes_normals() {
    let item = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));
    let output = run(std::slice::from_ref(&item), &BendParams::new(40.0));
    let bent = &output.items[0].mesh;

    assert!(bent.triangle_count() > item.mesh.triangle_count());
    assert_eq!(bent.face_normals().map(|n| n.len()), Some(bent.triangle_count()));
    assert_eq!(bent.normals().map(|n| n.len()), Some(bent.vertex_count()));
}

#[test]
fn test_bend_does_not_touch_source() {
    let items = vec![plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0))];
    let before = items.clone();
    run(&items, &BendParams::new(40.0));
    assert_eq!(items, before);
}

#[test]
fn test_bend_disabled_is_identity() {
    let items = vec![
        plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0)),
        plate(DVec3::new(0.0, 5.0, 0.0), DVec3::new(30.0, 8.0, 10.0)),
    ];

    for diameter in [0.0, -10.0] {
        let output = run(&items, &BendParams::new(diameter));
        assert_eq!(output.outcome, BendOutcome::Disabled);
        assert_eq!(output.items, items);
        assert!(output.rotation_offset().is_none());
    }
}

#[test]
fn test_bend_zero_width_is_identity() {
    // Every vertex at x = 0
    let mesh = Mesh::from_parts(
        vec![DVec3::ZERO, DVec3::Y, DVec3::Z],
        vec![[0, 1, 2]],
    );
    let items = vec![MeshItem::new("sliver", mesh)];

    let output = run(&items, &BendParams::new(10.0));

    assert_eq!(output.outcome, BendOutcome::Disabled);
    assert_eq!(output.items, items);
}

#[test]
fn test_bend_unset_diameter_defaults_to_width() {
    let items = vec![plate(DVec3::ZERO, DVec3::new(47.9, 3.0, 10.0))];
    let output = run(&items, &BendParams::default());

    assert_eq!(output.diameter, 47.0);
    assert_eq!(output.outcome, BendOutcome::Bent);
}

#[test]
fn test_bend_unset_diameter_on_tiny_part_disables() {
    let items = vec![plate(DVec3::ZERO, DVec3::new(0.5, 3.0, 10.0))];
    let output = run(&items, &BendParams::default());

    assert_eq!(output.diameter, 0.0);
    assert_eq!(output.outcome, BendOutcome::Disabled);
}

#[test]
fn test_bend_clamps_start_percent() {
    let items = vec![plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0))];
    let output = run(&items, &BendParams::new(40.0).with_start_percent(250.0));

    assert_eq!(output.start_percent, 100.0);
    assert_relative_eq!(output.geometry.unwrap().rotation_center.x, 60.0);
}

#[test]
fn test_bend_clamps_min_sides() {
    let width = 20.0 * PI; // one full rotation at diameter 20
    let items = vec![plate(DVec3::ZERO, DVec3::new(width, 3.0, 10.0))];
    let output = run(
        &items,
        &BendParams::new(20.0).with_min_sides_per_rotation(1.0),
    );

    assert_eq!(output.geometry.unwrap().cuts.len(), 3);
}

#[test]
fn test_bend_isolates_failing_item() {
    let broken = MeshItem::new(
        "broken",
        Mesh::from_parts(vec![DVec3::ZERO], vec![[0, 1, 2]]),
    );
    let mut first = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));
    first.name = "first".to_owned();
    let mut last = plate(DVec3::new(0.0, 5.0, 0.0), DVec3::new(30.0, 8.0, 10.0));
    last.name = "last".to_owned();

    let output = run(&[first, broken, last], &BendParams::new(40.0));

    assert_eq!(output.outcome, BendOutcome::Bent);
    let names: Vec<_> = output.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["first", "last"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].index, 1);
    assert!(matches!(
        output.failures[0].error,
        MeshError::InvalidTopology { .. }
    ));
}

#[test]
fn test_bend_rejects_singular_matrix() {
    let item = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0))
        .with_matrix(DMat4::from_scale(DVec3::new(1.0, 0.0, 1.0)));
    let other = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));

    let output = run(&[item, other], &BendParams::new(40.0));

    assert_eq!(output.items.len(), 1);
    assert!(matches!(
        output.failures[0].error,
        MeshError::DegenerateGeometry { .. }
    ));
}

#[test]
fn test_bend_skips_hidden_items() {
    let mut hidden = plate(DVec3::ZERO, DVec3::new(500.0, 3.0, 10.0));
    hidden.visible = false;
    let shown = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));

    let output = run(&[hidden, shown], &BendParams::default());

    assert_eq!(output.items.len(), 1);
    // Hidden items do not widen the bounds either
    assert_eq!(output.diameter, 60.0);
}

#[test]
fn test_bend_cancelled_before_start() {
    let items = vec![plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0))];
    let cancel = CancelToken::new();
    cancel.cancel();

    assert_eq!(
        bend(&items, &BendParams::new(40.0), &cancel).unwrap_err(),
        BendError::Cancelled
    );
}

#[test]
fn test_bend_result_in_item_space() {
    // Same geometry, once placed by the item matrix and once baked in
    let offset = DVec3::new(5.0, 1.0, 0.0);
    let mesh = create_box(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0)).unwrap();
    let placed = MeshItem::new("placed", mesh.clone()).with_matrix(DMat4::from_translation(offset));
    let mut baked_mesh = mesh;
    baked_mesh.translate(offset);
    let baked = MeshItem::new("baked", baked_mesh);

    let params = BendParams::new(40.0);
    let from_placed = run(&[placed], &params).items.remove(0);
    let from_baked = run(&[baked], &params).items.remove(0);

    assert_eq!(from_placed.matrix, DMat4::from_translation(offset));
    assert_eq!(from_placed.mesh.vertex_count(), from_baked.mesh.vertex_count());
    for (local, world) in from_placed
        .mesh
        .vertices()
        .iter()
        .zip(from_baked.mesh.vertices())
    {
        let placed_world = from_placed.matrix.transform_point3(*local);
        assert_relative_eq!(placed_world.x, world.x, epsilon = 1e-9);
        assert_relative_eq!(placed_world.y, world.y, epsilon = 1e-9);
        assert_relative_eq!(placed_world.z, world.z, epsilon = 1e-9);
    }
}

#[test]
fn test_bend_down_is_conjugated_bend_up() {
    // A concave bend is the convex bend of the flipped part, flipped back
    let mesh = Mesh::from_parts(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(50.0, 1.0, 2.0),
            DVec3::new(10.0, 6.0, -1.0),
            DVec3::new(35.0, 2.0, 4.0),
        ],
        vec![[0, 1, 2], [1, 3, 2]],
    );
    let item = MeshItem::new("tri", mesh);
    let params = BendParams::new(30.0).with_start_percent(20.0);

    let down = run(
        std::slice::from_ref(&item),
        &params.clone().with_direction(BendDirection::Down),
    )
    .items
    .remove(0);

    let flip = down_flip(&item);
    let mut flipped = item.clone();
    flipped.mesh.transform(&flip);
    let up = run(&[flipped], &params).items.remove(0);

    assert_eq!(up.mesh.vertex_count(), down.mesh.vertex_count());
    for (u, d) in up.mesh.vertices().iter().zip(down.mesh.vertices()) {
        let mirrored = flip.transform_point3(*u);
        assert_relative_eq!(mirrored.x, d.x, epsilon = 1e-9);
        assert_relative_eq!(mirrored.y, d.y, epsilon = 1e-9);
        assert_relative_eq!(mirrored.z, d.z, epsilon = 1e-9);
    }
}

fn down_flip(item: &MeshItem) -> DMat4 {
    let bounds = item.mesh.bounding_box();
    BendGeometry::new(&bounds, 1.0, 50.0, 10.0, BendDirection::Down)
        .unwrap()
        .direction_frame()
}

#[test]
fn test_cut_cap_still_spans_whole_width() {
    let geometry =
        BendGeometry::new(&bounds(1000.0), 1.0, 50.0, 360.0, BendDirection::Up).unwrap();

    assert_eq!(geometry.cuts.len(), MAX_CUT_PLANES);
    assert_relative_eq!(*geometry.cuts.last().unwrap(), 1000.0, epsilon = 1e-6);
    assert_relative_eq!(geometry.cuts[1] - geometry.cuts[0], 0.01, epsilon = 1e-9);
}

#[test]
fn test_bend_many_cuts_stays_within_limits() {
    // Over ten thousand cuts across a plain box
    let items = vec![plate(DVec3::ZERO, DVec3::new(200.0, 1.0, 5.0))];
    let output = run(&items, &BendParams::new(2.0).with_min_sides_per_rotation(360.0));

    let cuts = output.geometry.as_ref().unwrap().cuts.len();
    assert!(cuts > 10_000);
    assert!(output.failures.is_empty());
    assert_eq!(output.items.len(), 1);
    assert!(output.items[0].mesh.triangle_count() <= 16 * cuts + 12);
}

#[test]
fn test_bend_disabled_reports_broken_items() {
    let broken = MeshItem::new(
        "broken",
        Mesh::from_parts(vec![DVec3::ZERO], vec![[0, 1, 2]]),
    );
    let good = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));

    let output = run(&[broken, good.clone()], &BendParams::new(0.0));

    assert_eq!(output.outcome, BendOutcome::Disabled);
    assert_eq!(output.items, vec![good]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].index, 0);
}

#[test]
fn test_bend_item_stops_when_cancelled() {
    let item = plate(DVec3::ZERO, DVec3::new(60.0, 3.0, 10.0));
    let geometry = BendGeometry::new(
        &item.mesh.bounding_box(),
        40.0,
        50.0,
        10.0,
        BendDirection::Up,
    )
    .unwrap();
    let cancel = CancelToken::new();

    assert!(matches!(bend_item(&item, &geometry, &cancel), Some(Ok(_))));
    cancel.cancel();
    assert!(bend_item(&item, &geometry, &cancel).is_none());
}
