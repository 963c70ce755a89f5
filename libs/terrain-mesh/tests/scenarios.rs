//! # Mesh Builder Scenarios
//!
//! Hand-counted grids run through `build_mesh` and the simplifier.

use config::constants::{RealiseConfig, NODATA};
use heightfield::{HeightField, HeightGrid};
use terrain_mesh::{build_mesh, simplify, simplify_to_fixed_point, Mesh, SimplifyReport};

// =============================================================================
// HELPERS
// =============================================================================

fn field(rows: Vec<Vec<f64>>, config: &RealiseConfig) -> HeightField {
    let grid = HeightGrid::from_rows(rows, NODATA).unwrap();
    HeightField::prepare(&grid, config).unwrap()
}

fn mesh_of(rows: Vec<Vec<f64>>) -> Mesh {
    build_mesh(&field(rows, &RealiseConfig::default()))
}

/// Faces of vertical walls.
fn walls(mesh: &Mesh) -> Vec<[u32; 3]> {
    mesh.faces()
        .iter()
        .filter(|f| f.normal.z == 0.0)
        .map(|f| f.indices)
        .collect()
}

fn top_faces(mesh: &Mesh) -> usize {
    mesh.faces().iter().filter(|f| f.normal.z > 0.0).count()
}

fn plateau(n: usize) -> Vec<Vec<f64>> {
    vec![vec![10.0; n]; n]
}

// =============================================================================
// PLATEAU
// =============================================================================

/// Only the two corner cells own a triangle; all four sides get walls.
#[test]
fn plateau_2x2() {
    let mesh = mesh_of(plateau(2));
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 12);
    assert_eq!(walls(&mesh).len(), 8);
    assert_eq!(top_faces(&mesh), 2);
    assert!(mesh.is_watertight());

    let (min, max) = mesh.bounding_box();
    assert_eq!((min.z, max.z), (-1.0, 10.0));
}

#[test]
fn plateau_3x3_and_5x5() {
    let mesh = mesh_of(plateau(3));
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (18, 32));
    assert_eq!(walls(&mesh).len(), 16);
    assert!(mesh.is_watertight());

    let mesh = mesh_of(plateau(5));
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (50, 96));
    assert_eq!(walls(&mesh).len(), 32);
    assert_eq!(top_faces(&mesh), 32);
    assert!(mesh.is_watertight());
}

// =============================================================================
// INTERIOR HOLE
// =============================================================================

/// A hole at (2, 2) adds walls around it and nowhere else.
#[test]
fn interior_hole_gets_walls_on_its_perimeter() {
    let mut rows = plateau(5);
    rows[2][2] = NODATA;
    let mesh = mesh_of(rows);

    assert_eq!(mesh.vertex_count(), 48);
    assert_eq!(mesh.face_count(), 96);
    assert_eq!(top_faces(&mesh), 28);
    assert!(mesh.validate());
    assert!(mesh.is_watertight());

    let near_hole = |i: u32| {
        let v = mesh.vertex(i);
        (v.x - 2.0).abs() <= 1.0 && (v.y - 2.0).abs() <= 1.0
    };
    let walls = walls(&mesh);
    let hole_walls: Vec<_> = walls
        .iter()
        .filter(|w| w.iter().all(|&i| near_hole(i)))
        .collect();
    assert_eq!(walls.len(), 40);
    assert_eq!(hole_walls.len(), 8);

    // hole walls run between the four edge neighbours of the missing cell
    for wall in hole_walls {
        for &i in wall {
            let v = mesh.vertex(i);
            let offset = ((v.x - 2.0).abs(), (v.y - 2.0).abs());
            assert!(offset == (1.0, 0.0) || offset == (0.0, 1.0), "{v:?}");
        }
    }

    // the remaining walls are the outer boundary of the full plateau
    assert_eq!(walls.len() - 8, 32);
}

#[test]
fn interior_hole_has_nothing_to_simplify() {
    let mut rows = plateau(5);
    rows[2][2] = NODATA;
    let mut mesh = mesh_of(rows);
    assert_eq!(simplify(&mut mesh), 0);
}

// =============================================================================
// SOLID MODE
// =============================================================================

const MIXED: [[f64; 3]; 3] = [[2.0, 3.0, 8.0], [4.0, 9.0, 6.0], [1.0, 7.0, 5.0]];

fn mixed() -> Vec<Vec<f64>> {
    MIXED.iter().map(|r| r.to_vec()).collect()
}

/// Below-minimum cells become a plate at zero instead of holes.
#[test]
fn solid_mode_keeps_low_cells() {
    let config = RealiseConfig {
        minimum: 5.0,
        solid: true,
        ..RealiseConfig::default()
    };
    let field = field(mixed(), &config);
    assert_eq!(field.present_count(), 9);

    let mesh = build_mesh(&field);
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (18, 32));
    // same wall count as any full 3x3 grid: no walls around the clamped cells
    assert_eq!(walls(&mesh).len(), 16);
    assert!(mesh.is_watertight());

    let mut heights: Vec<f32> = mesh.vertices().iter().map(|v| v.z).collect();
    heights.sort_by(f32::total_cmp);
    heights.dedup();
    assert_eq!(heights, vec![-1.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
}

/// NODATA cells join the plate at zero, so the base is a full rectangle.
#[test]
fn solid_mode_fills_nodata_cells() {
    let mut rows = plateau(3);
    rows[1][1] = NODATA;
    let config = RealiseConfig {
        minimum: 5.0,
        solid: true,
        ..RealiseConfig::default()
    };
    let field = field(rows, &config);
    assert_eq!(field.present_count(), 9);

    let mesh = build_mesh(&field);
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (18, 32));
    assert!(mesh.is_watertight());

    // every wall sits on the outer edge of the grid
    let walls = walls(&mesh);
    assert_eq!(walls.len(), 16);
    for wall in walls {
        for i in wall {
            let v = mesh.vertex(i);
            assert!(v.x == 0.0 || v.x == 2.0 || v.y == 0.0 || v.y == 2.0, "{v:?}");
        }
    }

    let (min, _) = mesh.bounding_box();
    assert_eq!(min.z, -1.0);
    assert!(mesh.vertices().iter().any(|v| (v.x, v.y, v.z) == (1.0, 1.0, 0.0)));
}

#[test]
fn without_solid_low_cells_become_holes() {
    let config = RealiseConfig {
        minimum: 5.0,
        ..RealiseConfig::default()
    };
    let mesh = build_mesh(&field(mixed(), &config));
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (8, 12));
    assert!(mesh.is_watertight());
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[test]
fn building_is_deterministic() {
    let mut rows = plateau(5);
    rows[1][3] = NODATA;
    rows[4][0] = 25.0;
    let config = RealiseConfig::default();
    let first = build_mesh(&field(rows.clone(), &config));
    let second = build_mesh(&field(rows, &config));
    assert_eq!(first, second);
}

#[test]
fn vertex_count_is_bounded() {
    let mut rows = plateau(6);
    rows[0][0] = NODATA;
    rows[3][2] = NODATA;
    let field = field(rows, &RealiseConfig::default());
    let mesh = build_mesh(&field);
    assert!(mesh.vertex_count() <= 3 * mesh.face_count());
    assert!(mesh.vertex_count() <= 6 * field.present_count());
}

// =============================================================================
// SIMPLIFICATION
// =============================================================================

#[test]
fn plateau_4x4_simplifies_in_two_passes() {
    let mut mesh = mesh_of(plateau(4));
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (32, 60));

    assert_eq!(simplify(&mut mesh), 4);
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (28, 52));
    assert!(mesh.is_watertight());

    assert_eq!(simplify(&mut mesh), 2);
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (26, 48));
    assert!(mesh.is_watertight());

    assert_eq!(simplify(&mut mesh), 0);
}

/// Elevation rises with the column, so top faces tilt along Y.
#[test]
fn ramp_reaches_fixed_point() {
    let rows: Vec<Vec<f64>> = (0..5)
        .map(|_| (0..5).map(|col| col as f64 * 2.0).collect())
        .collect();
    let config = RealiseConfig {
        minimum: -1.0,
        ..RealiseConfig::default()
    };
    let mut mesh = build_mesh(&field(rows, &config));
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (50, 96));

    let report = simplify_to_fixed_point(&mut mesh);
    assert_eq!(
        report,
        SimplifyReport {
            passes: 5,
            merged: 16
        }
    );
    assert_eq!((mesh.vertex_count(), mesh.face_count()), (34, 64));
    assert!(mesh.validate());
    assert!(mesh.is_watertight());
}

#[test]
fn simplify_after_fixed_point_is_a_no_op() {
    let mut mesh = mesh_of(plateau(4));
    simplify_to_fixed_point(&mut mesh);
    let settled = mesh.clone();
    assert_eq!(simplify(&mut mesh), 0);
    assert_eq!(mesh, settled);
}
