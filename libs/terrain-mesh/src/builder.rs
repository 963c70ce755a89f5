//! # Mesh Builder
//!
//! Walks a [`HeightField`] in row-major order and emits, per present cell, the
//! top triangles it owns, their mirrored copies on the bottom plane, and the
//! vertical walls that close every border between present and absent cells.
//!
//! ## Neighbourhood
//!
//! Grid points are `(x, y, z) = (row, col, elevation)`. Around a cell `c` at
//! `(row, col)`:
//!
//! ```text
//!            row-1   row   row+1
//!   col-1     tl      t     tr
//!   col        l      c      r
//!   col+1     bl      b     br
//! ```
//!
//! Each cell owns at most four triangles:
//!
//! 1. `(c, r, b)` when `r` and `b` are present
//! 2. `(t, c, l)` when `t` and `l` are present
//! 3. `(t, r, c)` when `t` and `r` are present but `tr` is absent
//! 4. `(l, c, b)` when `l` and `b` are present but `bl` is absent
//!
//! Every edge of those triangles that faces an absent region gets a wall
//! down to the bottom plane. No pass looks beyond the eight neighbours.

use glam::DVec3;
use heightfield::HeightField;

use crate::mesh::{Face, Mesh};
use crate::vertex_table::{VertexScale, VertexTable};

/// Builds the closed mesh for a prepared height field.
///
/// A field with no present cells yields an empty mesh.
///
/// # Example
///
/// ```rust
/// use config::constants::{RealiseConfig, NODATA};
/// use heightfield::{HeightField, HeightGrid};
/// use terrain_mesh::build_mesh;
///
/// let grid = HeightGrid::from_rows(vec![vec![10.0, 10.0], vec![10.0, 10.0]], NODATA)?;
/// let field = HeightField::prepare(&grid, &RealiseConfig::default())?;
/// let mesh = build_mesh(&field);
/// assert_eq!((mesh.vertex_count(), mesh.face_count()), (8, 12));
/// assert!(mesh.is_watertight());
/// # Ok::<(), heightfield::HeightFieldError>(())
/// ```
pub fn build_mesh(field: &HeightField) -> Mesh {
    let mut builder = MeshBuilder::new(field);
    builder.build();
    let mesh = builder.finish();
    tracing::info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "built terrain mesh"
    );
    mesh
}

/// Grid points around one present cell; `None` where the cell is absent or
/// outside the grid.
#[derive(Debug, Clone, Copy)]
struct Neighbourhood {
    c: DVec3,
    t: Option<DVec3>,
    tr: Option<DVec3>,
    tl: Option<DVec3>,
    l: Option<DVec3>,
    r: Option<DVec3>,
    bl: Option<DVec3>,
    b: Option<DVec3>,
    br: Option<DVec3>,
}

impl Neighbourhood {
    fn around(field: &HeightField, row: usize, col: usize, elevation: f64) -> Self {
        let (row, col) = (row as isize, col as isize);
        let at = |dr: isize, dc: isize| {
            let (r, c) = (row + dr, col + dc);
            field
                .neighbour(r, c)
                .elevation()
                .map(|z| DVec3::new(r as f64, c as f64, z))
        };
        Self {
            c: DVec3::new(row as f64, col as f64, elevation),
            t: at(0, -1),
            tr: at(1, -1),
            tl: at(-1, -1),
            l: at(-1, 0),
            r: at(1, 0),
            bl: at(-1, 1),
            b: at(0, 1),
            br: at(1, 1),
        }
    }
}

/// Emits faces into a shared vertex table.
struct MeshBuilder<'a> {
    field: &'a HeightField,
    bottom: f64,
    table: VertexTable,
    faces: Vec<Face>,
}

impl<'a> MeshBuilder<'a> {
    fn new(field: &'a HeightField) -> Self {
        Self {
            field,
            bottom: field.bottom(),
            table: VertexTable::new(VertexScale::from_config(field.config())),
            faces: Vec::new(),
        }
    }

    fn build(&mut self) {
        for row in 0..self.field.height() {
            for col in 0..self.field.width() {
                if let Some(z) = self.field.sample(row, col).elevation() {
                    let cell = Neighbourhood::around(self.field, row, col, z);
                    self.emit_cell(&cell);
                }
            }
        }
    }

    fn finish(self) -> Mesh {
        Mesh::from_parts(self.table.into_vertices(), self.faces)
    }

    fn emit_cell(&mut self, n: &Neighbourhood) {
        let c = n.c;

        if let (Some(r), Some(b)) = (n.r, n.b) {
            self.add_surface(c, r, b);
            if n.br.is_none() {
                self.add_wall(b, r);
            }
            if n.t.is_none() && n.tr.is_none() {
                self.add_wall(r, c);
            }
            if n.l.is_none() && n.bl.is_none() {
                self.add_wall(c, b);
            }
        }

        if let (Some(t), Some(l)) = (n.t, n.l) {
            self.add_surface(t, c, l);
            if n.tl.is_none() {
                self.add_wall(t, l);
            }
            if n.r.is_none() && n.tr.is_none() {
                self.add_wall(c, t);
            }
            if n.b.is_none() && n.bl.is_none() {
                self.add_wall(l, c);
            }
        }

        // Corner fills where the diagonal is missing
        if let (Some(t), Some(r), None) = (n.t, n.r, n.tr) {
            self.add_surface(t, r, c);
            self.add_wall(r, t);
            if n.l.is_none() && n.tl.is_none() {
                self.add_wall(t, c);
            }
            if n.b.is_none() && n.br.is_none() {
                self.add_wall(c, r);
            }
        }

        if let (Some(l), Some(b), None) = (n.l, n.b, n.bl) {
            self.add_surface(l, c, b);
            self.add_wall(l, b);
            if n.r.is_none() && n.br.is_none() {
                self.add_wall(b, c);
            }
            if n.t.is_none() && n.tr.is_none() {
                self.add_wall(c, l);
            }
        }
    }

    #[inline]
    fn on_bottom(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.x, p.y, self.bottom)
    }

    /// Top triangle plus its reversed copy on the bottom plane.
    fn add_surface(&mut self, p1: DVec3, p2: DVec3, p3: DVec3) {
        self.add_triangle(p1, p2, p3);
        self.add_triangle(self.on_bottom(p1), self.on_bottom(p3), self.on_bottom(p2));
    }

    /// Vertical quad from the edge `p1 -> p2` down to the bottom plane.
    fn add_wall(&mut self, p1: DVec3, p2: DVec3) {
        let (p3, p4) = (self.on_bottom(p2), self.on_bottom(p1));
        self.add_triangle(p1, p2, p4);
        self.add_triangle(p2, p3, p4);
    }

    /// Walls of zero height collapse onto shared vertices and are skipped.
    fn add_triangle(&mut self, p1: DVec3, p2: DVec3, p3: DVec3) {
        let indices = [
            self.table.index_of(p1),
            self.table.index_of(p2),
            self.table.index_of(p3),
        ];
        let face = Face::new(indices, DVec3::ZERO);
        if face.is_degenerate() {
            tracing::trace!(?indices, "skipped zero-area triangle");
            return;
        }
        let cross = (p2 - p1).cross(p3 - p1);
        self.faces.push(Face::new(indices, cross / cross.length()));
    }
}
