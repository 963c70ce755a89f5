//! # Simplifier
//!
//! Collapses vertices that sit inside flat regions.
//!
//! A vertex is flat when every face touching it carries the same normal.
//! Each pass scans vertices in index order and merges a flat vertex into its
//! first flat neighbour with an equal normal; both are then locked for the
//! rest of the pass. Faces that collapse to a repeated index are dropped.
//! Passes repeat until one merges nothing.

use glam::DVec3;

use crate::mesh::{Face, Mesh};

/// Outcome of [`simplify_to_fixed_point`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    /// Passes run, including the final one that merged nothing.
    pub passes: usize,
    /// Vertices removed over all passes.
    pub merged: usize,
}

/// Whether all faces at a vertex agree on their normal.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flatness {
    Unseen,
    Flat(DVec3),
    Mixed,
}

impl Flatness {
    fn observe(&mut self, normal: DVec3) {
        *self = match *self {
            Flatness::Unseen => Flatness::Flat(normal),
            Flatness::Flat(n) if n == normal => Flatness::Flat(n),
            _ => Flatness::Mixed,
        };
    }

    fn normal(self) -> Option<DVec3> {
        match self {
            Flatness::Flat(n) => Some(n),
            _ => None,
        }
    }
}

/// Per-pass vertex adjacency, rebuilt from scratch each pass.
struct Adjacency {
    flatness: Vec<Flatness>,
    neighbours: Vec<Vec<u32>>,
}

impl Adjacency {
    fn of(mesh: &Mesh) -> Self {
        let n = mesh.vertex_count();
        let mut flatness = vec![Flatness::Unseen; n];
        let mut neighbours = vec![Vec::new(); n];

        for face in mesh.faces() {
            let [a, b, c] = face.indices;
            for v in face.indices {
                flatness[v as usize].observe(face.normal);
            }
            neighbours[a as usize].extend([b, c]);
            neighbours[b as usize].extend([a, c]);
            neighbours[c as usize].extend([a, b]);
        }

        Self {
            flatness,
            neighbours,
        }
    }

    /// Merge target per vertex, chosen in index order.
    fn select_merges(&self) -> Vec<Option<u32>> {
        let n = self.flatness.len();
        let mut tainted = vec![false; n];
        let mut targets = vec![None; n];

        for v in 0..n {
            if tainted[v] {
                continue;
            }
            let Some(normal) = self.flatness[v].normal() else {
                continue;
            };
            let target = self.neighbours[v].iter().copied().find(|&u| {
                !tainted[u as usize] && self.flatness[u as usize].normal() == Some(normal)
            });
            if let Some(u) = target {
                targets[v] = Some(u);
                tainted[v] = true;
                tainted[u as usize] = true;
            }
        }

        targets
    }
}

/// Runs one simplification pass and returns how many vertices were merged.
///
/// Unmerged vertices keep their relative order. Face normals are kept as
/// they were.
///
/// # Example
///
/// ```rust
/// use config::constants::{RealiseConfig, NODATA};
/// use heightfield::{HeightField, HeightGrid};
/// use terrain_mesh::{build_mesh, simplify};
///
/// let grid = HeightGrid::from_rows(vec![vec![10.0; 4]; 4], NODATA)?;
/// let field = HeightField::prepare(&grid, &RealiseConfig::default())?;
/// let mut mesh = build_mesh(&field);
/// assert_eq!(simplify(&mut mesh), 4);
/// assert_eq!(mesh.vertex_count(), 28);
/// # Ok::<(), heightfield::HeightFieldError>(())
/// ```
pub fn simplify(mesh: &mut Mesh) -> usize {
    let targets = Adjacency::of(mesh).select_merges();
    let merged = targets.iter().filter(|t| t.is_some()).count();
    if merged == 0 {
        return 0;
    }

    let mut remap = vec![0u32; targets.len()];
    let mut vertices = Vec::with_capacity(targets.len() - merged);
    for (old, vertex) in mesh.vertices().iter().enumerate() {
        if targets[old].is_none() {
            remap[old] = vertices.len() as u32;
            vertices.push(*vertex);
        }
    }
    // Targets are locked once chosen, so they are never merged themselves.
    for (old, target) in targets.iter().enumerate() {
        if let Some(target) = target {
            remap[old] = remap[*target as usize];
        }
    }

    let faces: Vec<Face> = mesh
        .faces()
        .iter()
        .map(|face| Face::new(face.indices.map(|i| remap[i as usize]), face.normal))
        .filter(|face| !face.is_degenerate())
        .collect();

    tracing::debug!(
        merged,
        vertices = vertices.len(),
        faces = faces.len(),
        "simplification pass"
    );
    *mesh = Mesh::from_parts(vertices, faces);
    merged
}

/// Repeats [`simplify`] until a pass merges nothing.
pub fn simplify_to_fixed_point(mesh: &mut Mesh) -> SimplifyReport {
    let mut report = SimplifyReport::default();
    loop {
        let merged = simplify(mesh);
        report.passes += 1;
        if merged == 0 {
            break;
        }
        report.merged += merged;
    }
    tracing::info!(
        passes = report.passes,
        removed = report.merged,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "simplified mesh"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Two coplanar triangles forming a unit square.
    fn square() -> Mesh {
        Mesh::from_parts(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![
                Face::new([0, 1, 2], DVec3::Z),
                Face::new([0, 2, 3], DVec3::Z),
            ],
        )
    }

    #[test]
    fn test_flatness_tracks_first_disagreement() {
        let mut f = Flatness::Unseen;
        f.observe(DVec3::Z);
        assert_eq!(f, Flatness::Flat(DVec3::Z));
        f.observe(DVec3::Z);
        assert_eq!(f.normal(), Some(DVec3::Z));
        f.observe(DVec3::X);
        assert_eq!(f, Flatness::Mixed);
        f.observe(DVec3::Z);
        assert_eq!(f, Flatness::Mixed);
    }

    #[test]
    fn test_adjacency_order() {
        let adjacency = Adjacency::of(&square());
        assert_eq!(adjacency.neighbours[0], vec![1, 2, 2, 3]);
        assert_eq!(adjacency.neighbours[2], vec![0, 1, 0, 3]);
    }

    #[test]
    fn test_square_collapses_to_nothing() {
        let mut mesh = square();
        // 0 merges into 1, then 2 into 3; both faces collapse
        assert_eq!(simplify(&mut mesh), 2);
        assert_eq!(mesh.vertex_count(), 2);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_mixed_vertices_stay() {
        let mut mesh = Mesh::from_parts(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![
                Face::new([0, 2, 1], DVec3::NEG_Z),
                Face::new([0, 1, 3], DVec3::NEG_Y),
                Face::new([0, 3, 2], DVec3::NEG_X),
                Face::new([1, 2, 3], DVec3::ONE.normalize()),
            ],
        );
        let before = mesh.clone();
        assert_eq!(simplify(&mut mesh), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_fixed_point_on_empty_mesh() {
        let mut mesh = Mesh::new();
        assert_eq!(
            simplify_to_fixed_point(&mut mesh),
            SimplifyReport {
                passes: 1,
                merged: 0
            }
        );
    }
}
