//! # Mesh Data Structure
//!
//! Indexed triangle mesh with one precomputed normal per face.

use std::collections::HashMap;

use glam::{DVec3, Vec3};

/// One triangle: three vertex indices and its unit normal.
///
/// The normal is computed once from grid-space points when the face is
/// built and carried through simplification unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Vertex indices in winding order.
    pub indices: [u32; 3],
    /// Unit normal.
    pub normal: DVec3,
}

impl Face {
    /// Creates a face.
    #[inline]
    pub fn new(indices: [u32; 3], normal: DVec3) -> Self {
        Self { indices, normal }
    }

    /// Returns true if any index repeats.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }
}

/// A face resolved to positions, as stored in an STL record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Unit normal.
    pub normal: Vec3,
    /// Corner positions in winding order.
    pub vertices: [Vec3; 3],
}

/// A triangle mesh of scaled `f32` vertices and indexed faces.
///
/// # Example
///
/// ```rust
/// use glam::{DVec3, Vec3};
/// use terrain_mesh::{Face, Mesh};
///
/// let mesh = Mesh::from_parts(
///     vec![Vec3::ZERO, Vec3::X, Vec3::Y],
///     vec![Face::new([0, 1, 2], DVec3::Z)],
/// );
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert!(mesh.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing vertex and face sequences.
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> Vec3 {
        self.vertices[index as usize]
    }

    /// Resolves a face of this mesh into positions.
    pub fn facet(&self, face: &Face) -> Facet {
        Facet {
            normal: face.normal.as_vec3(),
            vertices: face.indices.map(|i| self.vertex(i)),
        }
    }

    /// Iterates faces as position records, in face order.
    pub fn facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.faces.iter().map(|face| self.facet(face))
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All face indices are in range
    /// - No face repeats an index
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;
        self.faces
            .iter()
            .all(|face| face.indices.iter().all(|&i| i < vertex_count) && !face.is_degenerate())
    }

    /// Returns true if every undirected edge borders exactly two faces.
    ///
    /// An empty mesh is trivially closed.
    pub fn is_watertight(&self) -> bool {
        let mut uses: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            let [a, b, c] = face.indices;
            for (p, q) in [(a, b), (b, c), (c, a)] {
                *uses.entry((p.min(q), p.max(q))).or_default() += 1;
            }
        }
        uses.values().all(|&n| n == 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four outward-facing triangles over four corners.
    fn tetrahedron() -> Mesh {
        Mesh::from_parts(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![
                Face::new([0, 2, 1], -DVec3::Z),
                Face::new([0, 1, 3], -DVec3::Y),
                Face::new([0, 3, 2], -DVec3::X),
                Face::new([1, 2, 3], DVec3::ONE.normalize()),
            ],
        )
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.is_watertight());
    }

    #[test]
    fn test_face_degenerate() {
        assert!(!Face::new([0, 1, 2], DVec3::Z).is_degenerate());
        assert!(Face::new([0, 1, 0], DVec3::Z).is_degenerate());
        assert!(Face::new([3, 3, 2], DVec3::Z).is_degenerate());
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mesh = Mesh::from_parts(
            vec![Vec3::new(-1.0, -2.0, -3.0), Vec3::new(4.0, 5.0, 6.0)],
            Vec::new(),
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(Mesh::new().bounding_box(), (Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_mesh_validate_invalid_index() {
        let mesh = Mesh::from_parts(vec![Vec3::ZERO], vec![Face::new([0, 1, 2], DVec3::Z)]);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_mesh_validate_repeated_index() {
        let mesh = Mesh::from_parts(
            vec![Vec3::ZERO, Vec3::X],
            vec![Face::new([0, 1, 1], DVec3::Z)],
        );
        assert!(!mesh.validate());
    }

    #[test]
    fn test_tetrahedron_is_watertight() {
        let mesh = tetrahedron();
        assert!(mesh.validate());
        assert!(mesh.is_watertight());
    }

    #[test]
    fn test_open_surface_is_not_watertight() {
        let mut mesh = tetrahedron();
        mesh.faces.pop();
        assert!(!mesh.is_watertight());
    }

    #[test]
    fn test_facets_resolve_positions() {
        let mesh = tetrahedron();
        let facets: Vec<Facet> = mesh.facets().collect();
        assert_eq!(facets.len(), 4);
        assert_eq!(facets[1].vertices, [Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(facets[1].normal, Vec3::NEG_Y);
    }
}
