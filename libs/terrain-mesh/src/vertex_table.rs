//! # Vertex Table
//!
//! Insertion-ordered vertex arena with an exact-key index.
//!
//! Grid points are scaled to output units and narrowed to `f32` before
//! lookup. Two points that land on bit-identical coordinates share one index;
//! there is no tolerance. Grid coordinates are integers and every point goes
//! through the same arithmetic, so exact matching is what joins neighbouring
//! triangles.

use std::collections::HashMap;

use config::constants::{RealiseConfig, Z_REDUCTION_INTERVAL};
use glam::{DVec3, Vec3};

/// Grid-to-output scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexScale {
    /// Horizontal scale for row and column.
    pub xy: f64,
    /// Vertical scale.
    pub z: f64,
    /// Falloff of `z` per 100 elevation units.
    pub z_reduction: f64,
}

impl VertexScale {
    /// Unit scale, no falloff.
    pub const IDENTITY: Self = Self {
        xy: 1.0,
        z: 1.0,
        z_reduction: 1.0,
    };

    /// Takes the scales out of a realise configuration.
    pub fn from_config(config: &RealiseConfig) -> Self {
        Self {
            xy: config.xy_scale,
            z: config.z_scale,
            z_reduction: config.z_scale_reduction,
        }
    }

    /// Scales a grid point `(row, col, elevation)` into an output vertex.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::{DVec3, Vec3};
    /// use terrain_mesh::VertexScale;
    ///
    /// let scale = VertexScale { xy: 2.0, z: 1.0, z_reduction: 0.5 };
    /// // 200 units of elevation halve the vertical scale twice
    /// assert_eq!(scale.apply(DVec3::new(1.0, 3.0, 200.0)), Vec3::new(2.0, 6.0, 50.0));
    /// ```
    pub fn apply(&self, point: DVec3) -> Vec3 {
        let z = point.z * (self.z * self.z_reduction.powf(point.z / Z_REDUCTION_INTERVAL));
        Vec3::new(
            (point.x * self.xy) as f32,
            (point.y * self.xy) as f32,
            z as f32,
        )
    }
}

impl Default for VertexScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Bit pattern of a scaled vertex. `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey([u32; 3]);

impl VertexKey {
    fn of(vertex: Vec3) -> Self {
        Self([bits(vertex.x), bits(vertex.y), bits(vertex.z)])
    }
}

#[inline]
fn bits(value: f32) -> u32 {
    (value + 0.0).to_bits()
}

/// Deduplicating vertex arena.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use terrain_mesh::{VertexScale, VertexTable};
///
/// let mut table = VertexTable::new(VertexScale::IDENTITY);
/// let a = table.index_of(DVec3::new(0.0, 0.0, 10.0));
/// let b = table.index_of(DVec3::new(1.0, 0.0, 10.0));
/// assert_eq!(table.index_of(DVec3::new(0.0, 0.0, 10.0)), a);
/// assert_eq!((a, b, table.len()), (0, 1, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    scale: VertexScale,
    vertices: Vec<Vec3>,
    index: HashMap<VertexKey, u32>,
}

impl VertexTable {
    /// Creates an empty table with the given scaling.
    pub fn new(scale: VertexScale) -> Self {
        Self {
            scale,
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Scaling applied on every lookup.
    #[inline]
    pub fn scale(&self) -> VertexScale {
        self.scale
    }

    /// Index of the scaled `point`, appending it if it is new.
    pub fn index_of(&mut self, point: DVec3) -> u32 {
        let vertex = self.scale.apply(point);
        let next = self.vertices.len() as u32;
        let index = *self.index.entry(VertexKey::of(vertex)).or_insert(next);
        if index == next {
            self.vertices.push(vertex);
        }
        index
    }

    /// Number of distinct vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if nothing has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in insertion order.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Consumes the table, keeping only the ordered vertices.
    pub fn into_vertices(self) -> Vec<Vec3> {
        self.vertices
    }
}
