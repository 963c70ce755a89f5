//! # Terrain Mesh
//!
//! Turns an elevation grid into a closed, printable triangle mesh and writes
//! it as binary STL.
//!
//! ## Architecture
//!
//! ```text
//! ElevationSource → HeightField → build_mesh → simplify → write_stl
//! ```
//!
//! - **VertexTable**: scaled, exact-key vertex deduplication
//! - **build_mesh**: per-cell top, bottom and wall triangles
//! - **simplify**: flat-region vertex collapse, repeated to a fixed point
//! - **write_stl / read_stl**: binary STL encoding and decoding
//! - **realise_slices**: one STL per elevation band
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use config::constants::{RealiseConfig, NODATA};
//! use heightfield::HeightGrid;
//! use terrain_mesh::realise;
//!
//! let grid = HeightGrid::from_rows(vec![vec![10.0; 4]; 4], NODATA)?;
//! let mut out = Cursor::new(Vec::new());
//! let report = realise(&grid, &RealiseConfig::default(), &mut out)?;
//! assert_eq!(report.facets, 48);
//! assert_eq!(out.into_inner().len(), 84 + 48 * 50);
//! # Ok::<(), terrain_mesh::MeshError>(())
//! ```

pub mod builder;
pub mod error;
pub mod mesh;
pub mod simplify;
pub mod slice;
pub mod stl;
pub mod vertex_table;

use std::io::{Seek, Write};

use config::constants::RealiseConfig;
use heightfield::{ElevationSource, HeightField, ModelExtents};

pub use builder::build_mesh;
pub use error::{MeshError, MeshResult};
pub use mesh::{Face, Facet, Mesh};
pub use simplify::{simplify, simplify_to_fixed_point, SimplifyReport};
pub use slice::{realise_slices, save_slices, slice_path, SliceBand, SliceReport};
pub use stl::{encode_stl, read_stl, save_stl, write_stl};
pub use vertex_table::{VertexScale, VertexTable};

/// Summary of one [`realise`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealiseReport {
    /// Vertices in the written mesh.
    pub vertices: usize,
    /// Facets written.
    pub facets: u32,
    /// Vertices removed by simplification.
    pub merged: usize,
    /// Simplification passes run; zero when disabled.
    pub passes: usize,
    /// Model size in output units.
    pub extents: ModelExtents,
}

/// Prepares `source`, builds the mesh and simplifies it if configured.
///
/// # Example
///
/// ```rust
/// use config::constants::{RealiseConfig, NODATA};
/// use heightfield::HeightGrid;
/// use terrain_mesh::compile_mesh;
///
/// let grid = HeightGrid::from_rows(vec![vec![10.0; 2]; 2], NODATA)?;
/// let config = RealiseConfig { simplify: false, ..RealiseConfig::default() };
/// let mesh = compile_mesh(&grid, &config)?;
/// assert_eq!(mesh.face_count(), 12);
/// # Ok::<(), terrain_mesh::MeshError>(())
/// ```
pub fn compile_mesh<S: ElevationSource + ?Sized>(
    source: &S,
    config: &RealiseConfig,
) -> MeshResult<Mesh> {
    compile(source, config).map(|(mesh, _, _)| mesh)
}

/// Runs the whole pipeline and writes the result to `sink` as binary STL.
///
/// Invalid configuration is rejected before anything is written.
pub fn realise<S, W>(source: &S, config: &RealiseConfig, sink: W) -> MeshResult<RealiseReport>
where
    S: ElevationSource + ?Sized,
    W: Write + Seek,
{
    let (mesh, simplified, extents) = compile(source, config)?;
    let facets = write_stl(&mesh, sink)?;
    Ok(RealiseReport {
        vertices: mesh.vertex_count(),
        facets,
        merged: simplified.merged,
        passes: simplified.passes,
        extents,
    })
}

fn compile<S: ElevationSource + ?Sized>(
    source: &S,
    config: &RealiseConfig,
) -> MeshResult<(Mesh, SimplifyReport, ModelExtents)> {
    let field = HeightField::prepare(source, config)?;
    let (mesh, simplified) = mesh_field(&field, config);
    Ok((mesh, simplified, field.extents()))
}

/// Builds `field` and simplifies it if `config` asks for it.
pub(crate) fn mesh_field(field: &HeightField, config: &RealiseConfig) -> (Mesh, SimplifyReport) {
    let mut mesh = build_mesh(field);
    let simplified = if config.simplify {
        simplify_to_fixed_point(&mut mesh)
    } else {
        SimplifyReport::default()
    };
    (mesh, simplified)
}
