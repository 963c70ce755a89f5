//! # Elevation Slices
//!
//! Splits a model into stacked bands so each can be printed separately, for
//! example in different colours.
//!
//! Slice points are given in source elevation units. `n` points make `n + 1`
//! bands: the first keeps the base plate and ends at the first point, the
//! last starts at the final point and is open at the top. Each band is cut
//! at grid resolution: cells at or below its lower point are left out and
//! the rest are clipped to its upper point, with the band's bottom plane at
//! the lower point.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use config::constants::RealiseConfig;
use heightfield::{ElevationPolicy, ElevationSource, HeightField};

use crate::error::{MeshError, MeshResult};
use crate::stl::write_stl;

/// One band between two slice points, in source elevation units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceBand {
    /// Position in the stack, from the bottom.
    pub index: usize,
    /// Lower cut; `None` for the band that carries the base.
    pub lower: Option<f64>,
    /// Upper cut; `None` for the open top band.
    pub upper: Option<f64>,
}

impl SliceBand {
    /// Turns slice points into bands, bottom first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use terrain_mesh::SliceBand;
    ///
    /// let bands = SliceBand::stack(&[100.0, 250.0])?;
    /// assert_eq!(bands.len(), 3);
    /// assert_eq!((bands[0].lower, bands[0].upper), (None, Some(100.0)));
    /// assert_eq!((bands[2].lower, bands[2].upper), (Some(250.0), None));
    /// # Ok::<(), terrain_mesh::MeshError>(())
    /// ```
    pub fn stack(slices: &[f64]) -> MeshResult<Vec<SliceBand>> {
        for (index, &value) in slices.iter().enumerate() {
            let ordered = index == 0 || slices[index - 1] < value;
            if !value.is_finite() || !ordered {
                return Err(MeshError::InvalidSlice { index, value });
            }
        }

        let lowers = std::iter::once(None).chain(slices.iter().copied().map(Some));
        let uppers = slices.iter().copied().map(Some).chain(std::iter::once(None));
        Ok(lowers
            .zip(uppers)
            .enumerate()
            .map(|(index, (lower, upper))| SliceBand {
                index,
                lower,
                upper,
            })
            .collect())
    }

    /// Cuts this band out of a prepared field.
    pub fn cut(&self, field: &HeightField) -> HeightField {
        let policy = ElevationPolicy::from_config(field.config());
        field.band(
            self.lower.map(|l| policy.level(l)),
            self.upper.map_or(f64::INFINITY, |u| policy.level(u)),
        )
    }
}

/// Outcome for one written band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceReport {
    /// The band written.
    pub band: SliceBand,
    /// Vertices in the band's mesh.
    pub vertices: usize,
    /// Facets written.
    pub facets: u32,
}

/// Writes one binary STL per band, asking `sink_for` for each sink in
/// stacking order.
///
/// Slice points are checked before the field is prepared or any sink is
/// opened.
pub fn realise_slices<S, W, F>(
    source: &S,
    config: &RealiseConfig,
    slices: &[f64],
    mut sink_for: F,
) -> MeshResult<Vec<SliceReport>>
where
    S: ElevationSource + ?Sized,
    W: Write + Seek,
    F: FnMut(&SliceBand) -> std::io::Result<W>,
{
    let bands = SliceBand::stack(slices)?;
    let field = HeightField::prepare(source, config)?;

    let mut reports = Vec::with_capacity(bands.len());
    for band in bands {
        let (mesh, _) = crate::mesh_field(&band.cut(&field), config);
        let facets = write_stl(&mesh, sink_for(&band)?)?;
        tracing::info!(
            band = band.index,
            lower = ?band.lower,
            upper = ?band.upper,
            facets,
            "wrote slice"
        );
        reports.push(SliceReport {
            band,
            vertices: mesh.vertex_count(),
            facets,
        });
    }
    Ok(reports)
}

/// Writes each band next to `path`, named by [`slice_path`].
pub fn save_slices<S, P>(
    source: &S,
    config: &RealiseConfig,
    slices: &[f64],
    path: P,
) -> MeshResult<Vec<SliceReport>>
where
    S: ElevationSource + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    realise_slices(source, config, slices, |band| {
        File::create(slice_path(path, band)).map(BufWriter::new)
    })
}

/// File for one band: `terrain.stl` becomes `terrain.<upper>.stl`, or
/// `terrain.top.stl` for the open top band.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use terrain_mesh::{slice_path, SliceBand};
///
/// let bands = SliceBand::stack(&[120.5])?;
/// let out = Path::new("out/terrain.stl");
/// assert_eq!(slice_path(out, &bands[0]), Path::new("out/terrain.120.5.stl"));
/// assert_eq!(slice_path(out, &bands[1]), Path::new("out/terrain.top.stl"));
/// # Ok::<(), terrain_mesh::MeshError>(())
/// ```
pub fn slice_path(path: &Path, band: &SliceBand) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "slice".into(), |s| s.to_string_lossy());
    let label = band
        .upper
        .map_or_else(|| "top".to_string(), |u| u.to_string());
    path.with_file_name(format!("{stem}.{label}.stl"))
}
