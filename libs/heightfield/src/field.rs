//! # Height Field
//!
//! A policy-applied grid bundled with the configuration it was prepared for.
//! This is what the mesh builder consumes.

use config::constants::RealiseConfig;
use rayon::prelude::*;

use crate::error::HeightFieldResult;
use crate::grid::{ElevationSource, HeightGrid};
use crate::policy::ElevationPolicy;
use crate::sample::Sample;

/// Size of the finished model in output units.
///
/// Axes follow the mesh, not the raster: vertex X is the grid row and
/// vertex Y the grid column, so `x` is measured over rows even though a
/// raster's X usually runs along its columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelExtents {
    /// Span along mesh X (grid rows).
    pub x: f64,
    /// Span along mesh Y (grid columns).
    pub y: f64,
    /// Highest scaled elevation above zero.
    pub z: f64,
}

/// Elevation grid ready for meshing.
///
/// # Example
///
/// ```rust
/// use config::constants::RealiseConfig;
/// use heightfield::{HeightField, HeightGrid, Sample};
///
/// let grid = HeightGrid::from_rows(vec![vec![2.0, 9.0]], -1000.0)?;
/// let config = RealiseConfig { minimum: 5.0, ..RealiseConfig::default() };
/// let field = HeightField::prepare(&grid, &config)?;
/// assert_eq!(field.sample(0, 0), Sample::Absent);
/// assert_eq!(field.sample(0, 1), Sample::Present(9.0));
/// # Ok::<(), heightfield::HeightFieldError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    grid: HeightGrid,
    config: RealiseConfig,
    bottom: f64,
}

impl HeightField {
    /// Validates `config`, copies `source`, flips it if asked, and applies the
    /// elevation policy.
    pub fn prepare<S: ElevationSource + ?Sized>(source: &S, config: &RealiseConfig) -> HeightFieldResult<Self> {
        config.validate()?;

        let mut grid = HeightGrid::from_source(source);
        if config.flip_y {
            grid.flip_y();
        }

        let dropped = ElevationPolicy::from_config(config).apply_to(&mut grid);
        if dropped > 0 {
            tracing::warn!(dropped, "non-finite elevations treated as no data");
        }

        let field = Self {
            grid,
            config: *config,
            bottom: config.bottom(),
        };
        let extents = field.extents();
        tracing::info!(
            "X size: {:.2}  Y size: {:.2}  Z size: {:.2}",
            extents.x,
            extents.y,
            extents.z
        );
        Ok(field)
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Configuration the field was prepared with.
    #[inline]
    pub fn config(&self) -> &RealiseConfig {
        &self.config
    }

    /// The prepared grid.
    #[inline]
    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Sample at `(row, col)`; out-of-bounds reads as absent.
    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> Sample {
        self.grid.get(row, col)
    }

    /// Sample at a signed position, so callers can look one step past any edge.
    #[inline]
    pub fn neighbour(&self, row: isize, col: isize) -> Sample {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => self.grid.get(row, col),
            _ => Sample::Absent,
        }
    }

    /// Number of present cells after the policy ran.
    pub fn present_count(&self) -> usize {
        self.grid.present_count()
    }

    /// Elevation of the bottom plane in pre-scale units.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// The part of the field between two prepared elevations.
    ///
    /// Cells at or below `lower` drop out, the rest are clipped to `upper`,
    /// and the bottom plane rises to `lower`. Without `lower` the band keeps
    /// the base plate. Stacked bands share their cut planes exactly.
    ///
    /// # Example
    ///
    /// ```rust
    /// use config::constants::RealiseConfig;
    /// use heightfield::{HeightField, HeightGrid, Sample};
    ///
    /// let grid = HeightGrid::from_rows(vec![vec![4.0, 12.0, 30.0]], -1000.0)?;
    /// let field = HeightField::prepare(&grid, &RealiseConfig::default())?;
    /// let band = field.band(Some(10.0), 20.0);
    /// assert_eq!(band.sample(0, 0), Sample::Absent);
    /// assert_eq!(band.sample(0, 1), Sample::Present(12.0));
    /// assert_eq!(band.sample(0, 2), Sample::Present(20.0));
    /// assert_eq!(band.bottom(), 10.0);
    /// # Ok::<(), heightfield::HeightFieldError>(())
    /// ```
    pub fn band(&self, lower: Option<f64>, upper: f64) -> HeightField {
        let mut grid = self.grid.clone();
        grid.samples_mut().par_iter_mut().for_each(|sample| {
            *sample = match sample.elevation() {
                Some(z) if lower.is_some_and(|l| z <= l) => Sample::Absent,
                Some(z) => Sample::Present(z.min(upper)),
                None => Sample::Absent,
            };
        });
        HeightField {
            grid,
            config: self.config,
            bottom: lower.unwrap_or(self.bottom),
        }
    }

    /// Model size in output units.
    pub fn extents(&self) -> ModelExtents {
        let max_elevation = self
            .grid
            .value_range()
            .map_or(0.0, |(_, hi)| hi.max(0.0));
        ModelExtents {
            x: self.height() as f64 * self.config.xy_scale,
            y: self.width() as f64 * self.config.xy_scale,
            z: max_elevation * self.config.z_scale,
        }
    }
}

impl ElevationSource for HeightField {
    fn width(&self) -> usize {
        self.grid.width()
    }

    fn height(&self) -> usize {
        self.grid.height()
    }

    fn sample(&self, row: usize, col: usize) -> Sample {
        self.grid.get(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeightFieldError;
    use approx::assert_relative_eq;
    use config::constants::ConfigError;

    fn grid(rows: Vec<Vec<f64>>) -> HeightGrid {
        HeightGrid::from_rows(rows, -1000.0).unwrap()
    }

    #[test]
    fn test_prepare_rejects_invalid_config() {
        let config = RealiseConfig {
            xy_scale: 0.0,
            ..RealiseConfig::default()
        };
        let err = HeightField::prepare(&grid(vec![vec![1.0]]), &config).unwrap_err();
        assert_eq!(err, HeightFieldError::Config(ConfigError::InvalidXyScale(0.0)));
    }

    #[test]
    fn test_prepare_flips_rows() {
        let config = RealiseConfig {
            flip_y: true,
            ..RealiseConfig::default()
        };
        let field = HeightField::prepare(&grid(vec![vec![1.0], vec![2.0]]), &config).unwrap();
        assert_eq!(field.sample(0, 0), Sample::Present(2.0));
        assert_eq!(field.sample(1, 0), Sample::Present(1.0));
    }

    #[test]
    fn test_neighbour_outside_is_absent() {
        let field = HeightField::prepare(&grid(vec![vec![1.0]]), &RealiseConfig::default()).unwrap();
        assert_eq!(field.neighbour(0, 0), Sample::Present(1.0));
        assert_eq!(field.neighbour(-1, 0), Sample::Absent);
        assert_eq!(field.neighbour(0, -1), Sample::Absent);
        assert_eq!(field.neighbour(1, 0), Sample::Absent);
    }

    #[test]
    fn test_extents_use_scales() {
        let config = RealiseConfig {
            xy_scale: 0.5,
            z_scale: 2.0,
            ..RealiseConfig::default()
        };
        let field = HeightField::prepare(
            &grid(vec![vec![1.0, 2.0, 3.0], vec![4.0, 10.0, 6.0]]),
            &config,
        )
        .unwrap();
        let extents = field.extents();
        assert_relative_eq!(extents.x, 1.0);
        assert_relative_eq!(extents.y, 1.5);
        assert_relative_eq!(extents.z, 20.0);
    }

    #[test]
    fn test_extents_x_follows_rows() {
        // two rows, five columns
        let field = HeightField::prepare(&grid(vec![vec![3.0; 5]; 2]), &RealiseConfig::default()).unwrap();
        let extents = field.extents();
        assert_relative_eq!(extents.x, 2.0);
        assert_relative_eq!(extents.y, 5.0);
    }

    #[test]
    fn test_band_without_lower_keeps_base() {
        let field = HeightField::prepare(&grid(vec![vec![4.0, 25.0]]), &RealiseConfig::default()).unwrap();
        let band = field.band(None, 10.0);
        assert_eq!(band.sample(0, 0), Sample::Present(4.0));
        assert_eq!(band.sample(0, 1), Sample::Present(10.0));
        assert_eq!(band.bottom(), field.bottom());
        assert_eq!(band.config(), field.config());
    }

    #[test]
    fn test_band_drops_cells_at_lower() {
        let field = HeightField::prepare(&grid(vec![vec![10.0, 10.5]]), &RealiseConfig::default()).unwrap();
        let band = field.band(Some(10.0), f64::INFINITY);
        assert_eq!(band.sample(0, 0), Sample::Absent);
        assert_eq!(band.sample(0, 1), Sample::Present(10.5));
        assert_eq!(band.present_count(), 1);
    }

    #[test]
    fn test_extents_of_empty_field() {
        let field = HeightField::prepare(&HeightGrid::new(0, 0), &RealiseConfig::default()).unwrap();
        assert_eq!(field.extents(), ModelExtents { x: 0.0, y: 0.0, z: 0.0 });
        assert_eq!(field.present_count(), 0);
    }
}
