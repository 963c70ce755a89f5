//! # Height Grid
//!
//! Row-major storage of [`Sample`]s plus the collaborator trait raster
//! readers implement.

use crate::error::{HeightFieldError, HeightFieldResult};
use crate::sample::Sample;

// =============================================================================
// ELEVATION SOURCE
// =============================================================================

/// Anything that can hand out elevation samples by row and column.
///
/// Raster decoders and point-cloud binners implement this; the mesh pipeline
/// only ever reads through it.
pub trait ElevationSource {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Sample at `(row, col)`. Callers stay within `height() x width()`.
    fn sample(&self, row: usize, col: usize) -> Sample;
}

// =============================================================================
// HEIGHT GRID
// =============================================================================

/// Owned rectangular grid of samples.
///
/// # Example
///
/// ```rust
/// use heightfield::{HeightGrid, Sample};
///
/// let mut grid = HeightGrid::new(3, 2);
/// grid.set(1, 2, Sample::Present(7.5));
/// assert_eq!(grid.get(1, 2), Sample::Present(7.5));
/// assert_eq!(grid.get(0, 0), Sample::Absent);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeightGrid {
    width: usize,
    height: usize,
    samples: Vec<Sample>,
}

impl HeightGrid {
    /// Creates a fully-absent grid of `width` columns and `height` rows.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![Sample::Absent; width * height],
        }
    }

    /// Wraps a row-major sample buffer.
    pub fn from_samples(width: usize, height: usize, samples: Vec<Sample>) -> HeightFieldResult<Self> {
        let expected = width * height;
        if samples.len() != expected {
            return Err(HeightFieldError::SampleCount {
                expected,
                got: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Builds a grid from raw raster rows, treating values `<= nodata` as absent.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>, nodata: f64) -> HeightFieldResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut samples = Vec::with_capacity(width * height);

        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(HeightFieldError::RaggedRows {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
            samples.extend(values.iter().map(|&v| Sample::from_raw(v, nodata)));
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Copies every sample out of a collaborator.
    pub fn from_source<S: ElevationSource + ?Sized>(source: &S) -> Self {
        let (width, height) = (source.width(), source.height());
        let mut samples = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                samples.push(source.sample(row, col));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `(row, col)`; out-of-bounds reads as absent.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Sample {
        if row < self.height && col < self.width {
            self.samples[row * self.width + col]
        } else {
            Sample::Absent
        }
    }

    /// Overwrites the sample at `(row, col)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, sample: Sample) {
        if row < self.height && col < self.width {
            self.samples[row * self.width + col] = sample;
        }
    }

    /// Row-major view of every sample.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Mutable row-major view of every sample.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    /// Number of present samples.
    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_present()).count()
    }

    /// Reverses the row order (first row becomes last).
    pub fn flip_y(&mut self) {
        if self.width == 0 {
            return;
        }
        let mut rows: Vec<&[Sample]> = self.samples.chunks(self.width).collect();
        rows.reverse();
        self.samples = rows.concat();
    }

    /// Keeps every `divisor`-th row and column, starting at the first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use heightfield::HeightGrid;
    ///
    /// let grid = HeightGrid::from_rows(vec![vec![1.0; 5]; 5], -1000.0)?;
    /// let small = grid.decimate(2)?;
    /// assert_eq!((small.width(), small.height()), (3, 3));
    /// # Ok::<(), heightfield::HeightFieldError>(())
    /// ```
    pub fn decimate(&self, divisor: usize) -> HeightFieldResult<Self> {
        if divisor == 0 {
            return Err(HeightFieldError::InvalidDivisor(divisor));
        }
        let width = self.width.div_ceil(divisor);
        let height = self.height.div_ceil(divisor);
        let mut samples = Vec::with_capacity(width * height);
        for row in (0..self.height).step_by(divisor) {
            for col in (0..self.width).step_by(divisor) {
                samples.push(self.get(row, col));
            }
        }
        tracing::debug!(width, height, divisor, "decimated grid");
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Lowest and highest present, finite elevation.
    ///
    /// Returns `None` if no sample qualifies.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(Sample::elevation)
            .filter(|z| z.is_finite())
            .fold(None, |range, z| match range {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }
}

impl ElevationSource for HeightGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, row: usize, col: usize) -> Sample {
        self.get(row, col)
    }
}
