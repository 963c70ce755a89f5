//! # Elevation Policy
//!
//! Maximum clipping, minimum cut-off and solid-base clamping, applied once to
//! every sample before meshing.
//!
//! ## Rules
//!
//! - Non-finite elevations become absent.
//! - A finite `maximum` clips elevations down to it.
//! - Not solid: elevations at or below `minimum` become absent, the rest are
//!   unchanged.
//! - Solid: elevations become `max(0, elevation - minimum)` and stay present;
//!   NODATA cells become present at zero, so the base covers the whole
//!   rectangle.

use config::constants::RealiseConfig;
use rayon::prelude::*;

use crate::grid::HeightGrid;
use crate::sample::Sample;

/// The subset of [`RealiseConfig`] that decides which samples survive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationPolicy {
    /// Zero point.
    pub minimum: f64,
    /// Clip ceiling, if any.
    pub maximum: Option<f64>,
    /// Clamp instead of removing.
    pub solid: bool,
}

impl ElevationPolicy {
    /// Extracts the policy from a realise configuration.
    pub fn from_config(config: &RealiseConfig) -> Self {
        Self {
            minimum: config.minimum,
            maximum: config.clips_maximum().then_some(config.maximum),
            solid: config.solid,
        }
    }

    /// Applies the policy to one sample.
    ///
    /// # Example
    ///
    /// ```rust
    /// use heightfield::{ElevationPolicy, Sample};
    ///
    /// let policy = ElevationPolicy { minimum: 5.0, maximum: None, solid: true };
    /// assert_eq!(policy.apply(Sample::Present(3.0)), Sample::Present(0.0));
    /// assert_eq!(policy.apply(Sample::Present(8.0)), Sample::Present(3.0));
    /// assert_eq!(policy.apply(Sample::Absent), Sample::Present(0.0));
    /// ```
    pub fn apply(&self, sample: Sample) -> Sample {
        let mut z = match sample {
            Sample::Absent if self.solid => return Sample::Present(0.0),
            Sample::Present(z) if z.is_finite() => z,
            _ => return Sample::Absent,
        };
        if let Some(maximum) = self.maximum {
            z = z.min(maximum);
        }
        if self.solid {
            Sample::Present((z - self.minimum).max(0.0))
        } else if z > self.minimum {
            Sample::Present(z)
        } else {
            Sample::Absent
        }
    }

    /// Applies the policy to every sample of `grid` in parallel.
    ///
    /// Returns how many present samples were dropped for being non-finite.
    pub fn apply_to(&self, grid: &mut HeightGrid) -> usize {
        let non_finite = grid
            .samples()
            .par_iter()
            .filter(|s| s.elevation().is_some_and(|z| !z.is_finite()))
            .count();
        grid.samples_mut()
            .par_iter_mut()
            .for_each(|sample| *sample = self.apply(*sample));
        non_finite
    }

    /// Maps a source elevation to the level it ends up at after the policy,
    /// ignoring clipping and cut-off. Solid mode shifts by `minimum`.
    pub fn level(&self, elevation: f64) -> f64 {
        if self.solid {
            elevation - self.minimum
        } else {
            elevation
        }
    }
}
