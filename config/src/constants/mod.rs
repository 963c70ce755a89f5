//! Centralized configuration values shared across the heightfield pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// GRID CONSTANTS
// =============================================================================

/// Sentinel elevation written by the raster tools for "no sample".
///
/// Any value at or below this is treated as absent when a grid is built from
/// raw rows.
///
/// # Examples
/// ```
/// use config::constants::NODATA;
/// let value = -1200.0;
/// assert!(value <= NODATA);
/// ```
pub const NODATA: f64 = -1000.0;

/// Elevation span over which `z_scale_reduction` is applied once.
///
/// A reduction of `0.9` shrinks the vertical scale by 10% for every
/// `Z_REDUCTION_INTERVAL` units of elevation.
///
/// # Examples
/// ```
/// use config::constants::Z_REDUCTION_INTERVAL;
/// let exponent = 250.0 / Z_REDUCTION_INTERVAL;
/// assert_eq!(exponent, 2.5);
/// ```
pub const Z_REDUCTION_INTERVAL: f64 = 100.0;

// =============================================================================
// SCALE DEFAULTS
// =============================================================================

/// Default horizontal scale (output units per grid cell).
pub const DEFAULT_XY_SCALE: f64 = 1.0;

/// Default vertical scale (output units per elevation unit).
pub const DEFAULT_Z_SCALE: f64 = 1.0;

/// Default vertical scale reduction per [`Z_REDUCTION_INTERVAL`].
///
/// `1.0` disables the falloff.
pub const DEFAULT_Z_SCALE_REDUCTION: f64 = 1.0;

/// Default minimum elevation (zero point).
pub const DEFAULT_MINIMUM: f64 = 0.0;

/// Default maximum elevation. Infinite means no clipping.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MAXIMUM;
/// assert!(!DEFAULT_MAXIMUM.is_finite());
/// ```
pub const DEFAULT_MAXIMUM: f64 = f64::INFINITY;

/// Default base plate thickness, in output units.
pub const DEFAULT_BASE_THICKNESS: f64 = 1.0;

// =============================================================================
// BINARY STL LAYOUT
// =============================================================================

/// Size of the free-form binary STL header.
pub const STL_HEADER_SIZE: usize = 80;

/// Size of one binary STL facet record: normal, three vertices, attribute.
///
/// # Examples
/// ```
/// use config::constants::STL_FACET_SIZE;
/// assert_eq!(STL_FACET_SIZE, 4 * 3 * 4 + 2);
/// ```
pub const STL_FACET_SIZE: usize = 50;

// =============================================================================
// REALISE CONFIGURATION
// =============================================================================

/// Settings for turning an elevation grid into a printable solid.
///
/// # Examples
/// ```
/// use config::constants::RealiseConfig;
/// let config = RealiseConfig::default();
/// assert!(config.simplify);
/// assert!(!config.solid);
/// assert_eq!(config.bottom(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealiseConfig {
    /// Horizontal scale applied to grid row/column coordinates.
    pub xy_scale: f64,
    /// Vertical scale applied to elevations.
    pub z_scale: f64,
    /// Multiplicative falloff of `z_scale` per 100 elevation units.
    pub z_scale_reduction: f64,
    /// Zero point. Samples at or below it are dropped, or clamped in solid mode.
    pub minimum: f64,
    /// Elevations above this are clipped to it when finite.
    pub maximum: f64,
    /// Thickness of the base below elevation zero, in output units.
    pub base_thickness: f64,
    /// Collapse co-planar regions after building.
    pub simplify: bool,
    /// Keep below-minimum cells as a flat plate instead of removing them.
    pub solid: bool,
    /// Reverse the row order before meshing.
    pub flip_y: bool,
}

impl RealiseConfig {
    /// Checks every scale and range before any meshing starts.
    ///
    /// # Examples
    /// ```
    /// use config::constants::{ConfigError, RealiseConfig};
    /// let bad = RealiseConfig { z_scale: 0.0, ..RealiseConfig::default() };
    /// assert_eq!(bad.validate(), Err(ConfigError::InvalidZScale(0.0)));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.xy_scale) {
            return Err(ConfigError::InvalidXyScale(self.xy_scale));
        }
        if !is_positive(self.z_scale) {
            return Err(ConfigError::InvalidZScale(self.z_scale));
        }
        if !is_positive(self.z_scale_reduction) {
            return Err(ConfigError::InvalidZScaleReduction(self.z_scale_reduction));
        }
        if !self.base_thickness.is_finite() || self.base_thickness < 0.0 {
            return Err(ConfigError::InvalidBaseThickness(self.base_thickness));
        }
        if !self.minimum.is_finite() || self.maximum.is_nan() || self.minimum > self.maximum {
            return Err(ConfigError::InvalidRange {
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        Ok(())
    }

    /// Elevation of the bottom plane, in pre-scale units.
    ///
    /// It goes through the same vertical scaling as every other vertex, so
    /// with no reduction the printed base ends up `base_thickness` below zero.
    pub fn bottom(&self) -> f64 {
        0.0 - (self.base_thickness / self.z_scale)
    }

    /// Whether elevations are clipped against [`RealiseConfig::maximum`].
    pub fn clips_maximum(&self) -> bool {
        self.maximum.is_finite()
    }
}

impl Default for RealiseConfig {
    fn default() -> Self {
        Self {
            xy_scale: DEFAULT_XY_SCALE,
            z_scale: DEFAULT_Z_SCALE,
            z_scale_reduction: DEFAULT_Z_SCALE_REDUCTION,
            minimum: DEFAULT_MINIMUM,
            maximum: DEFAULT_MAXIMUM,
            base_thickness: DEFAULT_BASE_THICKNESS,
            simplify: true,
            solid: false,
            flip_y: false,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Horizontal scale is zero, negative or not finite.
    InvalidXyScale(f64),
    /// Vertical scale is zero, negative or not finite.
    InvalidZScale(f64),
    /// Scale reduction is zero, negative or not finite.
    InvalidZScaleReduction(f64),
    /// Base thickness is negative or not finite.
    InvalidBaseThickness(f64),
    /// Minimum is not finite, maximum is NaN, or minimum exceeds maximum.
    InvalidRange {
        /// Configured minimum.
        minimum: f64,
        /// Configured maximum.
        maximum: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidXyScale(value) => {
                write!(f, "xy_scale must be positive and finite: {value}")
            }
            ConfigError::InvalidZScale(value) => {
                write!(f, "z_scale must be positive and finite: {value}")
            }
            ConfigError::InvalidZScaleReduction(value) => {
                write!(f, "z_scale_reduction must be positive and finite: {value}")
            }
            ConfigError::InvalidBaseThickness(value) => {
                write!(f, "base_thickness must be >= 0 and finite: {value}")
            }
            ConfigError::InvalidRange { minimum, maximum } => {
                write!(f, "invalid elevation range: minimum {minimum}, maximum {maximum}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
