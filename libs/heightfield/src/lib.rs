//! # Heightfield
//!
//! Rectangular elevation grids with a "no data" notion, and the policy that
//! turns raw samples into the field the mesh builder walks.
//!
//! ## Architecture
//!
//! ```text
//! ElevationSource (raster tools) → HeightGrid → policy → HeightField
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{RealiseConfig, NODATA};
//! use heightfield::{HeightField, HeightGrid, Sample};
//!
//! let grid = HeightGrid::from_rows(vec![vec![10.0, NODATA], vec![12.0, 3.0]], NODATA)?;
//! let field = HeightField::prepare(&grid, &RealiseConfig::default())?;
//! assert_eq!(field.sample(0, 1), Sample::Absent);
//! assert_eq!(field.present_count(), 3);
//! # Ok::<(), heightfield::HeightFieldError>(())
//! ```

pub mod error;
pub mod field;
pub mod grid;
pub mod policy;
pub mod sample;

pub use error::{HeightFieldError, HeightFieldResult};
pub use field::{HeightField, ModelExtents};
pub use grid::{ElevationSource, HeightGrid};
pub use policy::ElevationPolicy;
pub use sample::Sample;
