//! # Config Crate
//!
//! Centralized configuration for the heightfield-to-mesh pipeline.
//! The NODATA sentinel, the scale defaults, the binary STL layout sizes and
//! the validated [`constants::RealiseConfig`] all live here so the grid and
//! mesh crates never carry their own literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{RealiseConfig, NODATA};
//!
//! let cfg = RealiseConfig {
//!     xy_scale: 0.5,
//!     base_thickness: 2.0,
//!     ..RealiseConfig::default()
//! };
//! assert!(cfg.validate().is_ok());
//! assert!(NODATA < 0.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every default is defined once
//! - **Validated Up Front**: bad scales are rejected before any meshing starts

pub mod constants;
