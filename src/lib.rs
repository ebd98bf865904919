//! Aliascan - aliasing artifact detection for raster images
//!
//! Given one grayscale image, this library:
//! - Derives Canny-style edge thresholds from the median intensity
//! - Computes the 2D magnitude spectrum and an adaptive spectral threshold
//! - Correlates edge pixels with high-frequency energy
//! - Compares the image against its own 2x decimation/reconstruction
//! - Combines both signals into a boolean "aliased" verdict plus three
//!   inspection artifacts (spectrum, edge map, aliased-region mask)

pub mod correlate;
pub mod detect;
pub mod edge;
pub mod error;
pub mod grid;
pub mod loader;
pub mod spatial;
pub mod spectral;
pub mod subsample;

pub use detect::{detect_aliasing, detect_aliasing_file, AliasingReport, ReportSummary};
pub use error::{DetectError, Result};
pub use grid::{BinaryMask, IntensityGrid, ScalarGrid};
