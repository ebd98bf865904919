//! Image loading
//!
//! Decodes an image file into a grayscale [`IntensityGrid`] normalized to
//! [0, 1]. This is the only file I/O in the crate.

use std::path::Path;

use crate::error::{DetectError, Result};
use crate::grid::IntensityGrid;

/// Load an image from disk as a normalized grayscale grid.
///
/// Color inputs are converted to luma before normalization. Decode failures
/// (missing file, unsupported or corrupt format) surface as
/// [`DetectError::ImageNotFound`].
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<IntensityGrid> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| DetectError::ImageNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    IntensityGrid::from_gray_image(&image.into_luma8())
}
