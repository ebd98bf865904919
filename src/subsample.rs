//! Subsampling-artifact analysis
//!
//! Runs the image through a 2x decimation/reconstruction cycle and counts
//! pixels whose reconstruction error exceeds the spectral threshold.
//! Content a half-resolution copy cannot represent comes back wrong, so
//! large errors mark pixels susceptible to subsampling artifacts.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};

use crate::error::{DetectError, Result};
use crate::grid::IntensityGrid;

type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Count pixels whose 2x down/up reconstruction error exceeds `threshold`.
///
/// Both resampling passes use linear (triangle) interpolation; odd
/// dimensions floor-divide on the way down and restore exactly on the way
/// up. Grids smaller than 2x2 cannot be halved and fail with
/// `InvalidInput`.
pub fn subsample_artifact_count(grid: &IntensityGrid, threshold: f32) -> Result<usize> {
    let width = grid.width();
    let height = grid.height();
    if width < 2 || height < 2 {
        return Err(DetectError::invalid_input(
            "subsample analysis",
            format!("grid {}x{} is too small to halve", width, height),
        ));
    }

    let original = to_float_image(grid);
    let downsampled = imageops::resize(
        &original,
        (width / 2) as u32,
        (height / 2) as u32,
        FilterType::Triangle,
    );
    let reconstructed =
        imageops::resize(&downsampled, width as u32, height as u32, FilterType::Triangle);

    let count = grid
        .data()
        .iter()
        .zip(reconstructed.as_raw())
        .filter(|(&a, &b)| (a - b).abs() > threshold)
        .count();
    Ok(count)
}

fn to_float_image(grid: &IntensityGrid) -> FloatImage {
    FloatImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        Luma([grid.get(x as usize, y as usize)])
    })
}
