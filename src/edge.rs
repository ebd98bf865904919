//! Edge detection
//!
//! Gradient-magnitude edge detector with Canny-style double-threshold
//! hysteresis. Pixels at or above the upper threshold seed edges; pixels
//! between the thresholds become edges only when 8-connected to a seed.
//!
//! Gradients use forward differences rather than a smoothing kernel: a
//! Sobel response averages to exactly zero on a single-pixel checkerboard,
//! and pixel-rate transitions are precisely the content this detector must
//! not be blind to.

use image::GrayImage;

use crate::grid::BinaryMask;
use crate::spatial::ThresholdPair;

/// Detect edges in an 8-bit grayscale image.
///
/// Returns a mask with `true` at every detected edge pixel. Comparisons are
/// strict, so a zero-gradient image yields an empty mask even when both
/// thresholds are zero.
pub fn detect_edges(image: &GrayImage, thresholds: &ThresholdPair) -> BinaryMask {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut mask = BinaryMask::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }

    let magnitude = gradient_magnitude(image, width, height);

    // Seed from strong pixels, then grow through weak neighbors.
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if magnitude[y * width + x] > thresholds.upper {
                mask.set(x, y, true);
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for (nx, ny) in neighbors8(x, y, width, height) {
            if !mask.get(nx, ny) && magnitude[ny * width + nx] > thresholds.lower {
                mask.set(nx, ny, true);
                stack.push((nx, ny));
            }
        }
    }

    mask
}

/// Forward-difference gradient magnitude. The last column and row use a zero
/// difference in the clipped direction.
fn gradient_magnitude(image: &GrayImage, width: usize, height: usize) -> Vec<f32> {
    let pixel = |x: usize, y: usize| f32::from(image.get_pixel(x as u32, y as u32).0[0]);
    let mut magnitude = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let here = pixel(x, y);
            let gx = if x + 1 < width { pixel(x + 1, y) - here } else { 0.0 };
            let gy = if y + 1 < height { pixel(x, y + 1) - here } else { 0.0 };
            magnitude[y * width + x] = (gx * gx + gy * gy).sqrt();
        }
    }
    magnitude
}

/// The 8-connected neighborhood of `(x, y)`, clipped to the image bounds.
fn neighbors8(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 8] =
        [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
    OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    })
}
