//! Grid types shared across the pipeline
//!
//! Three shapes of 2D data flow through the detector:
//! - [`IntensityGrid`] - the input image as floats in [0, 1]
//! - [`ScalarGrid`] - derived non-negative data (spectra, energy maps)
//! - [`BinaryMask`] - edge and aliased-region masks
//!
//! All three are row-major and immutable once handed to a downstream stage.

use image::GrayImage;

use crate::error::{DetectError, Result};

/// Round a non-negative 0-255 domain value half up to a byte.
///
/// Policy: exact halves round toward the larger byte (127.5 -> 128,
/// 254.5 -> 255). On the non-negative domain this is identical to
/// round-half-away-from-zero; `floor(x + 0.5)` states it directly.
pub fn round_half_up(value: f32) -> u8 {
    (value + 0.5).floor().min(255.0) as u8
}

/// A grayscale image as floats in [0, 1], row-major.
///
/// Invariants (checked at construction): every value is finite,
/// non-negative, and at most 1.0. Zero-area grids are representable -
/// the analysis stages reject them with `InvalidInput`, per their own
/// preconditions.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl IntensityGrid {
    /// Build a grid from row-major data, validating the value invariants.
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(DetectError::invalid_input(
                "intensity grid",
                format!("data length {} does not match {}x{}", data.len(), width, height),
            ));
        }
        for (i, &v) in data.iter().enumerate() {
            if !v.is_finite() || v < 0.0 || v > 1.0 {
                return Err(DetectError::invalid_input(
                    "intensity grid",
                    format!("value {} at index {} is outside [0, 1]", v, i),
                ));
            }
        }
        Ok(Self { width, height, data })
    }

    /// Build a grid by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Result<Self> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_raw(width, height, data)
    }

    /// Convert an 8-bit grayscale image, normalizing to [0, 1].
    pub fn from_gray_image(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let data = image.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();
        Self::from_raw(width as usize, height as usize, data)
    }

    /// Rescale to an 8-bit grayscale image using the round-half-up policy.
    pub fn to_gray_image(&self) -> GrayImage {
        let bytes: Vec<u8> = self.data.iter().map(|&v| round_half_up(v * 255.0)).collect();
        // Length invariant guarantees from_raw succeeds.
        GrayImage::from_raw(self.width as u32, self.height as u32, bytes)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Row-major backing data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// A grid of non-negative reals, row-major. Used for magnitude spectra and
/// high-frequency energy maps; unlike [`IntensityGrid`] there is no upper
/// bound on values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScalarGrid {
    pub(crate) fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    /// All-zero grid of the given shape.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Largest value in the grid (0.0 for an empty grid).
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

/// A boolean pixel mask, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    /// All-clear mask of the given shape.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![false; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = value;
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }

    /// True if every set pixel here is also set in `other`.
    pub fn is_subset_of(&self, other: &BinaryMask) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.data.iter().zip(&other.data).all(|(&a, &b)| !a || b)
    }
}
