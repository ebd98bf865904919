//! Frequency-domain analysis
//!
//! Computes the 2D frequency transform of the image, the center-shifted
//! magnitude spectrum, and two derived quantities the rest of the pipeline
//! consumes:
//!
//! - an adaptive high-frequency threshold (`mean + 2*sigma` over the
//!   normalized spectrum), so "unusually energetic" is measured against the
//!   image's own spectral baseline rather than a global constant
//! - a per-pixel high-frequency energy map: the magnitude of the inverse
//!   transform of the above-half-Nyquist band, which localizes where in the
//!   image the high-frequency content lives

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{DetectError, Result};
use crate::grid::{IntensityGrid, ScalarGrid};

/// Radial frequency (as a fraction of Nyquist) above which a bin counts as
/// high-frequency for the energy map.
const HIGH_FREQ_CUTOFF: f32 = 0.5;

/// Output of the spectral stage.
#[derive(Debug, Clone)]
pub struct SpectralAnalysis {
    /// Center-shifted magnitude spectrum divided by its own maximum.
    /// Max is exactly 1.0 unless the input was all-zero, in which case the
    /// whole grid is zero (the degenerate-spectrum special case).
    pub normalized_spectrum: ScalarGrid,
    /// `mean + 2*sigma` of the normalized spectrum; the significance cutoff
    /// shared by the correlation and subsampling stages.
    pub high_freq_threshold: f32,
    /// Per-pixel magnitude of the above-half-Nyquist image content.
    pub high_freq_energy: ScalarGrid,
}

/// Run the spectral stage over an intensity grid.
///
/// Fails with `InvalidInput` on a zero-area grid. An all-zero image (zero
/// spectrum maximum) is not an error: normalization would divide by zero, so
/// the normalized spectrum and energy map are substituted with all-zero
/// grids and the threshold with 0.0.
pub fn analyze_spectrum(grid: &IntensityGrid) -> Result<SpectralAnalysis> {
    if grid.is_empty() {
        return Err(DetectError::invalid_input("spectral analysis", "zero-area grid"));
    }
    let width = grid.width();
    let height = grid.height();

    let mut freq: Vec<Complex<f32>> =
        grid.data().iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft_2d(&mut freq, width, height, false);

    let magnitude: Vec<f32> = freq.iter().map(|c| c.norm()).collect();
    let shifted = center_shift(&magnitude, width, height);

    let max = shifted.iter().copied().fold(0.0f32, f32::max);
    if max == 0.0 {
        // Degenerate spectrum: flat-zero image. Substitute zeros instead of
        // letting NaN propagate into the downstream comparisons.
        return Ok(SpectralAnalysis {
            normalized_spectrum: ScalarGrid::zeros(width, height),
            high_freq_threshold: 0.0,
            high_freq_energy: ScalarGrid::zeros(width, height),
        });
    }

    let normalized: Vec<f32> = shifted.iter().map(|&v| v / max).collect();
    let (mean, std) = population_stats(&normalized);
    let high_freq_threshold = mean + 2.0 * std;

    let high_freq_energy = high_frequency_energy(&freq, width, height);

    Ok(SpectralAnalysis {
        normalized_spectrum: ScalarGrid::new(width, height, normalized),
        high_freq_threshold,
        high_freq_energy,
    })
}

/// In-place 2D FFT: a 1D pass over every row, then over every column.
///
/// rustfft transforms are unnormalized; a forward/inverse round trip scales
/// by `width * height`.
fn fft_2d(buffer: &mut [Complex<f32>], width: usize, height: usize, inverse: bool) {
    let mut planner = FftPlanner::new();

    let row_fft =
        if inverse { planner.plan_fft_inverse(width) } else { planner.plan_fft_forward(width) };
    for row in buffer.chunks_exact_mut(width) {
        row_fft.process(row);
    }

    let col_fft =
        if inverse { planner.plan_fft_inverse(height) } else { planner.plan_fft_forward(height) };
    let mut column = vec![Complex::new(0.0, 0.0); height];
    for x in 0..width {
        for y in 0..height {
            column[y] = buffer[y * width + x];
        }
        col_fft.process(&mut column);
        for y in 0..height {
            buffer[y * width + x] = column[y];
        }
    }
}

/// Shift a row-major grid so the zero-frequency bin lands at the geometric
/// center: element `i` moves to `(i + n/2) % n` along each axis.
fn center_shift(values: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for y in 0..height {
        let sy = (y + height / 2) % height;
        for x in 0..width {
            let sx = (x + width / 2) % width;
            out[sy * width + sx] = values[y * width + x];
        }
    }
    out
}

/// Signed frequency index for an unshifted FFT axis of the given size.
fn signed_frequency(index: usize, size: usize) -> isize {
    if index <= size / 2 {
        index as isize
    } else {
        index as isize - size as isize
    }
}

/// Magnitude of the image content carried by radial frequencies at or above
/// `HIGH_FREQ_CUTOFF` of Nyquist: zero the low band, inverse-transform, take
/// the per-pixel modulus.
fn high_frequency_energy(freq: &[Complex<f32>], width: usize, height: usize) -> ScalarGrid {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    let mut band = freq.to_vec();
    for y in 0..height {
        let fy = signed_frequency(y, height) as f32 / half_h;
        for x in 0..width {
            let fx = signed_frequency(x, width) as f32 / half_w;
            if (fx * fx + fy * fy).sqrt() < HIGH_FREQ_CUTOFF {
                band[y * width + x] = Complex::new(0.0, 0.0);
            }
        }
    }

    fft_2d(&mut band, width, height, true);
    let scale = 1.0 / (width * height) as f32;
    ScalarGrid::new(width, height, band.iter().map(|c| c.norm() * scale).collect())
}

/// Mean and population standard deviation, accumulated in f64.
fn population_stats(values: &[f32]) -> (f32, f32) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean as f32, variance.sqrt() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: usize) -> IntensityGrid {
        IntensityGrid::from_fn(size, size, |x, y| ((x + y) % 2) as f32).unwrap()
    }

    #[test]
    fn test_center_shift_moves_dc_to_center() {
        // 4-wide row: element 0 lands at index 2.
        let shifted = center_shift(&[10.0, 20.0, 30.0, 40.0], 4, 1);
        assert_eq!(shifted, vec![30.0, 40.0, 10.0, 20.0]);
    }

    #[test]
    fn test_signed_frequency_wraps_upper_half() {
        assert_eq!(signed_frequency(0, 8), 0);
        assert_eq!(signed_frequency(4, 8), 4);
        assert_eq!(signed_frequency(5, 8), -3);
        assert_eq!(signed_frequency(7, 8), -1);
    }

    #[test]
    fn test_fft_round_trip_recovers_input() {
        let original: Vec<Complex<f32>> =
            (0..24).map(|i| Complex::new((i % 7) as f32 / 7.0, 0.0)).collect();
        let mut buffer = original.clone();
        fft_2d(&mut buffer, 6, 4, false);
        fft_2d(&mut buffer, 6, 4, true);
        for (a, b) in buffer.iter().zip(&original) {
            assert!((a.re / 24.0 - b.re).abs() < 1e-5);
            assert!((a.im / 24.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_constant_image_spectrum_is_dc_only() {
        let grid = IntensityGrid::from_fn(32, 32, |_, _| 0.5).unwrap();
        let analysis = analyze_spectrum(&grid).unwrap();
        let spectrum = &analysis.normalized_spectrum;

        // DC sits at the geometric center after the shift.
        assert_eq!(spectrum.get(16, 16), 1.0);
        for y in 0..32 {
            for x in 0..32 {
                if (x, y) != (16, 16) {
                    assert!(spectrum.get(x, y) < 1e-3, "energy leaked to ({}, {})", x, y);
                }
            }
        }
        // No content above half-Nyquist in a flat image.
        assert!(analysis.high_freq_energy.max() < 1e-4);
    }

    #[test]
    fn test_normalization_invariant() {
        let grid = IntensityGrid::from_fn(17, 13, |x, y| ((x * 31 + y * 17) % 11) as f32 / 10.0)
            .unwrap();
        let analysis = analyze_spectrum(&grid).unwrap();
        assert_eq!(analysis.normalized_spectrum.max(), 1.0);
        assert!(analysis.high_freq_threshold > 0.0);
    }

    #[test]
    fn test_all_zero_image_degenerates_to_zero_spectrum() {
        let grid = IntensityGrid::from_fn(16, 16, |_, _| 0.0).unwrap();
        let analysis = analyze_spectrum(&grid).unwrap();
        assert_eq!(analysis.normalized_spectrum.max(), 0.0);
        assert_eq!(analysis.high_freq_threshold, 0.0);
        assert_eq!(analysis.high_freq_energy.max(), 0.0);
        assert!(analysis.normalized_spectrum.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_cosine_produces_symmetric_spike_pair() {
        use std::f32::consts::TAU;
        // Period-8 horizontal cosine on a 64x64 grid: spikes at +/-8 cycles.
        let grid = IntensityGrid::from_fn(64, 64, |x, _| {
            0.5 + 0.5 * (TAU * 8.0 * x as f32 / 64.0).cos()
        })
        .unwrap();
        let spectrum = analyze_spectrum(&grid).unwrap().normalized_spectrum;

        // DC dominates; each cosine spike carries half its weight.
        assert_eq!(spectrum.get(32, 32), 1.0);
        assert!((spectrum.get(40, 32) - 0.5).abs() < 1e-3);
        assert!((spectrum.get(24, 32) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_checkerboard_energy_is_uniform_half() {
        // A Nyquist-rate checkerboard is DC + one Nyquist spike; removing the
        // low band leaves a +/-0.5 square wave.
        let analysis = analyze_spectrum(&checkerboard(64)).unwrap();
        for &e in analysis.high_freq_energy.data() {
            assert!((e - 0.5).abs() < 1e-3, "expected 0.5, got {}", e);
        }
    }

    #[test]
    fn test_checkerboard_threshold_is_small() {
        // Two-spike spectrum: mean + 2*sigma of the normalized grid stays
        // far below the 0.5 energy plateau the correlator compares against.
        let analysis = analyze_spectrum(&checkerboard(64)).unwrap();
        assert!(analysis.high_freq_threshold > 0.0);
        assert!(analysis.high_freq_threshold < 0.1);
    }

    #[test]
    fn test_empty_grid_is_invalid_input() {
        let grid = IntensityGrid::from_raw(0, 0, vec![]).unwrap();
        assert!(analyze_spectrum(&grid).is_err());
    }
}
