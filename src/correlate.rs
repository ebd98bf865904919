//! Edge/aliasing correlation
//!
//! Intersects the edge map with the pixels whose high-frequency energy
//! exceeds the spectral threshold. Only edge pixels can be flagged: a pixel
//! with strong high-frequency energy but no edge is never counted, so the
//! aliased-region mask is a subset of the edge mask by construction.

use crate::edge;
use crate::error::{DetectError, Result};
use crate::grid::{BinaryMask, IntensityGrid, ScalarGrid};
use crate::spatial::ThresholdPair;
use crate::spectral::SpectralAnalysis;

/// Output of the correlation stage.
#[derive(Debug, Clone)]
pub struct EdgeCorrelation {
    /// The raw edge map from the detector.
    pub edges: BinaryMask,
    /// Edge pixels whose high-frequency energy exceeds the threshold.
    pub aliased_regions: BinaryMask,
    /// Number of set pixels in `aliased_regions`.
    pub potential_aliasing_count: usize,
}

/// Run edge detection with the estimated thresholds and correlate the result
/// against the high-frequency energy map.
pub fn correlate_edges(
    grid: &IntensityGrid,
    thresholds: &ThresholdPair,
    spectral: &SpectralAnalysis,
) -> Result<EdgeCorrelation> {
    let edges = edge::detect_edges(&grid.to_gray_image(), thresholds);
    correlate(edges, &spectral.high_freq_energy, spectral.high_freq_threshold)
}

/// Intersect an edge mask with super-threshold energy pixels.
pub fn correlate(
    edges: BinaryMask,
    energy: &ScalarGrid,
    threshold: f32,
) -> Result<EdgeCorrelation> {
    if edges.width() != energy.width() || edges.height() != energy.height() {
        return Err(DetectError::invalid_input(
            "edge correlation",
            format!(
                "edge mask {}x{} does not match energy map {}x{}",
                edges.width(),
                edges.height(),
                energy.width(),
                energy.height()
            ),
        ));
    }

    let mut aliased_regions = BinaryMask::new(edges.width(), edges.height());
    for y in 0..edges.height() {
        for x in 0..edges.width() {
            if edges.get(x, y) && energy.get(x, y) > threshold {
                aliased_regions.set(x, y, true);
            }
        }
    }
    let potential_aliasing_count = aliased_regions.count_set();

    Ok(EdgeCorrelation { edges, aliased_regions, potential_aliasing_count })
}
