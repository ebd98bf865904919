//! The detection pipeline
//!
//! Wires the stages together: threshold estimation and spectral analysis
//! (data-independent, run on both sides of a `rayon::join`), then edge
//! correlation, then the subsampling comparison, then the verdict. One
//! invocation is a pure function of the input grid; any stage failure
//! aborts the whole call.

use std::path::Path;

use serde::Serialize;

use crate::correlate;
use crate::error::Result;
use crate::grid::{BinaryMask, IntensityGrid, ScalarGrid};
use crate::loader;
use crate::spatial::{self, ThresholdPair};
use crate::spectral;
use crate::subsample;

/// Fraction of the image area the edge-correlated count must exceed.
pub const EDGE_ALIAS_AREA_RATIO: f32 = 0.02;
/// Fraction of the image area the reconstruction-error count must exceed.
pub const SUBSAMPLE_AREA_RATIO: f32 = 0.01;

/// Result record for one detection run.
///
/// The three grids are the inspection artifacts: the normalized magnitude
/// spectrum, the raw edge map, and the aliased-region mask (always a subset
/// of the edge map).
#[derive(Debug, Clone)]
pub struct AliasingReport {
    /// Final verdict: both counts exceeded their area-proportional cutoffs.
    pub is_aliased: bool,
    /// Center-shifted magnitude spectrum, normalized to [0, 1].
    pub normalized_spectrum: ScalarGrid,
    /// Edge map produced with the median-derived thresholds.
    pub edges: BinaryMask,
    /// Edge pixels carrying super-threshold high-frequency energy.
    pub aliased_regions: BinaryMask,
    /// Set-pixel count of `aliased_regions`.
    pub potential_aliasing_count: usize,
    /// Pixels whose 2x reconstruction error exceeded the spectral threshold.
    pub subsample_artifact_count: usize,
    /// The Canny-style threshold pair used for edge detection.
    pub spatial_thresholds: ThresholdPair,
    /// The adaptive spectral significance cutoff (`mean + 2*sigma`).
    pub high_freq_threshold: f32,
}

/// Serializable scalar view of a report, for logging or dumping alongside
/// the artifact grids.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub is_aliased: bool,
    pub width: usize,
    pub height: usize,
    pub potential_aliasing_count: usize,
    pub subsample_artifact_count: usize,
    pub edge_count: usize,
    pub spatial_thresholds: ThresholdPair,
    pub high_freq_threshold: f32,
}

impl AliasingReport {
    /// Scalar summary of this report.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            is_aliased: self.is_aliased,
            width: self.edges.width(),
            height: self.edges.height(),
            potential_aliasing_count: self.potential_aliasing_count,
            subsample_artifact_count: self.subsample_artifact_count,
            edge_count: self.edges.count_set(),
            spatial_thresholds: self.spatial_thresholds,
            high_freq_threshold: self.high_freq_threshold,
        }
    }
}

/// Combine the two counts into the final verdict.
///
/// Both conditions are necessary: edge-correlated spectral anomalies alone,
/// or reconstruction error alone, do not flag an image.
pub fn verdict(
    potential_aliasing_count: usize,
    subsample_artifact_count: usize,
    pixel_count: usize,
) -> bool {
    let area = pixel_count as f32;
    potential_aliasing_count as f32 > EDGE_ALIAS_AREA_RATIO * area
        && subsample_artifact_count as f32 > SUBSAMPLE_AREA_RATIO * area
}

/// Run the full detection pipeline over an intensity grid.
pub fn detect_aliasing(grid: &IntensityGrid) -> Result<AliasingReport> {
    let (spatial_thresholds, spectral_analysis) = rayon::join(
        || spatial::estimate_thresholds(grid),
        || spectral::analyze_spectrum(grid),
    );
    let spatial_thresholds = spatial_thresholds?;
    let spectral_analysis = spectral_analysis?;

    let correlation = correlate::correlate_edges(grid, &spatial_thresholds, &spectral_analysis)?;
    let subsample_artifact_count =
        subsample::subsample_artifact_count(grid, spectral_analysis.high_freq_threshold)?;

    let is_aliased =
        verdict(correlation.potential_aliasing_count, subsample_artifact_count, grid.len());

    Ok(AliasingReport {
        is_aliased,
        normalized_spectrum: spectral_analysis.normalized_spectrum,
        edges: correlation.edges,
        aliased_regions: correlation.aliased_regions,
        potential_aliasing_count: correlation.potential_aliasing_count,
        subsample_artifact_count,
        spatial_thresholds,
        high_freq_threshold: spectral_analysis.high_freq_threshold,
    })
}

/// Load an image from disk and run the detection pipeline over it.
pub fn detect_aliasing_file(path: impl AsRef<Path>) -> Result<AliasingReport> {
    let grid = loader::load_grayscale(path)?;
    detect_aliasing(&grid)
}

/// Format a report as human-readable text.
pub fn format_report_text(report: &AliasingReport) -> String {
    let mut output = String::new();
    let summary = report.summary();

    output.push_str("Aliascan Detection Report\n");
    output.push_str("=========================\n");
    output.push_str(&format!("Image: {}x{}\n", summary.width, summary.height));
    output.push_str(&format!(
        "Verdict: {}\n",
        if summary.is_aliased { "aliased" } else { "not aliased" }
    ));
    output.push('\n');

    let area = (summary.width * summary.height) as f32;
    output.push_str(&format!(
        "Edge-correlated pixels:    {:>8}  (cutoff {})\n",
        summary.potential_aliasing_count,
        (EDGE_ALIAS_AREA_RATIO * area) as usize
    ));
    output.push_str(&format!(
        "Reconstruction artifacts:  {:>8}  (cutoff {})\n",
        summary.subsample_artifact_count,
        (SUBSAMPLE_AREA_RATIO * area) as usize
    ));
    output.push_str(&format!("Edge pixels:               {:>8}\n", summary.edge_count));
    output.push('\n');
    output.push_str(&format!(
        "Canny thresholds: {:.2} / {:.2}\n",
        summary.spatial_thresholds.lower, summary.spatial_thresholds.upper
    ));
    output.push_str(&format!("Spectral threshold: {:.6}\n", summary.high_freq_threshold));

    output
}
