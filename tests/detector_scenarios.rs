//! End-to-end scenarios for the detection pipeline
//!
//! Exercises the synthetic reference inputs: a Nyquist-rate checkerboard
//! (the canonical aliased image), a uniform gray card, and a smooth
//! horizontal ramp, plus determinism and the file-loading entry point.

use aliascan::detect::{
    detect_aliasing, detect_aliasing_file, format_report_text, EDGE_ALIAS_AREA_RATIO,
    SUBSAMPLE_AREA_RATIO,
};
use aliascan::loader::load_grayscale;
use aliascan::{DetectError, IntensityGrid};

const SIZE: usize = 256;

fn checkerboard() -> IntensityGrid {
    IntensityGrid::from_fn(SIZE, SIZE, |x, y| ((x + y) % 2) as f32).unwrap()
}

fn uniform_gray() -> IntensityGrid {
    IntensityGrid::from_fn(SIZE, SIZE, |_, _| 0.5).unwrap()
}

fn horizontal_ramp() -> IntensityGrid {
    IntensityGrid::from_fn(SIZE, SIZE, |x, _| x as f32 / (SIZE - 1) as f32).unwrap()
}

#[test]
fn checkerboard_at_nyquist_is_aliased() {
    let report = detect_aliasing(&checkerboard()).unwrap();
    let area = SIZE * SIZE;

    assert!(report.is_aliased);
    // Both counts clear their cutoffs (2% and 1% of 65536).
    assert!(report.potential_aliasing_count as f32 > EDGE_ALIAS_AREA_RATIO * area as f32);
    assert!(report.subsample_artifact_count as f32 > SUBSAMPLE_AREA_RATIO * area as f32);
    // Spectral energy sits at the shifted spectrum's center (DC) and corner
    // (Nyquist); the corner spike is what marks the pattern as undersampled.
    assert!(report.normalized_spectrum.get(0, 0) > 0.999);
    assert!(report.normalized_spectrum.get(SIZE / 2, SIZE / 2) > 0.999);
    assert_eq!(report.normalized_spectrum.max(), 1.0);
}

#[test]
fn uniform_gray_is_not_aliased() {
    let report = detect_aliasing(&uniform_gray()).unwrap();

    assert!(!report.is_aliased);
    assert_eq!(report.potential_aliasing_count, 0);
    assert_eq!(report.subsample_artifact_count, 0);
}

#[test]
fn smooth_gradient_is_not_aliased() {
    let report = detect_aliasing(&horizontal_ramp()).unwrap();

    assert!(!report.is_aliased);
    // A one-step-per-pixel ramp has gradients far below the hysteresis
    // thresholds, so nothing is edge-correlated.
    assert_eq!(report.edges.count_set(), 0);
    assert_eq!(report.potential_aliasing_count, 0);
}

#[test]
fn aliased_regions_are_contained_in_edges() {
    for grid in [checkerboard(), uniform_gray(), horizontal_ramp()] {
        let report = detect_aliasing(&grid).unwrap();
        assert!(report.aliased_regions.is_subset_of(&report.edges));
    }
}

#[test]
fn repeated_runs_are_deterministic() {
    let grid = checkerboard();
    let first = detect_aliasing(&grid).unwrap();
    let second = detect_aliasing(&grid).unwrap();

    assert_eq!(first.is_aliased, second.is_aliased);
    assert_eq!(first.potential_aliasing_count, second.potential_aliasing_count);
    assert_eq!(first.subsample_artifact_count, second.subsample_artifact_count);
    assert_eq!(first.high_freq_threshold, second.high_freq_threshold);
    assert_eq!(first.normalized_spectrum, second.normalized_spectrum);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.aliased_regions, second.aliased_regions);
}

#[test]
fn normalized_spectrum_peaks_at_one() {
    for grid in [checkerboard(), uniform_gray(), horizontal_ramp()] {
        let report = detect_aliasing(&grid).unwrap();
        assert_eq!(report.normalized_spectrum.max(), 1.0);
    }
}

#[test]
fn report_text_is_complete() {
    let report = detect_aliasing(&checkerboard()).unwrap();
    let text = format_report_text(&report);
    assert!(text.contains("Verdict: aliased"));
    assert!(text.contains("256x256"));
}

#[test]
fn loads_grayscale_png_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checker.png");
    checkerboard().to_gray_image().save(&path).unwrap();

    let loaded = load_grayscale(&path).unwrap();
    assert_eq!(loaded.width(), SIZE);
    assert_eq!(loaded.height(), SIZE);
    assert_eq!(loaded, checkerboard());
}

#[test]
fn detects_aliasing_from_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checker.png");
    checkerboard().to_gray_image().save(&path).unwrap();

    let report = detect_aliasing_file(&path).unwrap();
    assert!(report.is_aliased);
}

#[test]
fn missing_file_surfaces_image_not_found() {
    let err = detect_aliasing_file("definitely/not/here.png").unwrap_err();
    assert!(matches!(err, DetectError::ImageNotFound { .. }));
}
