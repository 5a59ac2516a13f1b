mod common;

use boardscan::detection::preprocessing::{decode, resize_to_fit};
use boardscan::detection::quality::{
    DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST, DEFAULT_SHARPNESS, assess_quality, measure_brightness, measure_sharpness,
};
use boardscan::{ImageMetadata, QualityError, WorkingSize};
use common::*;
use image::{DynamicImage, GrayImage};

const WORKING: WorkingSize = WorkingSize::new(400, 300);

fn metadata_for(img: &DynamicImage, size: u64) -> ImageMetadata {
    ImageMetadata {
        width: img.width(),
        height: img.height(),
        format: "png".to_string(),
        pixel_format: "l8".to_string(),
        size,
    }
}

#[test]
fn brightness_statistics_in_one_pass() {
    let gray = GrayImage::from_raw(2, 2, vec![0, 100, 200, 255]).unwrap();
    let stats = measure_brightness(&gray).unwrap();
    assert!((stats.average - 138.75).abs() < 1e-9);
    assert_eq!(stats.contrast, 255.0);
    assert_eq!((stats.min, stats.max), (0, 255));
}

#[test]
fn brightness_of_empty_buffer_is_an_error() {
    let gray = GrayImage::new(0, 0);
    assert_eq!(measure_brightness(&gray), Err(QualityError::EmptyBuffer));
}

#[test]
fn flat_image_has_zero_sharpness() {
    let sharpness = measure_sharpness(&uniform_gray(50, 50, 128), WORKING).unwrap();
    assert_eq!(sharpness, 0.0);
}

#[test]
fn checkerboard_laplacian_response() {
    // Every interior response is +/-1020, i.e. 4x the maximum intensity.
    let sharpness = measure_sharpness(&checkerboard(10, 10), WORKING).unwrap();
    assert!((sharpness - 4.0).abs() < 1e-9, "sharpness was {sharpness}");
}

#[test]
fn image_without_interior_pixels_scores_zero_sharpness() {
    let sharpness = measure_sharpness(&checkerboard(2, 2), WORKING).unwrap();
    assert_eq!(sharpness, 0.0);
}

#[test]
fn sharpness_runs_on_a_bounded_working_image() {
    // A large flat image stays flat after shrinking.
    let sharpness = measure_sharpness(&uniform_gray(1600, 1200, 90), WORKING).unwrap();
    assert_eq!(sharpness, 0.0);
}

#[test]
fn zero_working_size_leaves_the_image_unscaled() {
    let img = checkerboard(10, 10);
    assert_eq!(resize_to_fit(&img, 0, 0).dimensions(), (10, 10));

    let unscaled = measure_sharpness(&img, WorkingSize::new(0, 0)).unwrap();
    let bounded = measure_sharpness(&img, WORKING).unwrap();
    assert_eq!(unscaled, bounded);
}

#[test]
fn black_image_is_too_dark() {
    let img = DynamicImage::ImageLuma8(uniform_gray(100, 100, 0));
    let bytes = encode_png(&img);
    let decoded = decode(&bytes).unwrap();

    let report = assess_quality(&decoded.image, &decoded.metadata, &QualityThresholds::default(), WORKING);

    assert!(!report.passed);
    assert!(report.metrics.brightness.abs() < 1e-9);
    assert!(report.issues.iter().any(|issue| issue.contains("too dark")));
}

#[test]
fn undersized_image_loses_forty_points() {
    let img = DynamicImage::ImageLuma8(uniform_gray(50, 50, 128));
    let thresholds = QualityThresholds {
        min_width: 800,
        min_height: 600,
        ..lenient_thresholds()
    };

    let report = assess_quality(&img, &metadata_for(&img, 1_000), &thresholds, WORKING);

    assert!(!report.passed);
    assert_eq!(report.score, 60);
    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.issues[0], "Image width too small: 50px (minimum: 800px)");
    assert_eq!(report.issues[1], "Image height too small: 50px (minimum: 600px)");
}

#[test]
fn single_violation_fails_despite_high_score() {
    let img = DynamicImage::ImageLuma8(checkerboard(64, 64));
    let thresholds = QualityThresholds {
        max_file_size: 10,
        ..lenient_thresholds()
    };

    let report = assess_quality(&img, &metadata_for(&img, 500), &thresholds, WORKING);

    assert!(!report.passed);
    assert_eq!(report.score, 90);
    assert_eq!(report.issues, vec!["File size too large: 500 bytes (maximum: 10 bytes)".to_string()]);
}

#[test]
fn score_never_drops_below_zero() {
    let img = DynamicImage::ImageLuma8(uniform_gray(10, 10, 128));
    let thresholds = QualityThresholds {
        min_width: 100,
        min_height: 100,
        min_file_size: u64::MAX,
        max_file_size: 0,
        min_brightness: 255.0,
        max_brightness: 0.0,
        min_sharpness: 1.0,
    };

    let report = assess_quality(&img, &metadata_for(&img, 100), &thresholds, WORKING);

    assert_eq!(report.score, 0);
    assert_eq!(report.issues.len(), 7);
}

#[test]
fn passing_image_keeps_full_score() {
    let img = DynamicImage::ImageLuma8(checkerboard(64, 64));
    let report = assess_quality(&img, &metadata_for(&img, 500), &lenient_thresholds(), WORKING);

    assert!(report.passed);
    assert_eq!(report.score, 100);
    assert!(report.issues.is_empty());
    assert_eq!(report.metrics.contrast, 255.0);
}

#[test]
fn empty_buffer_degrades_to_documented_defaults() {
    let img = DynamicImage::new_luma8(0, 0);
    let report = assess_quality(&img, &metadata_for(&img, 0), &lenient_thresholds(), WORKING);

    assert_eq!(report.metrics.brightness, DEFAULT_BRIGHTNESS);
    assert_eq!(report.metrics.contrast, DEFAULT_CONTRAST);
    assert_eq!(report.metrics.sharpness, DEFAULT_SHARPNESS);
}
