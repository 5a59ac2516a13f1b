//! Technical usability checks: dimensions, encoded size, exposure and
//! sharpness, scored against caller-supplied thresholds.

use image::{DynamicImage, GrayImage};
use tracing::warn;

use crate::config::{QualityThresholds, WorkingSize};
use crate::detection::preprocessing::{resize_to_fit, to_grayscale};
use crate::error::QualityError;
use crate::models::{ImageMetadata, QualityMetrics, QualityReport};

/// Brightness and contrast used when the grayscale statistics cannot be taken
pub const DEFAULT_BRIGHTNESS: f64 = 128.0;
pub const DEFAULT_CONTRAST: f64 = 128.0;
/// Sharpness used when the Laplacian measurement cannot be taken
pub const DEFAULT_SHARPNESS: f64 = 0.5;

const WIDTH_PENALTY: i32 = 20;
const HEIGHT_PENALTY: i32 = 20;
const SMALL_FILE_PENALTY: i32 = 15;
const LARGE_FILE_PENALTY: i32 = 10;
const EXPOSURE_PENALTY: i32 = 15;
const BLUR_PENALTY: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessStats {
    pub average: f64,
    pub contrast: f64,
    pub min: u8,
    pub max: u8,
}

/// Mean, minimum and maximum intensity in one pass over a grayscale buffer
pub fn measure_brightness(gray: &GrayImage) -> Result<BrightnessStats, QualityError> {
    let data = gray.as_raw();
    if data.is_empty() {
        return Err(QualityError::EmptyBuffer);
    }

    let mut sum: u64 = 0;
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for &pixel in data {
        sum += pixel as u64;
        min = min.min(pixel);
        max = max.max(pixel);
    }

    Ok(BrightnessStats {
        average: sum as f64 / data.len() as f64,
        contrast: (max - min) as f64,
        min,
        max,
    })
}

/// Root-mean-square response of the 8-neighbour Laplacian, normalized to
/// 0..=1 by the maximum intensity. The image is first shrunk to fit the
/// working size. Images without interior pixels score 0.
pub fn measure_sharpness(gray: &GrayImage, working: WorkingSize) -> Result<f64, QualityError> {
    if gray.as_raw().is_empty() {
        return Err(QualityError::EmptyBuffer);
    }

    let small = resize_to_fit(gray, working.width, working.height);
    let (width, height) = small.dimensions();
    if width < 3 || height < 3 {
        return Ok(0.0);
    }

    let data = small.as_raw();
    let w = width as usize;
    let mut sum_sq = 0.0f64;
    let mut count: u64 = 0;

    for y in 1..height as usize - 1 {
        for x in 1..w - 1 {
            let center = data[y * w + x] as i32 * 8;
            let neighbors = data[(y - 1) * w + x - 1] as i32
                + data[(y - 1) * w + x] as i32
                + data[(y - 1) * w + x + 1] as i32
                + data[y * w + x - 1] as i32
                + data[y * w + x + 1] as i32
                + data[(y + 1) * w + x - 1] as i32
                + data[(y + 1) * w + x] as i32
                + data[(y + 1) * w + x + 1] as i32;
            let laplacian = (center - neighbors) as f64;
            sum_sq += laplacian * laplacian;
            count += 1;
        }
    }

    Ok((sum_sq / count as f64).sqrt() / 255.0)
}

/// Score an image against the thresholds. A report passes only when no
/// check failed, regardless of the remaining score.
pub fn assess_quality(
    image: &DynamicImage,
    metadata: &ImageMetadata,
    thresholds: &QualityThresholds,
    sharpness_working: WorkingSize,
) -> QualityReport {
    let mut issues = Vec::new();
    let mut score: i32 = 100;

    if metadata.width < thresholds.min_width {
        issues.push(format!(
            "Image width too small: {}px (minimum: {}px)",
            metadata.width, thresholds.min_width
        ));
        score -= WIDTH_PENALTY;
    }

    if metadata.height < thresholds.min_height {
        issues.push(format!(
            "Image height too small: {}px (minimum: {}px)",
            metadata.height, thresholds.min_height
        ));
        score -= HEIGHT_PENALTY;
    }

    if metadata.size < thresholds.min_file_size {
        issues.push(format!(
            "File size too small: {} bytes (minimum: {} bytes)",
            metadata.size, thresholds.min_file_size
        ));
        score -= SMALL_FILE_PENALTY;
    }

    if metadata.size > thresholds.max_file_size {
        issues.push(format!(
            "File size too large: {} bytes (maximum: {} bytes)",
            metadata.size, thresholds.max_file_size
        ));
        score -= LARGE_FILE_PENALTY;
    }

    let gray = to_grayscale(image);

    let (brightness, contrast) = match measure_brightness(&gray) {
        Ok(stats) => (stats.average, stats.contrast),
        Err(e) => {
            warn!(error = %e, "Brightness measurement failed, using defaults");
            (DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST)
        }
    };

    if brightness < thresholds.min_brightness {
        issues.push("Image too dark".to_string());
        score -= EXPOSURE_PENALTY;
    }

    if brightness > thresholds.max_brightness {
        issues.push("Image too bright/overexposed".to_string());
        score -= EXPOSURE_PENALTY;
    }

    let sharpness = match measure_sharpness(&gray, sharpness_working) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Sharpness measurement failed, using default");
            DEFAULT_SHARPNESS
        }
    };

    if sharpness < thresholds.min_sharpness {
        issues.push("Image appears blurry".to_string());
        score -= BLUR_PENALTY;
    }

    QualityReport {
        passed: issues.is_empty(),
        score: score.clamp(0, 100) as u8,
        issues,
        metrics: QualityMetrics {
            brightness,
            contrast,
            sharpness,
        },
    }
}
