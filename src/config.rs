use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Quality gate bounds. Any violated bound fails the quality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityThresholds {
    pub min_width: u32,
    pub min_height: u32,
    /// Encoded file size bounds, in bytes
    pub min_file_size: u64,
    pub max_file_size: u64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub min_sharpness: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            min_file_size: 50_000,
            max_file_size: 10_000_000,
            min_brightness: 30.0,
            max_brightness: 220.0,
            min_sharpness: 0.3,
        }
    }
}

/// Parameters for the edge/contour board detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardDetection {
    /// Smallest contour, as a fraction of the image area, counted as a board
    pub min_board_area: f64,
    /// Largest contour, as a fraction of the image area, counted as a board
    pub max_board_area: f64,
    /// Sobel magnitude a pixel must exceed to be an edge
    pub edge_threshold: f64,
    /// Connected components smaller than this many pixels are discarded
    pub contour_min_area: u32,
    /// Keep every member pixel on each contour
    pub retain_points: bool,
}

impl Default for BoardDetection {
    fn default() -> Self {
        Self {
            min_board_area: 0.05,
            max_board_area: 0.80,
            edge_threshold: 100.0,
            contour_min_area: 1000,
            retain_points: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSize {
    pub width: u32,
    pub height: u32,
}

impl WorkingSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Parameters for the color-uniformity coverage estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackParams {
    pub working_size: WorkingSize,
    /// Width of each per-channel quantization bucket
    pub quantization_step: u8,
    pub top_colors: usize,
    /// Upper bound on the estimated coverage percentage
    pub max_coverage: f64,
}

impl Default for FallbackParams {
    fn default() -> Self {
        Self {
            working_size: WorkingSize::new(200, 150),
            quantization_step: 32,
            top_colors: 5,
            max_coverage: 30.0,
        }
    }
}

/// Everything a pipeline run needs besides the image and brand settings.
/// Built once per invocation and handed to each stage by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub thresholds: QualityThresholds,
    pub detection: BoardDetection,
    /// Bound on the grayscale image the Laplacian runs over
    pub sharpness_working_size: WorkingSize,
    pub fallback: FallbackParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: QualityThresholds::default(),
            detection: BoardDetection::default(),
            sharpness_working_size: WorkingSize::new(400, 300),
            fallback: FallbackParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.min_width == 0 || t.min_height == 0 {
            return Err(ConfigError::Invalid("minimum dimensions must be positive".into()));
        }
        if t.min_file_size > t.max_file_size {
            return Err(ConfigError::Invalid(format!(
                "minFileSize {} exceeds maxFileSize {}",
                t.min_file_size, t.max_file_size
            )));
        }
        if !(t.min_brightness >= 0.0 && t.min_brightness <= t.max_brightness && t.max_brightness <= 255.0) {
            return Err(ConfigError::Invalid(format!(
                "brightness bounds must satisfy 0 <= min <= max <= 255, got {}..{}",
                t.min_brightness, t.max_brightness
            )));
        }
        if !(t.min_sharpness >= 0.0) {
            return Err(ConfigError::Invalid("minSharpness must be non-negative".into()));
        }

        let d = &self.detection;
        if !(d.min_board_area > 0.0 && d.min_board_area <= d.max_board_area && d.max_board_area <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "board area ratios must satisfy 0 < min <= max <= 1, got {}..{}",
                d.min_board_area, d.max_board_area
            )));
        }
        if !(d.edge_threshold >= 0.0) {
            return Err(ConfigError::Invalid("edgeThreshold must be non-negative".into()));
        }

        let sharp = self.sharpness_working_size;
        let fb = &self.fallback;
        if sharp.width == 0 || sharp.height == 0 || fb.working_size.width == 0 || fb.working_size.height == 0 {
            return Err(ConfigError::Invalid("working sizes must be positive".into()));
        }
        if fb.quantization_step == 0 || fb.quantization_step > 128 {
            return Err(ConfigError::Invalid(format!(
                "quantizationStep must be in 1..=128, got {}",
                fb.quantization_step
            )));
        }
        if fb.top_colors == 0 {
            return Err(ConfigError::Invalid("topColors must be positive".into()));
        }
        if !(fb.max_coverage >= 0.0 && fb.max_coverage <= 100.0) {
            return Err(ConfigError::Invalid("fallback maxCoverage must be within 0..=100".into()));
        }

        Ok(())
    }
}

/// Brand-specific settings supplied alongside an image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandConfig {
    pub logo_required: bool,
    pub required_colors: Vec<String>,
}
