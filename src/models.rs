use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Bounding box in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Properties of a decoded image. Never changes after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Container format, e.g. "png" or "jpeg"
    pub format: String,
    /// Decoded pixel layout, e.g. "rgb8"
    pub pixel_format: String,
    /// Encoded size in bytes
    pub size: u64,
}

impl ImageMetadata {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// An 8-connected region of edge pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
    /// Member pixels in fill order; empty unless point retention was requested
    pub points: Vec<Point>,
}

impl Contour {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn area(&self) -> u32 {
        self.pixel_count
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }

    /// Fraction of the bounding box covered by member pixels (1.0 = solid box)
    pub fn rectangularity(&self) -> f64 {
        self.pixel_count as f64 / self.bounding_box().area() as f64
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.min_x,
            y: self.min_y,
            width: self.width(),
            height: self.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
}

/// Outcome of the quality gate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// True only when `issues` is empty
    pub passed: bool,
    pub score: u8,
    pub issues: Vec<String>,
    pub metrics: QualityMetrics,
}

/// Coarse placement bucket of the largest board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDescriptors {
    pub rectangularity: f64,
    pub aspect_ratio: f64,
    pub positioning: Positioning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BoundingBox>,
}

impl ShapeDescriptors {
    pub fn none() -> Self {
        Self {
            rectangularity: 0.0,
            aspect_ratio: 0.0,
            positioning: Positioning::None,
            dimensions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantColor {
    /// Quantized color as "r,g,b"
    pub color: String,
    pub percentage: f64,
}

/// How the coverage figure was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnalysisDetails {
    ContourAnalysis {
        contours: usize,
        largest_board: u32,
        board_characteristics: ShapeDescriptors,
    },
    ColorAnalysis {
        color_clusters: usize,
        uniformity: f64,
        dominant_colors: Vec<DominantColor>,
    },
    /// Both detectors failed; the zero coverage carries no information
    Unavailable { error: String },
}

impl AnalysisDetails {
    pub fn method(&self) -> &'static str {
        match self {
            AnalysisDetails::ContourAnalysis { .. } => "contour_analysis",
            AnalysisDetails::ColorAnalysis { .. } => "color_analysis",
            AnalysisDetails::Unavailable { .. } => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    /// Percentage of the frame covered by boards, 0..=100, two decimals
    pub coverage_percentage: f64,
    pub total_board_area: u64,
    pub board_count: usize,
    pub shape_descriptors: ShapeDescriptors,
    pub details: AnalysisDetails,
}

impl CoverageResult {
    /// Result used when every estimator failed
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            coverage_percentage: 0.0,
            total_board_area: 0,
            board_count: 0,
            shape_descriptors: ShapeDescriptors::none(),
            details: AnalysisDetails::Unavailable { error: error.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub score: u8,
    pub issues: Vec<String>,
    pub checks: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size: u64,
    pub analyzed_at: String,
}

/// Output of a run that reached the end of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub board_coverage: f64,
    pub board_area: u64,
    pub image_quality: u8,
    pub quality_report: QualityReport,
    pub brand_compliance: ComplianceResult,
    pub coverage: CoverageResult,
    pub metadata: ResultMetadata,
    pub analysis: AnalysisDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeFailure {
    pub error: String,
    pub board_coverage: f64,
}

/// A run stopped by the quality gate. Only the issue list is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRejection {
    pub error: String,
    pub quality_issues: Vec<String>,
    pub board_coverage: f64,
    #[serde(skip)]
    pub report: QualityReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    DecodeFailed(DecodeFailure),
    QualityRejected(QualityRejection),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn board_coverage(&self) -> f64 {
        match self {
            AnalysisOutcome::Success(result) => result.board_coverage,
            AnalysisOutcome::DecodeFailed(failure) => failure.board_coverage,
            AnalysisOutcome::QualityRejected(rejection) => rejection.board_coverage,
        }
    }

    pub fn as_success(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Success(result) => Some(result),
            _ => None,
        }
    }

    /// Clear the run timestamp so two outcomes can be compared for equality.
    pub fn without_timestamp(mut self) -> Self {
        if let AnalysisOutcome::Success(result) = &mut self {
            result.metadata.analyzed_at.clear();
        }
        self
    }
}

#[derive(Serialize)]
struct Flagged<'a, T> {
    success: bool,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisOutcome::Success(result) => Flagged { success: true, inner: result }.serialize(serializer),
            AnalysisOutcome::DecodeFailed(failure) => Flagged { success: false, inner: failure }.serialize(serializer),
            AnalysisOutcome::QualityRejected(rejection) => {
                Flagged { success: false, inner: rejection }.serialize(serializer)
            }
        }
    }
}
