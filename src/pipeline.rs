use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, BrandConfig};
use crate::detection::color::estimate_coverage_by_color;
use crate::detection::compliance::check_brand_compliance;
use crate::detection::edges::{EdgeDetector, EdgeMap, SobelEdgeDetector};
use crate::detection::preprocessing::{self, DecodedImage};
use crate::detection::quality::assess_quality;
use crate::detection::detect_board_coverage;
use crate::error::ConfigError;
use crate::models::{
    AnalysisOutcome, AnalysisResult, CoverageResult, DecodeFailure, QualityRejection, ResultMetadata,
};

pub const QUALITY_FAILED_MESSAGE: &str = "Image quality check failed";

/// Stages of a single analysis run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    QualityCheck,
    CoverageAnalysis,
    ComplianceCheck,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Decoding => "decoding",
            PipelineStage::QualityCheck => "quality_check",
            PipelineStage::CoverageAnalysis => "coverage_analysis",
            PipelineStage::ComplianceCheck => "compliance_check",
        };
        f.write_str(name)
    }
}

/// Runs the board-coverage pipeline on encoded images.
///
/// Each run owns its buffers; the analyzer itself is immutable and can be
/// shared across threads.
#[derive(Clone)]
pub struct BoardAnalyzer {
    config: AnalysisConfig,
    brand: BrandConfig,
    /// Replaces the Sobel detector built from `config` when set
    edge_detector: Option<Arc<dyn EdgeDetector>>,
}

impl BoardAnalyzer {
    /// Create an analyzer with default thresholds and no brand rules
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            brand: BrandConfig::default(),
            edge_detector: None,
        }
    }

    /// Replace the analysis parameters. Rejects configs that fail
    /// [`AnalysisConfig::validate`].
    pub fn with_config(mut self, config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_brand(mut self, brand: BrandConfig) -> Self {
        self.brand = brand;
        self
    }

    /// Swap the edge detector feeding the contour stage
    pub fn with_edge_detector(mut self, detector: Arc<dyn EdgeDetector>) -> Self {
        self.edge_detector = Some(detector);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    /// Analyze one image, stamping the result with the current UTC time
    pub fn analyze(&self, bytes: &[u8]) -> AnalysisOutcome {
        let analyzed_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        self.analyze_at(bytes, analyzed_at)
    }

    /// Analyze one image with a caller-chosen timestamp
    pub fn analyze_at(&self, bytes: &[u8], analyzed_at: String) -> AnalysisOutcome {
        debug!(stage = %PipelineStage::Decoding, bytes = bytes.len(), "Entering stage");
        let decoded = match preprocessing::decode(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Decoding failed");
                return AnalysisOutcome::DecodeFailed(DecodeFailure {
                    error: e.to_string(),
                    board_coverage: 0.0,
                });
            }
        };
        self.analyze_decoded(&decoded, analyzed_at)
    }

    /// Run every stage after decoding
    pub fn analyze_decoded(&self, decoded: &DecodedImage, analyzed_at: String) -> AnalysisOutcome {
        let metadata = &decoded.metadata;

        debug!(
            stage = %PipelineStage::QualityCheck,
            width = metadata.width,
            height = metadata.height,
            format = %metadata.format,
            "Entering stage"
        );
        let quality = assess_quality(
            &decoded.image,
            metadata,
            &self.config.thresholds,
            self.config.sharpness_working_size,
        );
        if !quality.passed {
            debug!(issues = quality.issues.len(), score = quality.score, "Quality check rejected image");
            return AnalysisOutcome::QualityRejected(QualityRejection {
                error: QUALITY_FAILED_MESSAGE.to_string(),
                quality_issues: quality.issues.clone(),
                board_coverage: 0.0,
                report: quality,
            });
        }

        debug!(stage = %PipelineStage::CoverageAnalysis, detector = %self.detector_name(), "Entering stage");
        let coverage = self.coverage_for(decoded);

        debug!(stage = %PipelineStage::ComplianceCheck, "Entering stage");
        let compliance = check_brand_compliance(&decoded.image, &self.brand);

        AnalysisOutcome::Success(AnalysisResult {
            board_coverage: coverage.coverage_percentage,
            board_area: coverage.total_board_area,
            image_quality: quality.score,
            quality_report: quality,
            brand_compliance: compliance,
            analysis: coverage.details.clone(),
            coverage,
            metadata: ResultMetadata {
                width: metadata.width,
                height: metadata.height,
                format: metadata.format.clone(),
                size: metadata.size,
                analyzed_at,
            },
        })
    }

    /// Edge map the coverage stage would consume for this image
    pub fn edge_map(&self, decoded: &DecodedImage) -> EdgeMap {
        let gray = preprocessing::to_grayscale(&decoded.image);
        match &self.edge_detector {
            Some(detector) => detector.detect(&gray),
            None => self.sobel().detect(&gray),
        }
    }

    fn sobel(&self) -> SobelEdgeDetector {
        SobelEdgeDetector {
            threshold: self.config.detection.edge_threshold,
        }
    }

    fn detector_name(&self) -> String {
        match &self.edge_detector {
            Some(detector) => detector.name().to_string(),
            None => self.sobel().name().to_string(),
        }
    }

    /// Contour-based coverage, falling back to the color estimate and, if
    /// that fails too, to an explicitly unavailable zero result.
    fn coverage_for(&self, decoded: &DecodedImage) -> CoverageResult {
        let edges = self.edge_map(decoded);
        debug!(edge_pixels = edges.edge_count(), "Edge map ready");

        match detect_board_coverage(&edges, decoded.metadata.area(), &self.config.detection) {
            Ok(coverage) => coverage,
            Err(e) => {
                warn!(error = %e, "Contour coverage failed, estimating from color");
                match estimate_coverage_by_color(
                    &decoded.image,
                    &decoded.metadata,
                    &self.config.fallback,
                    &self.brand,
                ) {
                    Ok(coverage) => coverage,
                    Err(e) => {
                        warn!(error = %e, "Color estimate failed, reporting coverage as unavailable");
                        CoverageResult::unavailable(e.to_string())
                    }
                }
            }
        }
    }

    /// Analyze many images in parallel. Results keep the input order.
    pub fn analyze_batch<B>(&self, inputs: &[B]) -> Vec<AnalysisOutcome>
    where
        B: AsRef<[u8]> + Sync,
    {
        inputs
            .par_iter()
            .enumerate()
            .map(|(index, bytes)| {
                debug!(index, "Analyzing batch item");
                self.analyze(bytes.as_ref())
            })
            .collect()
    }
}

impl Default for BoardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
