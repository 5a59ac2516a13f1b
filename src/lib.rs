pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preview;

pub use config::{AnalysisConfig, BoardDetection, BrandConfig, FallbackParams, QualityThresholds, WorkingSize};
pub use detection::edges::{EdgeDetector, EdgeMap, SobelEdgeDetector};
pub use detection::preprocessing::DecodedImage;
pub use error::{ConfigError, CoverageError, DecodeError, FallbackError, QualityError};
pub use models::{
    AnalysisDetails, AnalysisOutcome, AnalysisResult, BoundingBox, ComplianceResult, Contour, CoverageResult,
    ImageMetadata, Positioning, QualityReport, ShapeDescriptors,
};
pub use pipeline::{BoardAnalyzer, PipelineStage};
