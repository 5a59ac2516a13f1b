#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from boardscan for tests
pub use boardscan::{
    AnalysisConfig, AnalysisDetails, AnalysisOutcome, BoardAnalyzer, BrandConfig, Contour, EdgeMap,
    QualityThresholds,
};
