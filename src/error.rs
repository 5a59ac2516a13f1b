use thiserror::Error;

/// Failure to turn input bytes into a pixel buffer. Fatal to a pipeline run.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("input image data is empty")]
    EmptyInput,

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure inside a quality sub-measurement. The assessor substitutes a
/// documented default instead of propagating these.
#[derive(Error, Debug, PartialEq)]
pub enum QualityError {
    #[error("pixel buffer is empty")]
    EmptyBuffer,
}

/// Failure inside contour extraction or coverage aggregation. Recovered by
/// routing to the color estimator.
#[derive(Error, Debug, PartialEq)]
pub enum CoverageError {
    #[error("edge map buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    MalformedEdgeMap {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("edge map value {value} at index {index} is neither 0 nor 255")]
    NonBinaryEdgeValue { index: usize, value: u8 },

    #[error("image area is zero")]
    EmptyImage,

    #[error("contour area {area} exceeds image area {image_area}")]
    ContourExceedsImage { area: u64, image_area: u64 },
}

/// Failure inside the color estimator. Recorded as `details.error` on a
/// zero-coverage result.
#[derive(Error, Debug, PartialEq)]
pub enum FallbackError {
    #[error("image has no pixels to sample")]
    EmptyImage,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
