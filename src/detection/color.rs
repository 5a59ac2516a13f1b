//! Coverage estimate from color uniformity, used only when the contour
//! detector cannot produce a result.

use std::collections::HashMap;

use image::DynamicImage;

use crate::config::{BrandConfig, FallbackParams};
use crate::detection::coverage::round2;
use crate::detection::preprocessing::resize_to_fit;
use crate::error::FallbackError;
use crate::models::{AnalysisDetails, CoverageResult, DominantColor, ImageMetadata, ShapeDescriptors};

/// Coverage above which the estimate reports one board
const BOARD_PRESENT_COVERAGE: f64 = 10.0;
const UNIFORMITY_WEIGHT: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ColorClusters {
    /// Most frequent quantized colors, most frequent first
    pub dominant: Vec<([u8; 3], u64)>,
    pub total_pixels: u64,
}

impl ColorClusters {
    /// Share of sampled pixels held by the single most frequent color
    pub fn uniformity(&self) -> f64 {
        match self.dominant.first() {
            Some(&(_, count)) if self.total_pixels > 0 => count as f64 / self.total_pixels as f64,
            _ => 0.0,
        }
    }
}

/// Histogram of quantized colors, keeping the `top` most frequent.
/// Equal counts are ordered by color value.
pub fn analyze_color_clusters(image: &DynamicImage, params: &FallbackParams) -> Result<ColorClusters, FallbackError> {
    let rgb = image.to_rgb8();
    if rgb.as_raw().is_empty() {
        return Err(FallbackError::EmptyImage);
    }

    let small = resize_to_fit(&rgb, params.working_size.width, params.working_size.height);
    let step = params.quantization_step.max(1);

    let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
    for pixel in small.pixels() {
        let [r, g, b] = pixel.0;
        let key = [r / step * step, g / step * step, b / step * step];
        *histogram.entry(key).or_insert(0) += 1;
    }

    let total_pixels = small.width() as u64 * small.height() as u64;
    let mut dominant: Vec<([u8; 3], u64)> = histogram.into_iter().collect();
    dominant.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    dominant.truncate(params.top_colors);

    Ok(ColorClusters { dominant, total_pixels })
}

/// Conservative coverage estimate: uniformity scaled and capped well below
/// what the contour detector can report.
pub fn estimate_coverage_by_color(
    image: &DynamicImage,
    metadata: &ImageMetadata,
    params: &FallbackParams,
    _brand: &BrandConfig,
) -> Result<CoverageResult, FallbackError> {
    if metadata.area() == 0 {
        return Err(FallbackError::EmptyImage);
    }

    let clusters = analyze_color_clusters(image, params)?;
    let uniformity = clusters.uniformity();
    let estimated = (uniformity * UNIFORMITY_WEIGHT).min(params.max_coverage);

    let dominant_colors = clusters
        .dominant
        .iter()
        .map(|&([r, g, b], count)| DominantColor {
            color: format!("{},{},{}", r, g, b),
            percentage: round2(count as f64 / clusters.total_pixels as f64 * 100.0),
        })
        .collect();

    Ok(CoverageResult {
        coverage_percentage: round2(estimated),
        total_board_area: (metadata.area() as f64 * estimated / 100.0).round() as u64,
        board_count: usize::from(estimated > BOARD_PRESENT_COVERAGE),
        shape_descriptors: ShapeDescriptors::none(),
        details: AnalysisDetails::ColorAnalysis {
            color_clusters: clusters.dominant.len(),
            uniformity,
            dominant_colors,
        },
    })
}
