pub mod preprocessing;
pub mod quality;
pub mod edges;
pub mod contours;
pub mod coverage;
pub mod color;
pub mod compliance;

use crate::config::BoardDetection;
use crate::error::CoverageError;
use crate::models::CoverageResult;
use edges::EdgeMap;

/// Primary coverage path: label contours in the edge map, then aggregate
/// them into a coverage figure for an image of `image_area` pixels.
pub fn detect_board_coverage(
    edges: &EdgeMap,
    image_area: u64,
    params: &BoardDetection,
) -> Result<CoverageResult, CoverageError> {
    let contours = contours::find_contours(edges, params.contour_min_area, params.retain_points)?;
    tracing::debug!(contours = contours.len(), "Contours above minimum area");
    coverage::compute_coverage(&contours, image_area, params)
}
