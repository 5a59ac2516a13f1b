use crate::config::BoardDetection;
use crate::error::CoverageError;
use crate::models::{AnalysisDetails, Contour, CoverageResult, Positioning, ShapeDescriptors};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate contours into a board coverage figure. Contours whose share of
/// the image falls outside the configured ratio band are not boards.
pub fn compute_coverage(
    contours: &[Contour],
    image_area: u64,
    params: &BoardDetection,
) -> Result<CoverageResult, CoverageError> {
    if image_area == 0 {
        return Err(CoverageError::EmptyImage);
    }

    let mut boards: Vec<&Contour> = Vec::new();
    for contour in contours {
        let area = contour.area() as u64;
        if area > image_area {
            return Err(CoverageError::ContourExceedsImage { area, image_area });
        }
        let ratio = area as f64 / image_area as f64;
        if ratio >= params.min_board_area
            && ratio <= params.max_board_area
            && contour.area() >= params.contour_min_area
        {
            boards.push(contour);
        }
    }

    let total_board_area: u64 = boards.iter().map(|c| c.area() as u64).sum();
    let coverage = (total_board_area as f64 / image_area as f64 * 100.0).min(100.0);

    // First contour wins ties, matching scan order.
    let largest = boards.iter().copied().reduce(|best, c| if c.area() > best.area() { c } else { best });
    let characteristics = largest.map(describe_board).unwrap_or_else(ShapeDescriptors::none);

    Ok(CoverageResult {
        coverage_percentage: round2(coverage),
        total_board_area,
        board_count: boards.len(),
        shape_descriptors: characteristics.clone(),
        details: AnalysisDetails::ContourAnalysis {
            contours: boards.len(),
            largest_board: largest.map_or(0, |c| c.area()),
            board_characteristics: characteristics,
        },
    })
}

/// Shape descriptors of a single board contour
pub fn describe_board(board: &Contour) -> ShapeDescriptors {
    let bbox = board.bounding_box();
    ShapeDescriptors {
        rectangularity: round2(board.rectangularity()),
        aspect_ratio: round2(board.aspect_ratio()),
        positioning: classify_position(board),
        dimensions: Some(bbox),
    }
}

/// Bucket the box centre against 30%/70% of the box's own width and height,
/// not of the frame. A vertical bucket overrides a horizontal one.
///
/// Suspected defect: with non-negative offsets the centre is always past
/// half the box's own extent, so `Left` and `Top` are never returned. Use
/// [`ShapeDescriptors::dimensions`] for placement within the frame.
pub fn classify_position(board: &Contour) -> Positioning {
    let bbox = board.bounding_box();
    let center_x = bbox.x as f64 + bbox.width as f64 / 2.0;
    let center_y = bbox.y as f64 + bbox.height as f64 / 2.0;

    let mut positioning = Positioning::Center;
    if center_x < bbox.width as f64 * 0.3 {
        positioning = Positioning::Left;
    } else if center_x > bbox.width as f64 * 0.7 {
        positioning = Positioning::Right;
    }
    if center_y < bbox.height as f64 * 0.3 {
        positioning = Positioning::Top;
    } else if center_y > bbox.height as f64 * 0.7 {
        positioning = Positioning::Bottom;
    }

    positioning
}
