//! Downscaled JPEG preview of an analyzed image with the largest board
//! outlined.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageResult, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::detection::preprocessing::resize_to_fit;
use crate::models::BoundingBox;

pub const PREVIEW_MAX_WIDTH: u32 = 1200;
pub const PREVIEW_MAX_HEIGHT: u32 = 900;
pub const PREVIEW_JPEG_QUALITY: u8 = 85;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_THICKNESS: u32 = 3;

/// Shrink `image` to the preview bound and outline `board` (given in source
/// coordinates) if present.
pub fn render_preview(image: &DynamicImage, board: Option<BoundingBox>) -> RgbImage {
    let source = image.to_rgb8();
    let mut preview = resize_to_fit(&source, PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT);

    if let Some(bbox) = board {
        let scale_x = preview.width() as f64 / source.width().max(1) as f64;
        let scale_y = preview.height() as f64 / source.height().max(1) as f64;
        let x = (bbox.x as f64 * scale_x).round() as i32;
        let y = (bbox.y as f64 * scale_y).round() as i32;
        let width = ((bbox.width as f64 * scale_x).round() as u32).max(1);
        let height = ((bbox.height as f64 * scale_y).round() as u32).max(1);

        for inset in 0..OUTLINE_THICKNESS {
            if width <= 2 * inset || height <= 2 * inset {
                break;
            }
            let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(width - 2 * inset, height - 2 * inset);
            draw_hollow_rect_mut(&mut preview, rect, OUTLINE_COLOR);
        }
    }

    preview
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(image)?;
    Ok(buf)
}
