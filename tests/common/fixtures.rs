use std::io::Cursor;

use boardscan::{AnalysisConfig, Contour, QualityThresholds};
use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma, Rgb};

/// Full-HD frame used by the coverage scenarios
pub const FRAME_WIDTH: u32 = 1920;
pub const FRAME_HEIGHT: u32 = 1080;
/// 864 x 480 is exactly 20% of a 1920 x 1080 frame
pub const BOARD_WIDTH: u32 = 864;
pub const BOARD_HEIGHT: u32 = 480;
pub const BOARD_X: u32 = 528;
pub const BOARD_Y: u32 = 300;
pub const BACKGROUND: u8 = 40;

/// Encodes an image as PNG bytes in memory.
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode test image");
    buf
}

pub fn uniform_gray(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Vertical stripes two pixels wide alternating 0 and 255
pub fn stripe_value(x: u32) -> u8 {
    if (x / 2) % 2 == 0 { 0 } else { 255 }
}

/// A frame with one high-contrast striped board on a flat background.
/// Every board pixel, plus a one-pixel ring around it, is a Sobel edge.
pub fn board_frame() -> DynamicImage {
    let img = ImageBuffer::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
        let inside = x >= BOARD_X && x < BOARD_X + BOARD_WIDTH && y >= BOARD_Y && y < BOARD_Y + BOARD_HEIGHT;
        let v = if inside { stripe_value(x - BOARD_X) } else { BACKGROUND };
        Rgb([v, v, v])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn board_frame_png() -> Vec<u8> {
    encode_png(&board_frame())
}

/// Alternating 0/255 single-pixel checkerboard
pub fn checkerboard(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| if (x + y) % 2 == 0 { Luma([255]) } else { Luma([0]) })
}

/// Thresholds that any non-empty image satisfies
pub fn lenient_thresholds() -> QualityThresholds {
    QualityThresholds {
        min_width: 1,
        min_height: 1,
        min_file_size: 0,
        max_file_size: u64::MAX,
        min_brightness: 0.0,
        max_brightness: 255.0,
        min_sharpness: 0.0,
    }
}

pub fn lenient_config() -> AnalysisConfig {
    AnalysisConfig {
        thresholds: lenient_thresholds(),
        ..AnalysisConfig::default()
    }
}

pub fn contour(min_x: u32, min_y: u32, max_x: u32, max_y: u32, pixel_count: u32) -> Contour {
    Contour {
        min_x,
        min_y,
        max_x,
        max_y,
        pixel_count,
        points: Vec::new(),
    }
}
