use boardscan::BoundingBox;
use boardscan::preview::{PREVIEW_JPEG_QUALITY, encode_jpeg, render_preview};
use image::{DynamicImage, Rgb, RgbImage};

fn gray_frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 90, 90])))
}

#[test]
fn large_images_shrink_to_the_preview_bound() {
    let preview = render_preview(&gray_frame(2400, 1800), None);
    assert_eq!(preview.dimensions(), (1200, 900));
}

#[test]
fn small_images_are_not_enlarged() {
    let preview = render_preview(&gray_frame(300, 200), None);
    assert_eq!(preview.dimensions(), (300, 200));
    assert_eq!(preview.get_pixel(10, 10), &Rgb([90, 90, 90]));
}

#[test]
fn board_outline_is_scaled_into_the_preview() {
    let board = BoundingBox {
        x: 400,
        y: 300,
        width: 800,
        height: 600,
    };
    let preview = render_preview(&gray_frame(2400, 1800), Some(board));

    // Source (400, 300) lands at (200, 150) after halving.
    assert_eq!(preview.get_pixel(200, 150), &Rgb([255, 0, 0]));
    assert_eq!(preview.get_pixel(202, 152), &Rgb([255, 0, 0]));
    assert_eq!(preview.get_pixel(300, 300), &Rgb([90, 90, 90]));
}

#[test]
fn preview_encodes_as_jpeg() {
    let preview = render_preview(&gray_frame(64, 48), None);
    let bytes = encode_jpeg(&preview, PREVIEW_JPEG_QUALITY).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}
