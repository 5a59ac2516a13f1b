use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Pixel};

use crate::error::DecodeError;
use crate::models::ImageMetadata;

/// A decoded source image together with its metadata
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub metadata: ImageMetadata,
}

/// Decode raw image bytes in any format the `image` crate recognizes
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let format = image::guess_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = image.dimensions();

    let metadata = ImageMetadata {
        width,
        height,
        format: format!("{:?}", format).to_lowercase(),
        pixel_format: format!("{:?}", image.color()).to_lowercase(),
        size: bytes.len() as u64,
    };

    Ok(DecodedImage { image, metadata })
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Shrink an image to fit within `max_width` x `max_height`, keeping its
/// aspect ratio. Images already inside the bound, and zero bounds, return
/// the input unchanged.
pub fn resize_to_fit<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    max_width: u32,
    max_height: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    let (width, height) = img.dimensions();
    if max_width == 0 || max_height == 0 || (width <= max_width && height <= max_height) {
        return img.clone();
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let scaled_w = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let scaled_h = ((height as f64 * scale).round() as u32).clamp(1, max_height);

    imageops::resize(img, scaled_w, scaled_h, FilterType::Triangle)
}
