use image::GrayImage;

/// Value of an edge pixel in an [`EdgeMap`]; every other pixel is 0.
pub const EDGE_VALUE: u8 = 255;

const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Binary edge buffer, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl EdgeMap {
    /// Wrap a raw buffer without checking it. Contour extraction rejects
    /// buffers whose length or values do not describe a binary map.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .is_some_and(|&v| v == EDGE_VALUE)
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == EDGE_VALUE).count()
    }

    /// View as an image for debug output; `None` if the buffer is malformed
    pub fn to_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// Produces an edge map from a grayscale image
pub trait EdgeDetector: Send + Sync {
    fn detect(&self, gray: &GrayImage) -> EdgeMap;

    /// Human-readable name for this detector (used in logs)
    fn name(&self) -> &str;
}

/// Thresholded Sobel gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SobelEdgeDetector {
    pub threshold: f64,
}

impl EdgeDetector for SobelEdgeDetector {
    fn detect(&self, gray: &GrayImage) -> EdgeMap {
        detect_edges(gray, self.threshold)
    }

    fn name(&self) -> &str {
        "Sobel"
    }
}

/// Mark every interior pixel whose Sobel magnitude exceeds `threshold`.
/// The one-pixel border is never evaluated and stays 0.
pub fn detect_edges(gray: &GrayImage, threshold: f64) -> EdgeMap {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let h = height as usize;
    let mut data = vec![0u8; w * h];

    if w < 3 || h < 3 {
        return EdgeMap::from_raw(width, height, data);
    }

    let src = gray.as_raw();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3 {
                let row = (y + ky - 1) * w;
                for kx in 0..3 {
                    let pixel = src[row + x + kx - 1] as i32;
                    gx += pixel * SOBEL_X[ky * 3 + kx];
                    gy += pixel * SOBEL_Y[ky * 3 + kx];
                }
            }

            let magnitude = ((gx * gx + gy * gy) as f64).sqrt();
            if magnitude > threshold {
                data[y * w + x] = EDGE_VALUE;
            }
        }
    }

    EdgeMap::from_raw(width, height, data)
}
