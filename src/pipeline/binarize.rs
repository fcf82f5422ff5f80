//! Image binarization.
//!
//! Classifies every pixel as ink or background. Two policies: a weighted
//! luminance threshold for dark marks on light backgrounds, and a
//! distance-from-white test for colored bars. The source raster is never
//! modified; each run produces a fresh mask.

use crate::config::{BinarizePolicy, ExtractConfig};
use crate::raster::RasterImage;

/// Two-level ink/background mask with the source image's dimensions.
#[derive(Clone, Debug)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl BinaryMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when (x, y) was classified as ink.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.ink[(y * self.width + x) as usize]
    }

    #[cfg(test)]
    pub(crate) fn from_rows(width: u32, height: u32, ink: Vec<bool>) -> Self {
        assert_eq!(ink.len(), (width * height) as usize);
        Self { width, height, ink }
    }
}

/// Perceptual luminance of an RGB pixel. Weighted, not a channel average:
/// the weights change which anti-aliased edge pixels count as ink.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Euclidean distance of an RGB pixel from pure white.
pub fn distance_from_white(r: u8, g: u8, b: u8) -> f32 {
    let dr = 255.0 - r as f32;
    let dg = 255.0 - g as f32;
    let db = 255.0 - b as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Builds the ink/background mask for `image` under the configured policy.
pub fn binarize(image: &RasterImage, config: &ExtractConfig) -> BinaryMask {
    let (width, height) = (image.width(), image.height());
    let mut ink = Vec::with_capacity((width * height) as usize);

    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = image.rgb(x, y);
            let is_ink = match config.binarize_policy {
                BinarizePolicy::Luminance => luminance(r, g, b) < config.luminance_threshold,
                BinarizePolicy::ColorDistance => {
                    distance_from_white(r, g, b) > config.color_threshold
                }
            };
            ink.push(is_ink);
        }
    }

    BinaryMask { width, height, ink }
}
