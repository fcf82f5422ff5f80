//! Image acquisition and coordinate mapping.
//!
//! Separates the source semantics (a file path, or bytes handed over by a
//! clipboard-style collaborator) from the decoded raster the pipeline works
//! on. Decoding failures surface as `ExtractError::ImageDecode` so the
//! session can report "no image available" instead of crashing.

use image::RgbaImage;
use std::path::PathBuf;

use crate::error::ExtractError;

/// Where an image comes from. The caller resolves clipboard or upload
/// mechanics; the core only sees a path or raw encoded bytes.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Image file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory (e.g. a pasted clipboard item).
    Bytes(Vec<u8>),
}

/// A decoded chart image. Immutable for the duration of one processing run.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Wraps an already-decoded RGBA buffer.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decodes an image from its source.
    pub fn load(source: &ImageSource) -> Result<Self, ExtractError> {
        let decoded = match source {
            ImageSource::Path(path) => image::open(path).map_err(|e| {
                ExtractError::ImageDecode {
                    reason: format!("{}: {}", path.display(), e),
                }
            })?,
            ImageSource::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(ExtractError::ImageDecode {
                        reason: "empty image data".to_string(),
                    });
                }
                image::load_from_memory(bytes).map_err(|e| ExtractError::ImageDecode {
                    reason: e.to_string(),
                })?
            }
        };
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGB channels of the pixel at (x, y).
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let p = self.pixels.get_pixel(x, y);
        (p[0], p[1], p[2])
    }

    /// The underlying RGBA buffer (used by overlay rendering).
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Maps click coordinates recorded against a scaled display of the image back
/// to native pixel space.
///
/// When the collaborator renders the image at its native size, the mapping is
/// the identity. Otherwise each axis is corrected by the native/displayed
/// ratio, mirroring the `getBoundingClientRect`-style correction a canvas
/// front end performs.
#[derive(Clone, Copy, Debug)]
pub struct DisplayMapping {
    native_w: u32,
    native_h: u32,
    display_w: f32,
    display_h: f32,
}

impl DisplayMapping {
    /// Identity mapping for clicks already in native pixel space.
    pub fn native(width: u32, height: u32) -> Self {
        Self {
            native_w: width,
            native_h: height,
            display_w: width as f32,
            display_h: height as f32,
        }
    }

    /// Mapping for clicks recorded against a `display_w` x `display_h`
    /// rendering of a `native_w` x `native_h` image.
    pub fn scaled(native_w: u32, native_h: u32, display_w: f32, display_h: f32) -> Self {
        Self {
            native_w,
            native_h,
            display_w,
            display_h,
        }
    }

    /// Converts a displayed-space coordinate to native pixel space.
    pub fn to_native(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.native_w as f32 / self.display_w,
            y * self.native_h as f32 / self.display_h,
        )
    }
}
