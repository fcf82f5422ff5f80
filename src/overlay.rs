//! Overlay rendering for extraction verification.
//!
//! Draws rectangles around accepted bar regions and crosshairs at the
//! calibration points on a copy of the source image, so the user can see
//! exactly what the pipeline measured.

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::pipeline::{BarRegion, CalibrationPoint, Extraction};
use crate::raster::RasterImage;

/// Color constants for overlay rendering.
pub const COLOR_BAR: Rgba<u8> = Rgba([0, 200, 0, 255]); // Green
pub const COLOR_POINT: Rgba<u8> = Rgba([255, 0, 0, 255]); // Red

/// Renders bar outlines and calibration marks onto a copy of the source.
pub fn render_overlay(
    raster: &RasterImage,
    extraction: &Extraction,
    points: &[CalibrationPoint],
) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let mut img = raster.as_rgba().clone();

    for bar in &extraction.bars {
        draw_bar_outline(&mut img, bar);
    }

    for point in points {
        draw_crosshair(
            &mut img,
            point.x.round().max(0.0) as u32,
            point.y.round().max(0.0) as u32,
            COLOR_POINT,
            10,
        );
    }

    img
}

/// Renders the overlay and saves it as a PNG.
pub fn save_overlay(
    raster: &RasterImage,
    extraction: &Extraction,
    points: &[CalibrationPoint],
    output_path: &Path,
) -> Result<()> {
    let img = render_overlay(raster, extraction, points);
    img.save(output_path).context(format!(
        "Failed to save overlay: {}",
        output_path.display()
    ))?;
    Ok(())
}

/// Outlines one bar region from its top edge down to its bottom row.
fn draw_bar_outline(img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>, bar: &BarRegion) {
    let top = bar.bottom_y.saturating_sub(bar.height.saturating_sub(1));
    draw_rect(
        img,
        bar.start_x,
        top,
        bar.width(),
        bar.bottom_y - top + 1,
        COLOR_BAR,
        2,
    );
}

/// Draws a rectangle border on an image.
pub fn draw_rect(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: Rgba<u8>,
    thickness: u32,
) {
    let (img_w, img_h) = img.dimensions();

    // Top edge
    for dy in 0..thickness {
        for dx in 0..w {
            let px = x + dx;
            let py = y + dy;
            if px < img_w && py < img_h {
                img.put_pixel(px, py, color);
            }
        }
    }

    // Bottom edge
    for dy in 0..thickness {
        for dx in 0..w {
            let px = x + dx;
            let py = (y + h.saturating_sub(1)).saturating_sub(dy);
            if px < img_w && py < img_h {
                img.put_pixel(px, py, color);
            }
        }
    }

    // Left edge
    for dy in 0..h {
        for dx in 0..thickness {
            let px = x + dx;
            let py = y + dy;
            if px < img_w && py < img_h {
                img.put_pixel(px, py, color);
            }
        }
    }

    // Right edge
    for dy in 0..h {
        for dx in 0..thickness {
            let px = (x + w.saturating_sub(1)).saturating_sub(dx);
            let py = y + dy;
            if px < img_w && py < img_h {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Draws a crosshair at a point.
pub fn draw_crosshair(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: u32,
    y: u32,
    color: Rgba<u8>,
    arm_length: u32,
) {
    let (img_w, img_h) = img.dimensions();

    // Horizontal line
    for dx in 0..=arm_length * 2 {
        let px = (x as i64 - arm_length as i64 + dx as i64).max(0) as u32;
        if px < img_w && y < img_h {
            img.put_pixel(px, y, color);
            if y > 0 {
                img.put_pixel(px, y - 1, color);
            }
            if y + 1 < img_h {
                img.put_pixel(px, y + 1, color);
            }
        }
    }

    // Vertical line
    for dy in 0..=arm_length * 2 {
        let py = (y as i64 - arm_length as i64 + dy as i64).max(0) as u32;
        if x < img_w && py < img_h {
            img.put_pixel(x, py, color);
            if x > 0 {
                img.put_pixel(x - 1, py, color);
            }
            if x + 1 < img_w {
                img.put_pixel(x + 1, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CalibratedValue;
    use image::RgbaImage;

    #[test]
    fn test_draw_rect() {
        let mut img = ImageBuffer::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        draw_rect(&mut img, 10, 10, 50, 30, COLOR_BAR, 2);

        assert_eq!(*img.get_pixel(10, 10), COLOR_BAR);
        // Center stays untouched
        assert_eq!(*img.get_pixel(35, 25), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_draw_crosshair() {
        let mut img = ImageBuffer::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        draw_crosshair(&mut img, 50, 50, COLOR_POINT, 10);

        assert_eq!(*img.get_pixel(50, 50), COLOR_POINT);
        assert_eq!(*img.get_pixel(60, 50), COLOR_POINT);
    }

    #[test]
    fn test_overlay_leaves_source_untouched() {
        let raster =
            RasterImage::from_rgba(RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255])));
        let extraction = Extraction {
            bars: vec![BarRegion {
                start_x: 10,
                end_x: 29,
                height: 20,
                bottom_y: 50,
            }],
            values: vec![CalibratedValue {
                index: 0,
                position_px: 10,
                value: Some(1.0),
            }],
        };
        let points = [CalibrationPoint::new(5.0, 50.0)];

        let overlay = render_overlay(&raster, &extraction, &points);
        assert_eq!(*overlay.get_pixel(10, 50), COLOR_BAR);
        // Source raster unchanged
        assert_eq!(raster.rgb(10, 50), (255, 255, 255));
    }
}
