//! The extraction pipeline.
//!
//! Sequences binarize -> profile -> segment -> calibrate over one raster.
//! Each stage is pure: the same raster, calibration, and config always
//! produce the same extraction, so repeated runs are byte-identical.

pub mod binarize;
pub mod calibrate;
pub mod profile;
pub mod segment;

pub use binarize::{binarize, BinaryMask};
pub use calibrate::{calibrate_bars, Calibration, CalibrationPoint, CalibratedValue};
pub use profile::{profile_columns, ColumnProfile};
pub use segment::{segment, BarRegion, SegmentParams};

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::raster::RasterImage;

/// Result of one full pipeline run.
#[derive(Clone, Debug)]
pub struct Extraction {
    /// Accepted bar regions, ascending by `start_x`.
    pub bars: Vec<BarRegion>,
    /// One calibrated value per bar, same order.
    pub values: Vec<CalibratedValue>,
}

impl Extraction {
    /// True when segmentation found nothing. A valid empty result, not an
    /// error.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Runs the full pipeline over `image` with the given calibration.
///
/// Validates axis geometry up front so a miscalibrated session fails before
/// any pixel work, then scans the raster and maps the accepted bars to
/// values.
pub fn run_pipeline(
    image: &RasterImage,
    calibration: &Calibration,
    config: &ExtractConfig,
) -> Result<Extraction, ExtractError> {
    // Fail on inverted/degenerate axes before touching pixels.
    calibration.pixel_y_range()?;

    let mask = binarize(image, config);
    let profiles = profile_columns(&mask);

    let params = SegmentParams {
        min_width_px: config.min_width_px(image.width()),
        min_height_px: config.min_height_px,
        baseline_y: calibration.baseline_row(),
        baseline_margin_px: config.baseline_margin_px,
    };
    let bars = segment(&profiles, &params);
    crate::log(&format!(
        "Pipeline: {} columns profiled, {} bars accepted",
        profiles.len(),
        bars.len()
    ));

    let values = calibrate_bars(calibration, &bars, config.decimal_places)?;

    Ok(Extraction { bars, values })
}
