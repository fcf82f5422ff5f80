//! Pixel-to-value calibration.
//!
//! Converts bar pixel heights into data-space values using the user's axis
//! reference points and declared Y-axis maximum. The mapping is linear:
//! a bar spanning the full origin-to-axis-top pixel range reads as the
//! declared maximum.

use serde::Serialize;

use super::segment::BarRegion;
use crate::error::ExtractError;

/// A user-designated pixel coordinate marking a chart landmark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationPoint {
    pub x: f32,
    pub y: f32,
}

impl CalibrationPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Complete calibration input for one extraction run.
#[derive(Clone, Debug)]
pub struct Calibration {
    /// Chart origin: intersection of the axes, the Y=0 baseline row.
    pub origin: CalibrationPoint,
    /// Top of the Y axis: the row where the declared maximum sits.
    pub y_axis_top: CalibrationPoint,
    /// Optional top of the X axis. Stored for X-scale calibration; unused by
    /// the two-point value mapping.
    pub x_axis_top: Option<CalibrationPoint>,
    /// User-declared data value at the top of the Y axis.
    pub max_y_value: f64,
}

impl Calibration {
    /// Vertical pixel span between origin and Y-axis top.
    ///
    /// Must be strictly positive: the axis top sits above the origin in
    /// pixel space (rows grow downward). Anything else is a calibration
    /// mistake surfaced as `InvalidAxisGeometry`, never a NaN or silent 0.
    pub fn pixel_y_range(&self) -> Result<f32, ExtractError> {
        let range = self.origin.y - self.y_axis_top.y;
        if range > 0.0 {
            Ok(range)
        } else {
            Err(ExtractError::InvalidAxisGeometry {
                origin_y: self.origin.y,
                axis_top_y: self.y_axis_top.y,
            })
        }
    }

    /// The baseline row in whole pixels, for segmentation.
    pub fn baseline_row(&self) -> u32 {
        self.origin.y.round().max(0.0) as u32
    }
}

/// One extracted value, ordered by its bar's `start_x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CalibratedValue {
    /// Zero-based bar index, left to right.
    pub index: usize,
    /// Pixel column where the bar starts.
    pub position_px: u32,
    /// Data-space value, rounded to the configured precision. `None` marks a
    /// bar that could not be read (degenerate region); one unreadable bar
    /// does not suppress the others.
    pub value: Option<f64>,
}

/// Rounds to `places` decimal places for presentation.
fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Maps every bar's pixel height to a data value.
///
/// The ratio is computed in floating point with no intermediate integer
/// truncation; only the final value is rounded.
pub fn calibrate_bars(
    calibration: &Calibration,
    bars: &[BarRegion],
    decimal_places: u32,
) -> Result<Vec<CalibratedValue>, ExtractError> {
    let pixel_y_range = calibration.pixel_y_range()? as f64;

    let values = bars
        .iter()
        .enumerate()
        .map(|(index, bar)| {
            let ratio = bar.height as f64 / pixel_y_range;
            let value = ratio * calibration.max_y_value;
            CalibratedValue {
                index,
                position_px: bar.start_x,
                value: value
                    .is_finite()
                    .then(|| round_to(value, decimal_places)),
            }
        })
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(start_x: u32, height: u32) -> BarRegion {
        BarRegion {
            start_x,
            end_x: start_x + 9,
            height,
            bottom_y: 500,
        }
    }

    fn calibration(origin_y: f32, axis_top_y: f32, max_y: f64) -> Calibration {
        Calibration {
            origin: CalibrationPoint::new(50.0, origin_y),
            y_axis_top: CalibrationPoint::new(50.0, axis_top_y),
            x_axis_top: None,
            max_y_value: max_y,
        }
    }

    #[test]
    fn test_half_range_bar_reads_half_maximum() {
        // origin.y=500, yAxisTop.y=100, maxY=100: a 200px bar is half the
        // 400px range, so it calibrates to 50.0.
        let calib = calibration(500.0, 100.0, 100.0);
        let values = calibrate_bars(&calib, &[bar(10, 200)], 2).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, Some(50.0));
        assert_eq!(values[0].position_px, 10);
    }

    #[test]
    fn test_inverted_axis_is_geometry_error() {
        let calib = calibration(100.0, 500.0, 100.0);
        let err = calibrate_bars(&calib, &[bar(10, 200)], 2).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidAxisGeometry { .. }));
    }

    #[test]
    fn test_zero_range_is_geometry_error() {
        let calib = calibration(250.0, 250.0, 100.0);
        assert!(calib.pixel_y_range().is_err());
    }

    #[test]
    fn test_rounding_to_configured_precision() {
        // 100 / 300 * 100 = 33.333...
        let calib = calibration(400.0, 100.0, 100.0);
        let values = calibrate_bars(&calib, &[bar(0, 100)], 2).unwrap();
        assert_eq!(values[0].value, Some(33.33));

        let values = calibrate_bars(&calib, &[bar(0, 100)], 3).unwrap();
        assert_eq!(values[0].value, Some(33.333));
    }

    #[test]
    fn test_no_integer_truncation_in_ratio() {
        // 50 / 400 would truncate to 0 in integer math; the value must be
        // 12.5, not 0.
        let calib = calibration(500.0, 100.0, 100.0);
        let values = calibrate_bars(&calib, &[bar(0, 50)], 2).unwrap();
        assert_eq!(values[0].value, Some(12.5));
    }

    #[test]
    fn test_values_keep_bar_order() {
        let calib = calibration(500.0, 100.0, 100.0);
        let bars = [bar(10, 100), bar(30, 200), bar(60, 300)];
        let values = calibrate_bars(&calib, &bars, 2).unwrap();
        assert_eq!(
            values.iter().map(|v| v.position_px).collect::<Vec<_>>(),
            vec![10, 30, 60]
        );
        assert_eq!(
            values.iter().map(|v| v.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_empty_bars_give_empty_values() {
        let calib = calibration(500.0, 100.0, 100.0);
        let values = calibrate_bars(&calib, &[], 2).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_fractional_pixel_range() {
        // Click coordinates are floats; a 399.5px range must not be rounded
        // before the division.
        let calib = calibration(500.0, 100.5, 100.0);
        let values = calibrate_bars(&calib, &[bar(0, 200)], 3).unwrap();
        assert_eq!(values[0].value, Some(round_to(200.0 / 399.5 * 100.0, 3)));
    }

    #[test]
    fn test_third_point_does_not_affect_values() {
        let mut calib = calibration(500.0, 100.0, 100.0);
        let without = calibrate_bars(&calib, &[bar(0, 200)], 2).unwrap();
        calib.x_axis_top = Some(CalibrationPoint::new(600.0, 500.0));
        let with = calibrate_bars(&calib, &[bar(0, 200)], 2).unwrap();
        assert_eq!(without, with);
    }
}
