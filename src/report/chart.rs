//! Verification chart generation using plotters.
//!
//! Re-renders the extracted values as a synthetic bar chart so the user can
//! compare it side by side with the source image. Unreadable bars are
//! skipped; their slots stay empty on the X axis.

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use std::path::Path;

use crate::pipeline::CalibratedValue;

const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 600;
const BAR_FILL: RGBColor = RGBColor(243, 156, 18);

/// Collects the (index, value) pairs of readable bars.
fn readable_values(values: &[CalibratedValue]) -> Vec<(usize, f64)> {
    values
        .iter()
        .filter_map(|v| v.value.map(|val| (v.index, val)))
        .collect()
}

/// Y-axis range covering zero, the declared maximum, and every readable
/// value. Values usually stay below the declared maximum, but a bar taller
/// than the calibrated axis must not be clipped.
fn y_axis_range(readable: &[(usize, f64)], max_y_value: f64) -> (f64, f64) {
    let data_max = readable
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let data_min = readable.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    (data_min.min(0.0), max_y_value.max(data_max).max(0.0))
}

/// Renders `values` as a bar chart PNG at `output_path`.
///
/// `max_y_value` sets the Y-axis ceiling so the rendered chart shares the
/// source chart's scale.
pub fn render_value_chart(
    values: &[CalibratedValue],
    max_y_value: f64,
    output_path: &Path,
) -> Result<()> {
    let readable = readable_values(values);
    if readable.is_empty() {
        return Err(anyhow!("No readable values to chart"));
    }

    let (y_min, y_max) = y_axis_range(&readable, max_y_value);
    if y_max <= y_min {
        return Err(anyhow!("Degenerate value range for chart"));
    }

    let root = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).context("Failed to fill chart background")?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Extracted values", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..values.len() as f64, y_min..y_max)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Bar")
        .y_desc("Value")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(readable.iter().map(|(index, value)| {
            let x0 = *index as f64 + 0.15;
            let x1 = *index as f64 + 0.85;
            Rectangle::new([(x0, 0.0), (x1, *value)], BAR_FILL.filled())
        }))
        .context("Failed to draw bars")?;

    root.present().context("Failed to save chart")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn value(index: usize, v: Option<f64>) -> CalibratedValue {
        CalibratedValue {
            index,
            position_px: index as u32 * 20,
            value: v,
        }
    }

    #[test]
    fn test_readable_values_skips_unreadable() {
        let values = vec![value(0, Some(30.0)), value(1, None), value(2, Some(70.0))];
        assert_eq!(readable_values(&values), vec![(0, 30.0), (2, 70.0)]);
    }

    #[test]
    fn test_y_axis_range_covers_declared_maximum() {
        let readable = vec![(0, 30.0), (1, 70.0)];
        assert_eq!(y_axis_range(&readable, 100.0), (0.0, 100.0));
    }

    #[test]
    fn test_y_axis_range_extends_past_overshooting_bar() {
        // A bar taller than the declared axis ceiling must stay visible
        let readable = vec![(0, 130.0)];
        assert_eq!(y_axis_range(&readable, 100.0), (0.0, 130.0));
    }

    #[test]
    fn test_y_axis_range_includes_negative_values() {
        let readable = vec![(0, -20.0), (1, 50.0)];
        assert_eq!(y_axis_range(&readable, 100.0), (-20.0, 100.0));
    }

    #[test]
    fn test_no_readable_values_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(render_value_chart(&[value(0, None)], 100.0, &path).is_err());
        assert!(render_value_chart(&[], 100.0, &path).is_err());
    }
}
