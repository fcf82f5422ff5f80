//! barscan CLI.
//!
//! Loads a chart image, feeds the calibration points and declared maximum
//! into an extraction session, runs the pipeline, and prints one value per
//! line. Optional flags export CSV/JSON, an annotated overlay, and a
//! re-rendered verification chart.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use barscan::{
    config::{load_config, ExtractConfig},
    log, overlay, report,
    report::chart,
    DisplayMapping, ExtractSession, ImageSource,
};

#[derive(Parser)]
#[command(
    name = "barscan",
    version,
    about = "Extract numeric values from bar chart images"
)]
struct Args {
    /// Path to the chart image
    image: PathBuf,

    /// Chart origin (intersection of the axes) as X,Y pixel coordinates
    #[arg(long, value_name = "X,Y")]
    origin: String,

    /// Top of the Y axis as X,Y pixel coordinates
    #[arg(long, value_name = "X,Y")]
    y_axis_top: String,

    /// Top of the X axis as X,Y (enables three-point calibration)
    #[arg(long, value_name = "X,Y")]
    x_axis_top: Option<String>,

    /// Data value at the top of the Y axis
    #[arg(long, value_name = "VALUE")]
    max_y: String,

    /// Displayed size the points were recorded against (e.g. 640x480), when
    /// the image was shown scaled
    #[arg(long, value_name = "WxH")]
    display_size: Option<String>,

    /// JSON config file overriding extraction defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Append extracted values to this CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write a JSON report (values + summary statistics) here
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Save an annotated copy of the source image here
    #[arg(long, value_name = "PATH")]
    overlay: Option<PathBuf>,

    /// Save a re-rendered chart of the extracted values here
    #[arg(long, value_name = "PATH")]
    chart: Option<PathBuf>,
}

/// Parses an "X,Y" coordinate pair.
fn parse_point(input: &str) -> Result<(f32, f32)> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y but got {:?}", input))?;
    Ok((
        x.trim().parse().context(format!("bad X in {:?}", input))?,
        y.trim().parse().context(format!("bad Y in {:?}", input))?,
    ))
}

/// Parses a "WxH" display size.
fn parse_display_size(input: &str) -> Result<(f32, f32)> {
    let (w, h) = input
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WxH but got {:?}", input))?;
    let w: f32 = w.trim().parse().context(format!("bad width in {:?}", input))?;
    let h: f32 = h.trim().parse().context(format!("bad height in {:?}", input))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(anyhow!("display size must be positive: {:?}", input));
    }
    Ok((w, h))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path),
        None => ExtractConfig::default(),
    };
    if args.x_axis_top.is_some() {
        config.expect_x_axis_point = true;
    }
    let decimal_places = config.decimal_places;

    let mut session = ExtractSession::new(config);
    session.load_image(&ImageSource::Path(args.image.clone()))?;

    let raster = session.raster().expect("image just loaded");
    let mapping = match &args.display_size {
        Some(size) => {
            let (w, h) = parse_display_size(size)?;
            DisplayMapping::scaled(raster.width(), raster.height(), w, h)
        }
        None => DisplayMapping::native(raster.width(), raster.height()),
    };

    let mut clicks = vec![parse_point(&args.origin)?];
    if let Some(point) = &args.x_axis_top {
        clicks.push(parse_point(point)?);
    }
    clicks.push(parse_point(&args.y_axis_top)?);

    for (x, y) in clicks {
        let (nx, ny) = mapping.to_native(x, y);
        session.add_point(nx, ny);
    }
    session.set_max_value(&args.max_y)?;

    let extraction = session.process()?.clone();
    println!("{}", report::render_text(&extraction, decimal_places));

    if let Some(path) = &args.csv {
        report::init_csv(path)?;
        report::append_to_csv(path, &extraction, decimal_places)?;
        log(&format!("Values appended to {}", path.display()));
    }

    if let Some(path) = &args.json {
        report::export_to_json(&extraction, path)?;
        log(&format!("JSON report saved: {}", path.display()));
    }

    if let Some(path) = &args.overlay {
        let raster = session.raster().expect("image still loaded");
        overlay::save_overlay(raster, &extraction, &session.points(), path)?;
        log(&format!("Overlay saved: {}", path.display()));
    }

    if let Some(path) = &args.chart {
        let max_y = session.max_y_value().expect("max value validated");
        match chart::render_value_chart(&extraction.values, max_y, path) {
            Ok(()) => log(&format!("Chart saved: {}", path.display())),
            Err(e) => log(&format!("Chart not generated: {}", e)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("12,34").unwrap(), (12.0, 34.0));
        assert_eq!(parse_point(" 1.5 , 99.25 ").unwrap(), (1.5, 99.25));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_display_size() {
        assert_eq!(parse_display_size("640x480").unwrap(), (640.0, 480.0));
        assert_eq!(parse_display_size("640X480").unwrap(), (640.0, 480.0));
        assert!(parse_display_size("640").is_err());
        assert!(parse_display_size("0x480").is_err());
    }
}
