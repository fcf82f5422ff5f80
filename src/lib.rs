//! barscan
//!
//! Extracts numeric values from a raster image of a bar chart. The user
//! calibrates the axes with two or three reference points and declares the
//! Y-axis maximum; the pipeline binarizes the image, profiles pixel columns,
//! segments bars, and maps pixel heights to data-space values.

pub mod config;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod raster;
pub mod report;
pub mod session;

pub use config::{BinarizePolicy, ExtractConfig};
pub use error::ExtractError;
pub use pipeline::{
    run_pipeline, BarRegion, CalibratedValue, Calibration, CalibrationPoint, Extraction,
};
pub use raster::{DisplayMapping, ImageSource, RasterImage};
pub use session::{ExtractSession, SessionStage};

use chrono::Local;

/// Logs a timestamped message to stderr, keeping stdout free for extracted
/// values.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    eprintln!("[{}] {}", timestamp, msg);
}
