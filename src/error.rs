//! Error taxonomy for the extraction pipeline.
//!
//! Every variant is recoverable at the session boundary: the caller reports
//! it as status text and keeps running. A zero-bar extraction is not an
//! error; it is a valid empty result (see `report::render_text`).

use thiserror::Error;

/// Errors produced while collecting calibration input or running the
/// extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Processing was requested before any image was loaded.
    #[error("no image loaded; load a chart image first")]
    NoImageLoaded,

    /// Processing was requested before all calibration points were recorded.
    #[error("calibration incomplete: {got} of {need} points recorded")]
    InsufficientCalibrationPoints { got: usize, need: usize },

    /// The Y-axis top does not sit above the origin in pixel space
    /// (`origin.y - axis_top.y` must be strictly positive).
    #[error(
        "invalid axis geometry: origin row {origin_y:.1} must be below the \
         Y-axis top row {axis_top_y:.1}; re-select the calibration points"
    )]
    InvalidAxisGeometry { origin_y: f32, axis_top_y: f32 },

    /// The declared Y-axis maximum is missing, non-numeric, or non-finite.
    #[error("invalid maximum Y value {input:?}: expected a finite number")]
    InvalidMaxYValue { input: String },

    /// The image source produced no decodable raster (empty bytes,
    /// unsupported format, non-image content).
    #[error("no image available: {reason}")]
    ImageDecode { reason: String },
}
