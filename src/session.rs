//! Extraction session state machine.
//!
//! One session owns everything a processing run needs: the loaded raster,
//! the calibration points collected so far, and the declared Y-axis maximum.
//! Input arrives in a fixed order (image, origin, optional X-axis top,
//! Y-axis top, maximum value) and the stage is derived from what has been
//! recorded, so there is no counter to drift out of sync. Loading a new
//! image is the single authoritative reset: points, maximum, and any prior
//! results are discarded together.

use std::fmt;

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::pipeline::{run_pipeline, Calibration, CalibrationPoint, Extraction};
use crate::raster::{ImageSource, RasterImage};

/// What the session expects next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStage {
    /// No image loaded yet.
    AwaitingImage,
    /// Waiting for the chart origin click.
    AwaitingOrigin,
    /// Waiting for the top-of-X-axis click (three-point mode only).
    AwaitingXAxisTop,
    /// Waiting for the top-of-Y-axis click.
    AwaitingYAxisTop,
    /// Waiting for the declared Y-axis maximum.
    AwaitingMaxValue,
    /// All input collected; processing may run.
    Ready,
}

impl SessionStage {
    /// Status text telling the user what to supply next.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::AwaitingImage => "Load a chart image to begin.",
            Self::AwaitingOrigin => "Click the chart ORIGIN.",
            Self::AwaitingXAxisTop => "Origin selected. Now click the TOP of the X axis.",
            Self::AwaitingYAxisTop => "Now click the TOP of the Y axis.",
            Self::AwaitingMaxValue => {
                "Top of Y axis selected. Enter the MAX Y-axis value to process."
            }
            Self::Ready => "Ready to process.",
        }
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingImage => "Awaiting image",
            Self::AwaitingOrigin => "Awaiting origin",
            Self::AwaitingXAxisTop => "Awaiting X-axis top",
            Self::AwaitingYAxisTop => "Awaiting Y-axis top",
            Self::AwaitingMaxValue => "Awaiting max value",
            Self::Ready => "Ready",
        };
        write!(f, "{}", name)
    }
}

/// Session context for one image's calibration and extraction.
pub struct ExtractSession {
    config: ExtractConfig,
    raster: Option<RasterImage>,
    origin: Option<CalibrationPoint>,
    x_axis_top: Option<CalibrationPoint>,
    y_axis_top: Option<CalibrationPoint>,
    max_y_value: Option<f64>,
    results: Option<Extraction>,
}

impl ExtractSession {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            raster: None,
            origin: None,
            x_axis_top: None,
            y_axis_top: None,
            max_y_value: None,
            results: None,
        }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// The currently loaded raster, if any.
    pub fn raster(&self) -> Option<&RasterImage> {
        self.raster.as_ref()
    }

    /// Results of the most recent processing run, if any.
    pub fn results(&self) -> Option<&Extraction> {
        self.results.as_ref()
    }

    /// The declared Y-axis maximum, once validated.
    pub fn max_y_value(&self) -> Option<f64> {
        self.max_y_value
    }

    /// Calibration points recorded so far, in collection order.
    pub fn points(&self) -> Vec<CalibrationPoint> {
        [self.origin, self.x_axis_top, self.y_axis_top]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Current stage, derived from recorded state.
    pub fn stage(&self) -> SessionStage {
        if self.raster.is_none() {
            SessionStage::AwaitingImage
        } else if self.origin.is_none() {
            SessionStage::AwaitingOrigin
        } else if self.config.expect_x_axis_point && self.x_axis_top.is_none() {
            SessionStage::AwaitingXAxisTop
        } else if self.y_axis_top.is_none() {
            SessionStage::AwaitingYAxisTop
        } else if self.max_y_value.is_none() {
            SessionStage::AwaitingMaxValue
        } else {
            SessionStage::Ready
        }
    }

    /// Decodes and installs a new image, atomically resetting all
    /// calibration state and prior results.
    ///
    /// On decode failure the session is left untouched: there is no new
    /// image, so the old state remains valid.
    pub fn load_image(&mut self, source: &ImageSource) -> Result<SessionStage, ExtractError> {
        let raster = RasterImage::load(source)?;
        Ok(self.install_raster(raster))
    }

    /// Installs an already-decoded raster, with the same reset semantics as
    /// `load_image`.
    pub fn load_raster(&mut self, raster: RasterImage) -> SessionStage {
        self.install_raster(raster)
    }

    fn install_raster(&mut self, raster: RasterImage) -> SessionStage {
        crate::log(&format!(
            "Image loaded: {}x{}; calibration reset",
            raster.width(),
            raster.height()
        ));
        self.raster = Some(raster);
        self.origin = None;
        self.x_axis_top = None;
        self.y_axis_top = None;
        self.max_y_value = None;
        self.results = None;
        self.stage()
    }

    /// Records the next calibration point in the fixed order.
    ///
    /// Returns the new stage when the point was recorded, or `None` when the
    /// input was ignored: no image is loaded yet, or the required points are
    /// already collected (extra clicks are dropped, matching the one-run-at-
    /// a-time contract).
    pub fn add_point(&mut self, x: f32, y: f32) -> Option<SessionStage> {
        let point = CalibrationPoint::new(x, y);
        match self.stage() {
            SessionStage::AwaitingOrigin => self.origin = Some(point),
            SessionStage::AwaitingXAxisTop => self.x_axis_top = Some(point),
            SessionStage::AwaitingYAxisTop => self.y_axis_top = Some(point),
            SessionStage::AwaitingImage => {
                crate::log("Ignoring calibration point: no image loaded");
                return None;
            }
            SessionStage::AwaitingMaxValue | SessionStage::Ready => {
                crate::log("Ignoring calibration point: all points already recorded");
                return None;
            }
        }
        let stage = self.stage();
        crate::log(&format!(
            "Point ({:.1}, {:.1}) recorded. {}",
            x,
            y,
            stage.prompt()
        ));
        Some(stage)
    }

    /// Validates and records the declared Y-axis maximum.
    ///
    /// The input must parse to a finite number; empty, non-numeric, and
    /// NaN/infinite inputs are rejected before they can reach the mapper.
    pub fn set_max_value(&mut self, input: &str) -> Result<SessionStage, ExtractError> {
        let trimmed = input.trim();
        let parsed = trimmed.parse::<f64>().ok().filter(|v| v.is_finite());
        match parsed {
            Some(value) => {
                self.max_y_value = Some(value);
                Ok(self.stage())
            }
            None => Err(ExtractError::InvalidMaxYValue {
                input: trimmed.to_string(),
            }),
        }
    }

    /// Runs the pipeline over the current image and calibration.
    ///
    /// Refuses until every input is collected; the checks mirror the stage
    /// order so the first missing input is the one reported.
    pub fn process(&mut self) -> Result<&Extraction, ExtractError> {
        let raster = self.raster.as_ref().ok_or(ExtractError::NoImageLoaded)?;

        let need = self.config.required_points();
        let got = [self.origin, self.x_axis_top, self.y_axis_top]
            .iter()
            .flatten()
            .count();
        let (origin, y_axis_top) = match (self.origin, self.y_axis_top) {
            (Some(o), Some(y)) => (o, y),
            _ => return Err(ExtractError::InsufficientCalibrationPoints { got, need }),
        };

        let max_y_value = self.max_y_value.ok_or_else(|| ExtractError::InvalidMaxYValue {
            input: String::new(),
        })?;

        let calibration = Calibration {
            origin,
            y_axis_top,
            x_axis_top: self.x_axis_top,
            max_y_value,
        };

        let extraction = run_pipeline(raster, &calibration, &self.config)?;
        Ok(self.results.insert(extraction))
    }
}
