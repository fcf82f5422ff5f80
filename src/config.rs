//! Extraction configuration.
//!
//! Loads settings from a JSON file when one is provided. Every field has a
//! default, so a partial config file works and a missing or unparseable one
//! falls back to defaults with a logged notice.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pixel classification policy used by the binarizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinarizePolicy {
    /// Ink iff weighted luminance (0.299 R + 0.587 G + 0.114 B) falls below
    /// `luminance_threshold`. The default, suited to dark marks on light
    /// backgrounds.
    Luminance,
    /// Ink iff the euclidean distance from pure white exceeds
    /// `color_threshold`. Better for colored bars on a white background.
    ColorDistance,
}

/// Complete extraction configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Which binarization policy to apply.
    #[serde(default = "default_binarize_policy")]
    pub binarize_policy: BinarizePolicy,
    /// Luminance cutoff for the `Luminance` policy. Sensible range 150-245
    /// depending on source contrast.
    #[serde(default = "default_luminance_threshold")]
    pub luminance_threshold: f32,
    /// Distance-from-white cutoff for the `ColorDistance` policy.
    #[serde(default = "default_color_threshold")]
    pub color_threshold: f32,
    /// Minimum bar width as a fraction of image width, so the floor scales
    /// with resolution.
    #[serde(default = "default_min_width_frac")]
    pub min_width_frac: f32,
    /// Minimum bar height in pixels. Rejects gridlines and noise rows.
    #[serde(default = "default_min_height_px")]
    pub min_height_px: u32,
    /// How far (pixels) a region's bottom may sit from the baseline row and
    /// still count as resting on it.
    #[serde(default = "default_baseline_margin_px")]
    pub baseline_margin_px: u32,
    /// Decimal places used when rounding calibrated values for presentation.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Whether calibration expects a third point (top of X axis) between the
    /// origin and the Y-axis top.
    #[serde(default)]
    pub expect_x_axis_point: bool,
}

fn default_binarize_policy() -> BinarizePolicy {
    BinarizePolicy::Luminance
}

fn default_luminance_threshold() -> f32 {
    200.0
}

fn default_color_threshold() -> f32 {
    60.0
}

fn default_min_width_frac() -> f32 {
    0.05
}

fn default_min_height_px() -> u32 {
    20
}

fn default_baseline_margin_px() -> u32 {
    5
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            binarize_policy: default_binarize_policy(),
            luminance_threshold: default_luminance_threshold(),
            color_threshold: default_color_threshold(),
            min_width_frac: default_min_width_frac(),
            min_height_px: default_min_height_px(),
            baseline_margin_px: default_baseline_margin_px(),
            decimal_places: default_decimal_places(),
            expect_x_axis_point: false,
        }
    }
}

impl ExtractConfig {
    /// Number of calibration points this configuration expects.
    pub fn required_points(&self) -> usize {
        if self.expect_x_axis_point { 3 } else { 2 }
    }

    /// Minimum bar width in pixels for an image of the given width.
    /// At least 1 so a degenerate fraction cannot accept zero-width regions.
    pub fn min_width_px(&self, image_width: u32) -> u32 {
        ((image_width as f32 * self.min_width_frac).floor() as u32).max(1)
    }
}

/// Loads configuration from the given JSON file, or returns defaults when the
/// file is absent or unreadable.
pub fn load_config(path: &Path) -> ExtractConfig {
    if !path.exists() {
        crate::log(&format!(
            "Config {} not found. Using defaults.",
            path.display()
        ));
        return ExtractConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                crate::log(&format!("Config loaded from {}", path.display()));
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                ));
                ExtractConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read {}: {}. Using defaults.",
                path.display(),
                e
            ));
            ExtractConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.binarize_policy, BinarizePolicy::Luminance);
        assert_eq!(config.luminance_threshold, 200.0);
        assert_eq!(config.min_height_px, 20);
        assert_eq!(config.baseline_margin_px, 5);
        assert_eq!(config.required_points(), 2);
    }

    #[test]
    fn test_min_width_scales_with_image() {
        let config = ExtractConfig::default();
        assert_eq!(config.min_width_px(1000), 50);
        assert_eq!(config.min_width_px(200), 10);
        // Tiny images still require at least one column
        assert_eq!(config.min_width_px(10), 1);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{ "min_height_px": 35 }"#).unwrap();
        assert_eq!(config.min_height_px, 35);
        assert_eq!(config.luminance_threshold, 200.0);
        assert_eq!(config.binarize_policy, BinarizePolicy::Luminance);
    }

    #[test]
    fn test_policy_parses_snake_case() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{ "binarize_policy": "color_distance" }"#).unwrap();
        assert_eq!(config.binarize_policy, BinarizePolicy::ColorDistance);
    }

    #[test]
    fn test_three_point_mode() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{ "expect_x_axis_point": true }"#).unwrap();
        assert_eq!(config.required_points(), 3);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.json"));
        assert_eq!(config.min_height_px, 20);
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "baseline_margin_px": 9 }"#).unwrap();
        let config = load_config(&path);
        assert_eq!(config.baseline_margin_px, 9);
    }
}
