//! Result reporting.
//!
//! Renders calibrated values as status text, appends them to a CSV file in
//! append-only mode, and exports a JSON report with summary statistics.

pub mod chart;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::pipeline::{CalibratedValue, Extraction};

/// CSV header row. One data row per extracted bar.
const CSV_HEADER: &str = "timestamp,index,position_px,value";

/// Diagnostic shown when segmentation found nothing; a valid empty result.
pub const NO_BARS_MESSAGE: &str = "No bars detected aligned with the baseline.";

/// Marker used in text and CSV output for a bar that could not be read.
const UNREADABLE: &str = "unreadable";

/// Renders the extraction as display text: one value per line, or the
/// no-bars diagnostic.
pub fn render_text(extraction: &Extraction, decimal_places: u32) -> String {
    if extraction.is_empty() {
        return NO_BARS_MESSAGE.to_string();
    }

    extraction
        .values
        .iter()
        .map(|v| format_value(v, decimal_places))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_value(value: &CalibratedValue, decimal_places: u32) -> String {
    match value.value {
        Some(v) => format!("{:.*}", decimal_places as usize, v),
        None => UNREADABLE.to_string(),
    }
}

/// Initializes the CSV file with a header if it doesn't exist or is empty.
/// Existing data is preserved.
pub fn init_csv(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing CSV")?;
        let reader = BufReader::new(file);
        if reader.lines().next().is_some() {
            return Ok(());
        }
    }

    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one row per extracted value.
///
/// Opens the file in append mode for each call, so earlier extractions
/// survive a crash mid-batch.
pub fn append_to_csv(path: &Path, extraction: &Extraction, decimal_places: u32) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S");
    for value in &extraction.values {
        writeln!(
            file,
            "{},{},{},{}",
            timestamp,
            value.index,
            value.position_px,
            format_value(value, decimal_places)
        )
        .context("Failed to write CSV row")?;
    }
    Ok(())
}

/// Summary statistics over the readable values.
#[derive(Debug, Clone, Serialize)]
pub struct ValueStats {
    /// Number of readable values (unreadable bars excluded).
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ValueStats {
    /// Computes stats over readable values; `None` when there are none.
    pub fn from_values(values: &[CalibratedValue]) -> Option<Self> {
        let readable: Vec<f64> = values.iter().filter_map(|v| v.value).collect();
        if readable.is_empty() {
            return None;
        }

        let count = readable.len();
        let min = readable.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = readable.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = readable.iter().sum::<f64>() / count as f64;
        Some(Self { count, min, max, mean })
    }
}

/// JSON report body: the extracted values plus summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport<'a> {
    pub bar_count: usize,
    pub values: &'a [CalibratedValue],
    pub stats: Option<ValueStats>,
}

/// Exports the extraction as pretty-printed JSON.
pub fn export_to_json(extraction: &Extraction, output_path: &Path) -> Result<()> {
    let report = ExtractionReport {
        bar_count: extraction.bars.len(),
        values: &extraction.values,
        stats: ValueStats::from_values(&extraction.values),
    };

    let json =
        serde_json::to_string_pretty(&report).context("Failed to serialize extraction to JSON")?;

    let mut file = File::create(output_path).context(format!(
        "Failed to create JSON file: {}",
        output_path.display()
    ))?;
    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
