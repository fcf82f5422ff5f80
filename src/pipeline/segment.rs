//! Bar segmentation.
//!
//! Groups consecutive qualifying columns into candidate regions, then keeps
//! only candidates that are wide enough and whose bottom edge rests on the
//! chart baseline. Baseline alignment is what separates bars from axis lines
//! and text blocks that pass the height threshold.

use super::profile::ColumnProfile;

/// A contiguous span of columns accepted as one bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarRegion {
    /// First member column.
    pub start_x: u32,
    /// Last member column (inclusive).
    pub end_x: u32,
    /// Tallest contiguous ink run among member columns, in pixels.
    pub height: u32,
    /// Deepest ink row among member columns.
    pub bottom_y: u32,
}

impl BarRegion {
    /// Width in columns, inclusive of both ends.
    pub fn width(&self) -> u32 {
        self.end_x - self.start_x + 1
    }
}

/// Thresholds governing which candidates become bars.
#[derive(Clone, Copy, Debug)]
pub struct SegmentParams {
    /// Minimum accepted width in columns.
    pub min_width_px: u32,
    /// Minimum `max_run_height` for a column to qualify.
    pub min_height_px: u32,
    /// Pixel row of the chart baseline (the origin calibration row).
    pub baseline_y: u32,
    /// Maximum distance between a candidate's bottom and the baseline.
    pub baseline_margin_px: u32,
}

/// One candidate being grown while consecutive columns qualify.
struct Candidate {
    start_x: u32,
    end_x: u32,
    height: u32,
    bottom_y: u32,
}

impl Candidate {
    fn open(x: u32, profile: &ColumnProfile, bottom: u32) -> Self {
        Self {
            start_x: x,
            end_x: x,
            height: profile.max_run_height,
            bottom_y: bottom,
        }
    }

    fn extend(&mut self, x: u32, profile: &ColumnProfile, bottom: u32) {
        self.end_x = x;
        // Height is the max over members, never a sum or average; bottom is
        // the deepest member row (rows grow downward).
        self.height = self.height.max(profile.max_run_height);
        self.bottom_y = self.bottom_y.max(bottom);
    }

    fn close(self, params: &SegmentParams) -> Option<BarRegion> {
        let width = self.end_x - self.start_x + 1;
        let baseline_gap = self.bottom_y.abs_diff(params.baseline_y);
        if width >= params.min_width_px && baseline_gap <= params.baseline_margin_px {
            Some(BarRegion {
                start_x: self.start_x,
                end_x: self.end_x,
                height: self.height,
                bottom_y: self.bottom_y,
            })
        } else {
            None
        }
    }
}

/// Scans `profiles` left to right and returns accepted bars in ascending
/// `start_x` order.
pub fn segment(profiles: &[ColumnProfile], params: &SegmentParams) -> Vec<BarRegion> {
    let mut bars = Vec::new();
    let mut current: Option<Candidate> = None;

    for (x, profile) in profiles.iter().enumerate() {
        let x = x as u32;
        // A column qualifies when its tallest run clears the height floor.
        // A column with no ink at all never qualifies, even at a zero floor.
        let qualifying_bottom = profile
            .lowest_ink_row
            .filter(|_| profile.max_run_height >= params.min_height_px);

        match qualifying_bottom {
            Some(bottom) => match current.as_mut() {
                Some(candidate) => candidate.extend(x, profile, bottom),
                None => current = Some(Candidate::open(x, profile, bottom)),
            },
            None => {
                if let Some(candidate) = current.take() {
                    bars.extend(candidate.close(params));
                }
            }
        }
    }

    // A candidate still open at the last column is evaluated like any other.
    if let Some(candidate) = current.take() {
        bars.extend(candidate.close(params));
    }

    bars
}
