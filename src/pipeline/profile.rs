//! Per-column ink profiling.
//!
//! For each pixel column, finds the tallest contiguous run of ink and the
//! row where ink reaches deepest toward the bottom edge. Columns are
//! independent, so the scan fans out across them with rayon; results are
//! identical to a sequential left-to-right pass.

use rayon::prelude::*;

use super::binarize::BinaryMask;

/// Profile of one pixel column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnProfile {
    /// Height of the tallest contiguous ink run in the column.
    pub max_run_height: u32,
    /// Largest-y ink row in the column: the first ink pixel met scanning
    /// bottom-up, kept across run resets so a bar's bottom edge survives
    /// noise rows above it. `None` when the column has no ink at all.
    pub lowest_ink_row: Option<u32>,
}

/// Scans every column of `mask` bottom-up, left to right.
pub fn profile_columns(mask: &BinaryMask) -> Vec<ColumnProfile> {
    (0..mask.width())
        .into_par_iter()
        .map(|x| profile_column(mask, x))
        .collect()
}

fn profile_column(mask: &BinaryMask, x: u32) -> ColumnProfile {
    let mut run = 0u32;
    let mut max_run_height = 0u32;
    let mut lowest_ink_row = None;

    for y in (0..mask.height()).rev() {
        if mask.is_ink(x, y) {
            run += 1;
            max_run_height = max_run_height.max(run);
            if lowest_ink_row.is_none() {
                lowest_ink_row = Some(y);
            }
        } else {
            run = 0;
        }
    }

    ColumnProfile {
        max_run_height,
        lowest_ink_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a mask from rows of '#' (ink) and '.' (background), top row
    /// first, matching how a chart reads on screen.
    fn mask_from_art(rows: &[&str]) -> BinaryMask {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut ink = Vec::new();
        for row in rows {
            assert_eq!(row.len() as u32, width);
            for c in row.chars() {
                ink.push(c == '#');
            }
        }
        BinaryMask::from_rows(width, height, ink)
    }

    #[test]
    fn test_empty_column() {
        let mask = mask_from_art(&["...", "...", "..."]);
        let profiles = profile_columns(&mask);
        assert_eq!(profiles.len(), 3);
        for p in profiles {
            assert_eq!(p.max_run_height, 0);
            assert_eq!(p.lowest_ink_row, None);
        }
    }

    #[test]
    fn test_solid_column() {
        let mask = mask_from_art(&["#", "#", "#", "#"]);
        let p = profile_columns(&mask)[0];
        assert_eq!(p.max_run_height, 4);
        assert_eq!(p.lowest_ink_row, Some(3));
    }

    #[test]
    fn test_run_resets_on_background() {
        // Two runs split by a gap: heights 2 (rows 0-1) and 3 (rows 3-5)
        let mask = mask_from_art(&["#", "#", ".", "#", "#", "#"]);
        let p = profile_columns(&mask)[0];
        assert_eq!(p.max_run_height, 3);
        assert_eq!(p.lowest_ink_row, Some(5));
    }

    #[test]
    fn test_lowest_ink_row_survives_resets() {
        // Ink at the bottom, a gap, then a taller run above. The bottom edge
        // must still report row 5 even though the tallest run floats higher.
        let mask = mask_from_art(&["#", "#", "#", ".", ".", "#"]);
        let p = profile_columns(&mask)[0];
        assert_eq!(p.max_run_height, 3);
        assert_eq!(p.lowest_ink_row, Some(5), "bottom edge tracked across the gap");
    }

    #[test]
    fn test_isolated_noise_above_bar() {
        // A bar of height 3 with a single noise pixel two rows above it:
        // the profile keeps the bar's run and its bottom row.
        let mask = mask_from_art(&["#", ".", "#", "#", "#"]);
        let p = profile_columns(&mask)[0];
        assert_eq!(p.max_run_height, 3);
        assert_eq!(p.lowest_ink_row, Some(4));
    }

    #[test]
    fn test_columns_profiled_independently() {
        let mask = mask_from_art(&[
            ".#.", //
            ".#.", //
            "##.", //
        ]);
        let profiles = profile_columns(&mask);
        assert_eq!(profiles[0], ColumnProfile { max_run_height: 1, lowest_ink_row: Some(2) });
        assert_eq!(profiles[1], ColumnProfile { max_run_height: 3, lowest_ink_row: Some(2) });
        assert_eq!(profiles[2], ColumnProfile { max_run_height: 0, lowest_ink_row: None });
    }
}
