//! Histogram normalization
//!
//! Turns the untrusted `histogram` array of a prediction response into
//! labeled display bins. The check is all-or-nothing: a single bad bin
//! suppresses the whole chart.

use thiserror::Error;

use crate::models::{DisplayBin, HistogramBin};

/// Width of every histogram bin in millimetres
pub const BIN_WIDTH_MM: f64 = 20.0;

/// Most axis labels a chart should print before thinning them out
pub const MAX_AXIS_LABELS: usize = 10;

/// Non-fatal data problems; the average is still shown
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    #[error("No valid histogram data to display.")]
    EmptyOrInvalidHistogram,
}

/// Label a bin as "{start}–{start + width} mm"
pub fn width_range_label(bin_start: f64) -> String {
    format!("{}–{} mm", bin_start, bin_start + BIN_WIDTH_MM)
}

/// Normalize raw bins into display bins, preserving order
pub fn normalize(raw_bins: &[HistogramBin]) -> Result<Vec<DisplayBin>, DataError> {
    if raw_bins.is_empty() {
        return Err(DataError::EmptyOrInvalidHistogram);
    }

    raw_bins
        .iter()
        .map(display_bin)
        .collect::<Option<Vec<_>>>()
        .ok_or(DataError::EmptyOrInvalidHistogram)
}

fn display_bin(raw: &HistogramBin) -> Option<DisplayBin> {
    let bin_start = raw.bin_start.as_f64()?;
    let count = raw.count.as_f64()?;
    Some(DisplayBin {
        width_range: width_range_label(bin_start),
        count,
    })
}

/// Print every n-th axis label so at most about ten are shown
pub fn label_interval(bin_count: usize) -> usize {
    (bin_count / MAX_AXIS_LABELS).max(1)
}
