//! Growth projection used by the prediction service
//!
//! Each scanned fruit's mean diameter is grown linearly until harvest and
//! the projected diameters are summarized as an average plus histogram.

use thiserror::Error;

use crate::histogram::BIN_WIDTH_MM;
use crate::models::{HistogramBin, PredictionResponse};

/// Note sent when no fruit falls inside the requested diameter range
pub const NO_FRUITS_MESSAGE: &str = "No fruits found in diameter range";

/// Most bins a histogram may hold (1000 x 20 mm covers 0..20 m)
pub const MAX_HISTOGRAM_BINS: usize = 1_000;

/// Projections that cannot be summarized
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    #[error("Projected diameter exceeds {limit_mm} mm; check the growth rate")]
    DiameterOutOfRange { limit_mm: f64 },
}

/// Three-axis measurement of a scanned fruit (mm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitMeasurement {
    pub major_mm: f64,
    pub minor_mm: f64,
    pub subminor_mm: f64,
}

impl FruitMeasurement {
    pub fn mean_diameter(&self) -> f64 {
        (self.major_mm + self.minor_mm + self.subminor_mm) / 3.0
    }

    /// Diameter after growing `growth_rate` mm/day for `days`
    pub fn projected_diameter(&self, growth_rate: f64, days: i64) -> f64 {
        self.mean_diameter() + growth_rate * days as f64
    }
}

/// Round to two decimal places
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count diameters into contiguous fixed-width bins starting at 0 mm
///
/// The bin count covers the largest diameter, up to `MAX_HISTOGRAM_BINS`.
/// Negative diameters are counted in the first bin.
pub fn bin_diameters(diameters: &[f64], bin_width: f64) -> Result<Vec<u64>, ProjectionError> {
    let limit_mm = bin_width * MAX_HISTOGRAM_BINS as f64;
    let largest = diameters.iter().copied().fold(0.0_f64, f64::max);
    if largest >= limit_mm {
        return Err(ProjectionError::DiameterOutOfRange { limit_mm });
    }

    let len = ((largest / bin_width).floor() as usize + 1).min(MAX_HISTOGRAM_BINS);
    let mut counts = vec![0u64; len];
    for &d in diameters {
        let index = ((d / bin_width).floor().max(0.0) as usize).min(len - 1);
        counts[index] += 1;
    }
    Ok(counts)
}

/// Build the service response for a set of fruit
pub fn project(
    fruits: &[FruitMeasurement],
    growth_rate: f64,
    days: i64,
) -> Result<PredictionResponse, ProjectionError> {
    if fruits.is_empty() {
        return Ok(PredictionResponse {
            average_diameter: 0.0,
            histogram: Vec::new(),
            message: Some(NO_FRUITS_MESSAGE.to_string()),
        });
    }

    let projected: Vec<f64> = fruits
        .iter()
        .map(|fruit| fruit.projected_diameter(growth_rate, days))
        .collect();
    let average = projected.iter().sum::<f64>() / projected.len() as f64;

    let histogram = bin_diameters(&projected, BIN_WIDTH_MM)?
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin::new(i as f64 * BIN_WIDTH_MM, count))
        .collect();

    Ok(PredictionResponse {
        average_diameter: round_hundredths(average),
        histogram,
        message: None,
    })
}
