//! Scan form models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Smallest diameter the range controls can select (mm)
pub const MIN_DIAMETER_MM: u8 = 20;
/// Largest diameter the range controls can select (mm)
pub const MAX_DIAMETER_MM: u8 = 120;

/// A fruit diameter bound in millimetres, always within 20..=120
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Diameter(u8);

impl Diameter {
    pub const MIN: Diameter = Diameter(MIN_DIAMETER_MM);
    pub const MAX: Diameter = Diameter(MAX_DIAMETER_MM);

    /// Create a diameter, returning None outside the selectable range
    pub fn new(mm: u8) -> Option<Self> {
        (MIN_DIAMETER_MM..=MAX_DIAMETER_MM)
            .contains(&mm)
            .then_some(Self(mm))
    }

    /// Create a diameter from an arbitrary control value, pinned to the range
    pub fn clamped(mm: i64) -> Self {
        let pinned = mm.clamp(i64::from(MIN_DIAMETER_MM), i64::from(MAX_DIAMETER_MM));
        Self(pinned as u8)
    }

    pub fn mm(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Diameter {
    type Error = String;

    fn try_from(mm: u8) -> Result<Self, Self::Error> {
        Self::new(mm).ok_or_else(|| {
            format!(
                "diameter {} mm is outside {}..={} mm",
                mm, MIN_DIAMETER_MM, MAX_DIAMETER_MM
            )
        })
    }
}

impl From<Diameter> for u8 {
    fn from(d: Diameter) -> Self {
        d.0
    }
}

impl std::fmt::Display for Diameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five fields of the scan form, as typed by the user
///
/// Dates and growth rate are raw text; the diameters come from bounded
/// range controls and can never leave 20..=120 mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub scan_date: String,
    pub harvest_date: String,
    /// Growth rate in mm/day
    pub growth_rate: String,
    pub min_diameter: Diameter,
    pub max_diameter: Diameter,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            scan_date: String::new(),
            harvest_date: String::new(),
            growth_rate: String::new(),
            min_diameter: Diameter::MIN,
            max_diameter: Diameter::MAX,
        }
    }
}

/// Payload sent to the prediction service (`POST /predict`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PredictionRequest {
    pub scan_date: NaiveDate,
    pub harvest_date: NaiveDate,
    #[validate(range(min = 0.0))]
    pub growth_rate: f64,
    #[validate(range(min = 20.0, max = 120.0))]
    pub min_diameter: f64,
    #[validate(range(min = 20.0, max = 120.0))]
    pub max_diameter: f64,
}

impl PredictionRequest {
    /// Whole days between scan and harvest (negative if harvest precedes scan)
    pub fn days_until_harvest(&self) -> i64 {
        (self.harvest_date - self.scan_date).num_days()
    }
}
