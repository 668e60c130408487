//! Client-side validation of the scan form
//!
//! Rules are checked in a fixed order and the first failure wins:
//! 1. scan date, harvest date and growth rate must all be filled in
//! 2. harvest date must be strictly after scan date
//! 3. min diameter must not exceed max diameter
//! 4. growth rate must parse as a finite, non-negative number

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{FormInput, PredictionRequest};

/// Date format produced by the form's date controls
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a form cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all required inputs.")]
    MissingFields,

    #[error("{field} is not a valid date.")]
    InvalidDate { field: &'static str },

    #[error("Harvest date must be after scan date.")]
    InvalidDateOrder,

    #[error("Min diameter cannot be greater than max diameter.")]
    InvalidDiameterRange,

    #[error("Growth rate must be a non-negative number.")]
    InvalidGrowthRate,
}

/// Validate the form and build the request payload
pub fn validate(input: &FormInput) -> Result<PredictionRequest, ValidationError> {
    let required = [&input.scan_date, &input.harvest_date, &input.growth_rate];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }

    let scan_date = parse_date(&input.scan_date, "Scan date")?;
    let harvest_date = parse_date(&input.harvest_date, "Harvest date")?;
    if harvest_date <= scan_date {
        return Err(ValidationError::InvalidDateOrder);
    }

    if input.min_diameter > input.max_diameter {
        return Err(ValidationError::InvalidDiameterRange);
    }

    let growth_rate = parse_growth_rate(&input.growth_rate)?;

    Ok(PredictionRequest {
        scan_date,
        harvest_date,
        growth_rate,
        min_diameter: f64::from(input.min_diameter.mm()),
        max_diameter: f64::from(input.max_diameter.mm()),
    })
}

fn parse_date(text: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { field })
}

fn parse_growth_rate(text: &str) -> Result<f64, ValidationError> {
    match text.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(ValidationError::InvalidGrowthRate),
    }
}
