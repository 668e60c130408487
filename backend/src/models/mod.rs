//! Request models for the prediction service
//!
//! Re-exports models from the shared crate and adds the raw request body

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

pub use shared::models::*;
use shared::DATE_FORMAT;

use crate::error::{AppError, AppResult};

/// Body of `POST /predict` before any field is trusted
#[derive(Debug, Default, Deserialize)]
pub struct PredictPayload {
    pub scan_date: Option<Value>,
    pub harvest_date: Option<Value>,
    pub growth_rate: Option<Value>,
    pub min_diameter: Option<Value>,
    pub max_diameter: Option<Value>,
}

impl PredictPayload {
    /// Check presence, parse and range-check every field
    pub fn into_request(self) -> AppResult<PredictionRequest> {
        let scan_date = required(self.scan_date, "scan_date")?;
        let harvest_date = required(self.harvest_date, "harvest_date")?;
        let growth_rate = required(self.growth_rate, "growth_rate")?;
        let min_diameter = required(self.min_diameter, "min_diameter")?;
        let max_diameter = required(self.max_diameter, "max_diameter")?;

        let request = PredictionRequest {
            scan_date: date(&scan_date, "scan_date")?,
            harvest_date: date(&harvest_date, "harvest_date")?,
            growth_rate: number(&growth_rate, "growth_rate")?,
            min_diameter: number(&min_diameter, "min_diameter")?,
            max_diameter: number(&max_diameter, "max_diameter")?,
        };

        if request.days_until_harvest() < 0 {
            return Err(AppError::Validation(
                "Harvest date must be after scan date".to_string(),
            ));
        }
        request.validate()?;

        Ok(request)
    }
}

fn required(value: Option<Value>, field: &'static str) -> AppResult<Value> {
    match value {
        Some(Value::Null) | None => Err(AppError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn date(value: &Value, field: &str) -> AppResult<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        .ok_or_else(|| AppError::Validation(format!("{} must be a date in YYYY-MM-DD format", field)))
}

/// Accepts JSON numbers and numeric strings
fn number(value: &Value, field: &str) -> AppResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> PredictPayload {
        serde_json::from_value(value).unwrap()
    }

    fn full() -> Value {
        json!({
            "scan_date": "2024-05-01",
            "harvest_date": "2024-06-01",
            "growth_rate": 0.05,
            "min_diameter": 20,
            "max_diameter": 120
        })
    }

    #[test]
    fn test_full_payload_parses() {
        let request = payload(full()).into_request().unwrap();
        assert_eq!(request.days_until_harvest(), 31);
        assert_eq!(request.min_diameter, 20.0);
        assert_eq!(request.max_diameter, 120.0);
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut body = full();
        body.as_object_mut().unwrap().remove("growth_rate");
        body.as_object_mut().unwrap().remove("max_diameter");
        let err = payload(body).into_request().unwrap_err();
        assert_eq!(err.to_string(), "Missing field: growth_rate");

        let err = payload(json!({})).into_request().unwrap_err();
        assert_eq!(err.to_string(), "Missing field: scan_date");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut body = full();
        body["growth_rate"] = json!("0.1");
        body["min_diameter"] = json!("30");
        let request = payload(body).into_request().unwrap();
        assert_eq!(request.growth_rate, 0.1);
        assert_eq!(request.min_diameter, 30.0);
    }

    #[test]
    fn test_same_day_accepted_earlier_harvest_rejected() {
        let mut body = full();
        body["harvest_date"] = json!("2024-05-01");
        assert!(payload(body.clone()).into_request().is_ok());

        body["harvest_date"] = json!("2024-04-30");
        let err = payload(body).into_request().unwrap_err();
        assert_eq!(err.to_string(), "Harvest date must be after scan date");
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut body = full();
        body["scan_date"] = json!("05/01/2024");
        assert!(matches!(
            payload(body).into_request(),
            Err(AppError::Validation(_))
        ));

        let mut body = full();
        body["growth_rate"] = json!(-0.5);
        assert!(matches!(
            payload(body).into_request(),
            Err(AppError::Validation(_))
        ));

        let mut body = full();
        body["growth_rate"] = json!("fast");
        assert!(matches!(
            payload(body).into_request(),
            Err(AppError::Validation(_))
        ));
    }
}
