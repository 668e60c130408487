//! Prediction response and display models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A histogram bin exactly as the prediction service sent it
///
/// Both fields are kept as raw JSON values because the response is
/// untrusted; anything that is not an object decodes to a bin with null
/// fields so that normalization can reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct HistogramBin {
    pub bin_start: Value,
    pub count: Value,
}

impl HistogramBin {
    pub fn new(bin_start: impl Into<Value>, count: impl Into<Value>) -> Self {
        Self {
            bin_start: bin_start.into(),
            count: count.into(),
        }
    }
}

impl From<Value> for HistogramBin {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                bin_start: fields.remove("bin_start").unwrap_or(Value::Null),
                count: fields.remove("count").unwrap_or(Value::Null),
            },
            _ => Self {
                bin_start: Value::Null,
                count: Value::Null,
            },
        }
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub average_diameter: f64,
    pub histogram: Vec<HistogramBin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A labeled, renderer-ready histogram bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBin {
    /// Label such as "20–40 mm"
    pub width_range: String,
    pub count: f64,
}

/// Display model of one successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub average_diameter: f64,
    pub bins: Vec<DisplayBin>,
}

/// Format an average diameter the way the result heading shows it
pub fn format_average(average_diameter: f64) -> String {
    format!("{:.2}", average_diameter)
}
