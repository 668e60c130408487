//! WebAssembly module for the Orchard Harvest Width Estimator
//!
//! Provides client-side logic for the browser form:
//! - Form validation and request payload building
//! - Histogram normalization and labeling
//! - Turning a prediction response into a display model

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::submission::*;
pub use shared::validation::*;

use shared::{histogram, DataError};

/// Display model handed to the chart component
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayModel {
    average_diameter: f64,
    average_label: String,
    /// None when the histogram was empty or unusable
    bins: Option<Vec<DisplayBin>>,
}

/// Validate the form (camelCase JSON) and return the request payload JSON
#[wasm_bindgen]
pub fn validate_form(form_json: &str) -> Result<String, JsValue> {
    build_request(form_json).map_err(|e| JsValue::from_str(&e))
}

/// Normalize a raw `histogram` array; returns undefined when the chart
/// should be suppressed
#[wasm_bindgen]
pub fn normalize_histogram(histogram_json: &str) -> Result<Option<String>, JsValue> {
    normalized_bins(histogram_json).map_err(|e| JsValue::from_str(&e))
}

/// Turn a 2xx response body into the display model JSON
#[wasm_bindgen]
pub fn interpret_prediction(body: &str) -> Result<String, JsValue> {
    display_model(body).map_err(|e| JsValue::from_str(&e))
}

/// Message shown when the service answers with a non-2xx status
#[wasm_bindgen]
pub fn server_error_message(status: u16, status_text: &str) -> String {
    TransportError::NonSuccessStatus {
        status,
        status_text: status_text.to_string(),
    }
    .to_string()
}

/// Message shown when the request never got an answer
#[wasm_bindgen]
pub fn network_error_message(detail: &str) -> String {
    TransportError::NetworkFailure(detail.to_string()).to_string()
}

/// Average diameter with two decimals
#[wasm_bindgen]
pub fn format_average_diameter(average_diameter: f64) -> String {
    format_average(average_diameter)
}

/// Show every n-th x-axis label
#[wasm_bindgen]
pub fn axis_label_interval(bin_count: usize) -> usize {
    histogram::label_interval(bin_count)
}

/// Pin a range control value to 20..=120 mm
#[wasm_bindgen]
pub fn clamp_diameter(value: i32) -> u8 {
    Diameter::clamped(i64::from(value)).mm()
}

/// Bin width the labels assume (mm)
#[wasm_bindgen]
pub fn bin_width_mm() -> f64 {
    histogram::BIN_WIDTH_MM
}

fn build_request(form_json: &str) -> Result<String, String> {
    let form: FormInput =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    let request = validate(&form).map_err(|e| e.to_string())?;
    serde_json::to_string(&request).map_err(|e| e.to_string())
}

fn normalized_bins(histogram_json: &str) -> Result<Option<String>, String> {
    let raw: Vec<HistogramBin> = serde_json::from_str(histogram_json)
        .map_err(|e| format!("Invalid histogram JSON: {}", e))?;
    match histogram::normalize(&raw) {
        Ok(bins) => serde_json::to_string(&bins).map(Some).map_err(|e| e.to_string()),
        Err(e) => {
            warn_invalid_histogram(e, histogram_json);
            Ok(None)
        }
    }
}

fn display_model(body: &str) -> Result<String, String> {
    let model = match interpret_response(body.as_bytes()).map_err(|e| e.to_string())? {
        SubmissionState::Succeeded(result) => DisplayModel {
            average_label: format_average(result.average_diameter),
            average_diameter: result.average_diameter,
            bins: Some(result.bins),
        },
        SubmissionState::SucceededNoChart { average_diameter } => {
            warn_invalid_histogram(DataError::EmptyOrInvalidHistogram, body);
            DisplayModel {
                average_label: format_average(average_diameter),
                average_diameter,
                bins: None,
            }
        }
        other => return Err(format!("Unexpected submission state: {:?}", other)),
    };
    serde_json::to_string(&model).map_err(|e| e.to_string())
}

#[cfg(target_arch = "wasm32")]
fn warn_invalid_histogram(error: DataError, raw: &str) {
    web_sys::console::warn_2(&JsValue::from_str(&error.to_string()), &JsValue::from_str(raw));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn_invalid_histogram(_error: DataError, _raw: &str) {}
