//! Orchard Harvest Width Estimator - client
//!
//! Drives the scan form: validates input, submits one prediction request at
//! a time to the remote service and turns the answer into a chart.

pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod transport;

pub use crate::config::ClientConfig;
pub use controller::SubmissionController;
pub use error::{ClientError, ClientResult};
pub use render::{render_screen, ChartRenderer, TextChart};
pub use transport::{HttpTransport, PredictionTransport};
