//! Business logic services for the prediction service

pub mod prediction;

pub use prediction::PredictionService;
