//! Domain models for the Orchard Harvest Width Estimator

mod form;
mod prediction;

pub use form::*;
pub use prediction::*;
