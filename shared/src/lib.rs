//! Shared types and logic for the Orchard Harvest Width Estimator
//!
//! This crate contains the form model, validation rules, histogram
//! normalization and submission state machine shared between the backend,
//! the native client and the browser form (via WASM).

pub mod histogram;
pub mod models;
pub mod projection;
pub mod submission;
pub mod validation;

pub use histogram::*;
pub use models::*;
pub use submission::*;
pub use validation::*;
