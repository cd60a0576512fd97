//! Explain Module - Feature importances and local attributions
//!
//! - `importances`: coefficients of the model's linear stage, if any
//! - `explain_batch`: bounded attribution demo over the first rows of a batch,
//!   delegated to an `Attributor` backend

pub mod engine;
pub mod shapley;
pub mod types;

pub use engine::{explain_batch, importances, Attribution, Attributor, AttributionError};
pub use shapley::ExactShapley;
pub use types::{Explanation, FeatureImportance};
