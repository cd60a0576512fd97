//! SantéRisk Core - Health Risk Scoring Engine
//!
//! Scores individuals from five inputs (stress, ICS, SCG, age, night shift)
//! and classifies them as "Stable" or "À risque" against a threshold.
//!
//! ## Pipeline
//! - `features/` - Feature layout (single source of truth) and typed records
//! - `dataset/` - CSV tables in and out
//! - `validate/` - Schema, type and range checks (all-or-nothing per batch)
//! - `model/` - Model capabilities, loader, fallback formula, threshold
//! - `scoring/` - Probability + classification per record
//! - `summary` - Batch aggregates
//! - `explain/` - Coefficient importances and bounded local attributions
//! - `service` - Request orchestration over a shared read-only model

pub mod constants;
pub mod logic;

pub use logic::dataset::{DatasetError, RawTable};
pub use logic::explain::{Explanation, FeatureImportance};
pub use logic::features::{Batch, Record, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{load_model, AbsentReason, ModelError, ModelLoad, RiskLabel, RiskModel};
pub use logic::scoring::{ScoredBatch, ScoredRecord, Scorer};
pub use logic::service::{BatchOptions, BatchOutcome, RequestError, RiskService, SingleOutcome};
pub use logic::summary::{summarize, Summary};
pub use logic::validate::{validate, ValidationIssue, ValidationReport};
