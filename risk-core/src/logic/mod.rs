//! Logic Module - Scoring pipeline
//!
//! Validator → Scorer → Classifier → Summarizer → Explainer,
//! all driven by `service` over a model loaded once at startup.

pub mod features;
pub mod dataset;
pub mod validate;
pub mod model;
pub mod scoring;
pub mod summary;
pub mod explain;
pub mod service;
