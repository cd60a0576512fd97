//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override the model path and default threshold.

/// Default model artifact path (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "modele_risque.json";

/// Default classification threshold (Stable / À risque)
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Interactive threshold range
pub const THRESHOLD_MIN: f64 = 0.30;
pub const THRESHOLD_MAX: f64 = 0.70;
pub const THRESHOLD_STEP: f64 = 0.01;

/// Attribution demo bounds (background sample / evaluated rows)
pub const MAX_EXPLAIN_BACKGROUND: usize = 20;
pub const MAX_EXPLAIN_ROWS: usize = 20;

/// Id used for interactive single-record predictions
pub const SINGLE_RECORD_ID: &str = "UNITE";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SantéRisk";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("RISK_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get default threshold from environment or use default
///
/// Values outside [0, 1] are ignored.
pub fn get_default_threshold() -> f64 {
    std::env::var("RISK_DEFAULT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|t| (0.0..=1.0).contains(t))
        .unwrap_or(DEFAULT_THRESHOLD)
}
