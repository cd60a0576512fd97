//! Configuration module

use std::env;

use santerisk_core::constants::{get_default_threshold, get_model_path};

/// Default request body limit (CSV uploads)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model artifact path, loaded once at startup
    pub model_path: String,

    /// Threshold used when a request does not give one
    pub default_threshold: f64,

    /// Maximum request body size
    pub max_upload_bytes: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: get_model_path(),

            default_threshold: get_default_threshold(),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_path: santerisk_core::constants::DEFAULT_MODEL_PATH.to_string(),
            default_threshold: santerisk_core::constants::DEFAULT_THRESHOLD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            environment: "development".to_string(),
        }
    }
}
