//! Model status handlers

use axum::{extract::State, Json};

use santerisk_core::logic::model::ThresholdConfig;
use santerisk_core::FEATURE_LAYOUT;

use crate::models::{ImportancesResponse, ModelStatusResponse};
use crate::AppState;

/// Loaded model (or fallback reason), feature layout, threshold range, counters
pub async fn status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        engine: state.service.status(),
        feature_names: FEATURE_LAYOUT.to_vec(),
        threshold: ThresholdConfig::new(state.config.default_threshold),
    })
}

pub async fn importances(State(state): State<AppState>) -> Json<ImportancesResponse> {
    let importances = state.service.importances();
    Json(ImportancesResponse {
        available: !importances.is_empty(),
        importances,
        intercept: state.service.intercept(),
    })
}
