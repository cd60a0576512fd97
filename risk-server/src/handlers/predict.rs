//! Single-record prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use santerisk_core::logic::validate::validate_and_coerce;

use crate::models::{PredictRequest, PredictResponse};
use crate::{AppError, AppResult, AppState};

/// The record is checked like a one-row batch: missing fields are a schema
/// error, and integer fields accept `1.0` but not `1.5`
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let threshold = req.threshold.unwrap_or(state.config.default_threshold);
    let batch = validate_and_coerce(&req.to_table())?;
    let record = batch
        .records()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Internal("empty prediction batch".to_string()))?;

    let service = state.service.clone();
    let outcome =
        tokio::task::spawn_blocking(move || service.score_record(record, threshold)).await??;

    tracing::debug!("Predicted {} → {}", outcome.record.record.id, outcome.record.classe);

    Ok(Json(PredictResponse::new(
        outcome,
        threshold,
        state.service.model().is_loaded(),
    )))
}
