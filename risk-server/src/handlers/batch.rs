//! Batch scoring handlers (CSV upload)

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use santerisk_core::logic::dataset::to_csv_bytes;
use santerisk_core::{BatchOptions, BatchOutcome, RawTable};

use crate::models::{BatchQuery, BatchResponse};
use crate::{AppError, AppResult, AppState};

/// Score a CSV body and return rows, summary and explanations as JSON
pub async fn score(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
    body: Bytes,
) -> AppResult<Json<BatchResponse>> {
    let (outcome, threshold) = run(&state, &query, body).await?;

    tracing::info!(
        "Batch scored: {} rows, {} at risk",
        outcome.summary.total,
        outcome.summary.pct_at_risk
    );

    Ok(Json(BatchResponse::new(
        outcome,
        threshold,
        state.service.model().is_loaded(),
    )))
}

/// Score a CSV body and return the scored table as a CSV download
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let query = BatchQuery {
        explain: false,
        ..query
    };
    let (outcome, _) = run(&state, &query, body).await?;

    let csv = to_csv_bytes(&outcome.scored).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"predictions.csv\""),
        ],
        csv,
    ))
}

async fn run(state: &AppState, query: &BatchQuery, body: Bytes) -> AppResult<(BatchOutcome, f64)> {
    query.validate()?;
    let threshold = query.threshold.unwrap_or(state.config.default_threshold);
    let options = BatchOptions {
        explain: query.explain,
    };

    let table = RawTable::from_reader(body.as_ref())
        .map_err(|e| AppError::BadRequest(format!("CSV illisible: {}", e)))?;

    let service = state.service.clone();
    let outcome =
        tokio::task::spawn_blocking(move || service.score_table(&table, threshold, options))
            .await??;

    Ok((outcome, threshold))
}
