//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use santerisk_core::{RequestError, ValidationIssue, ValidationReport};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected; every message is returned to the caller
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, "Validation échouée".to_string(), messages)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::Model(msg) => {
                tracing::error!("Model error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erreur du modèle".to_string(), Vec::new())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), Vec::new())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": details,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Validation(report) => report.into(),
            RequestError::Threshold(_) => AppError::BadRequest(err.to_string()),
            RequestError::Model(e) => AppError::Model(e.to_string()),
        }
    }
}

impl From<ValidationReport> for AppError {
    fn from(report: ValidationReport) -> Self {
        AppError::Validation(report.messages())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON with a wrongly typed `id` or `threshold`
            JsonRejection::JsonDataError(e) => {
                tracing::debug!("Rejected payload: {}", e.body_text());
                AppError::Validation(vec![ValidationIssue::InvalidTypes.to_string()])
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}
