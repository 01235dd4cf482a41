use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sensorhub_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `sensorhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A domain error on a route whose contract reports every caller-side
    /// failure, not-found included, as 400.
    #[error(transparent)]
    Rejected(CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Use as `.map_err(AppError::rejected)` on create/update routes.
    pub fn rejected(err: CoreError) -> Self {
        AppError::Rejected(err)
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Rejected(core) => match classify_core_error(core) {
                (status, code, msg) if status == StatusCode::NOT_FOUND => {
                    (StatusCode::BAD_REQUEST, code, msg)
                }
                other => other,
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a [`CoreError`] into an HTTP status, error code, and message.
///
/// - Validation failures and duplicate module ids map to 400.
/// - Missing modules or sensors map to 404.
/// - Concurrent-modification conflicts map to 409.
/// - Storage failures map to 500 with a sanitized message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
        CoreError::DuplicateModule(_) => {
            (StatusCode::BAD_REQUEST, "DUPLICATE_MODULE", err.to_string())
        }
        CoreError::ModuleNotFound(_) | CoreError::SensorNotFound { .. } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Storage(msg) => {
            tracing::error!(error = %msg, "Storage error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
