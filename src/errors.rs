use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Optimization result already applied")]
    AlreadyApplied,

    #[error("Price computation failed: {0}")]
    ComputationFailed(String),

    #[error("Invalid computation result: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Persistence(#[source] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::AlreadyApplied => {
                (StatusCode::CONFLICT, "Optimization result already applied".into())
            }
            AppError::ComputationFailed(msg) => {
                tracing::error!("Price computation failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Price optimization failed".into())
            }
            AppError::Parse(msg) => {
                tracing::error!("Invalid computation result: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Price optimization failed".into())
            }
            AppError::Persistence(e) => {
                tracing::error!("Storage error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Persistence(e)
    }
}
