use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use journal_core::domain::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Domain(err) => {
                let (status, msg) = match &err {
                    DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                    DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                    DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                    DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                    DomainError::InUse(_) => (StatusCode::CONFLICT, err.to_string()),
                    DomainError::InvalidMediaType(_) => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
                    }
                    DomainError::PayloadTooLarge { .. } => {
                        (StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
                    }
                    // A failed blob write aborts the edit; the client gets a
                    // generic message, the detail stays in the logs.
                    DomainError::BlobWrite(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "failed to save".to_string(),
                    ),
                    DomainError::Unexpected(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    ),
                };
                (status, msg)
            }
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}
