use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use common::vision::VisionError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::utils::fetch::FetchError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `FETCH_FAILED`, `NOT_FOUND`, `STORAGE_ERROR`, `ANALYSIS_FAILED`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "File too large. Maximum size: 10 MB")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// The client sent something unacceptable. No side effects happened.
    Validation(String),
    /// A remote page or image could not be retrieved.
    FetchFailed(String),
    NotFound(String),
    /// The object storage backend failed.
    Storage(String),
    /// The vision model call or its output handling failed.
    Analysis(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::FetchFailed(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "FETCH_FAILED",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Storage(msg) => {
                tracing::error!("storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: msg,
                    },
                )
            }
            AppError::Analysis(msg) => {
                tracing::error!("analysis error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "ANALYSIS_FAILED",
                        message: msg,
                    },
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: msg,
                    },
                )
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (AppError::Validation(msg)
        | AppError::FetchFailed(msg)
        | AppError::NotFound(msg)
        | AppError::Storage(msg)
        | AppError::Analysis(msg)
        | AppError::Internal(msg)) = self;
        write!(f, "{msg}")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::FetchFailed(format!("Failed to fetch URL: {err}"))
    }
}
