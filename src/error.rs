use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Every failure a handler can produce. The `IntoResponse` impl below is
/// the single place these are turned into wire responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Authentication(String),
    /// The store reported no created row without raising an error.
    #[error("Invalid user data")]
    CreationFailed,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Wire shape of an error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub name: String,
    pub kind: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Unknown email answers 400, not 404; clients key off the message.
            ApiError::Validation(_)
            | ApiError::Conflict(_)
            | ApiError::NotFound(_)
            | ApiError::CreationFailed => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::Conflict(_) => "ConflictError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::Authentication(_) => "AuthenticationError",
            ApiError::CreationFailed => "CreationError",
            ApiError::Database(_) => "DatabaseError",
            ApiError::Internal(_) => "InternalError",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::NotFound(_) => "not_found",
            ApiError::Authentication(_) => "authentication",
            ApiError::CreationFailed => "creation",
            ApiError::Database(_) => "database",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            message: self.to_string(),
            name: self.name().to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
