use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by partner-facing operations. Every variant maps to one
/// HTTP status; store failures carry the underlying error for logging but
/// never leak it to clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    PreconditionFailed(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::PreconditionFailed(_) => StatusCode::CONFLICT,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Store(e) = &self {
            tracing::error!(error = ?e, "store error response");
        }
        let status = self.status();
        let message = match self {
            ServiceError::Store(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
