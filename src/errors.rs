use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Identity provider error: {0}")]
    UpstreamError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

pub fn not_found(kind: &str, id: &str) -> anyhow::Error {
    AppError::NotFound(format!("{kind} '{id}'")).into()
}

pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
    AppError::Conflict(msg.into()).into()
}

pub fn bad_request(msg: impl Into<String>) -> anyhow::Error {
    AppError::BadRequest(msg.into()).into()
}

pub fn forbidden(msg: impl Into<String>) -> anyhow::Error {
    AppError::Forbidden(msg.into()).into()
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Recover the HTTP-facing error from a service-level `anyhow::Error`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<AppError>() {
            Ok(app) => return app,
            Err(err) => err,
        };
        let err = match err.downcast::<validator::ValidationErrors>() {
            Ok(v) => return AppError::Validation(v.to_string()),
            Err(err) => err,
        };
        match err.downcast::<rusqlite::Error>() {
            Ok(db) => AppError::DatabaseError(db.to_string()),
            Err(other) => AppError::InternalServerError(format!("{other:#}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        }

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
