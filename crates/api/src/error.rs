use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagebuilder_core::error::CoreError;

use crate::response::ActionResponse;

/// Message shown in place of any database or internal failure.
pub const MSG_INTERNAL: &str = "An internal error occurred";

pub const MSG_ROUTE_EXISTS: &str = "A page with this route already exists";
pub const MSG_BLOCK_KEY_EXISTS: &str = "A block with this key already exists on this page";

/// Application-level error type for actions and handlers.
///
/// Wraps [`CoreError`] for domain errors and adds transport-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pagebuilder_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A lookup by something other than an id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Convenience type alias for action return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status and caller-facing message.
    ///
    /// Database and internal core failures are logged here and replaced by
    /// [`MSG_INTERNAL`].
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Integrity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ActionResponse::<()>::from_error(self).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on the route and block-key constraints map to 409 with
///   the same messages as the pre-insert checks, so a lost race reads the
///   same as a detected conflict.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let message = match db_err.constraint() {
                    Some("uq_page_layouts_route") => Some(MSG_ROUTE_EXISTS.to_string()),
                    Some("uq_content_blocks_layout_key") => Some(MSG_BLOCK_KEY_EXISTS.to_string()),
                    Some(other) if other.starts_with("uq_") => Some(format!(
                        "Duplicate value violates unique constraint: {other}"
                    )),
                    _ => None,
                };
                if let Some(message) = message {
                    return (StatusCode::CONFLICT, message);
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
        }
    }
}
