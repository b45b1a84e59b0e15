//! Uniform response envelope for page builder actions.
//!
//! Every action returns `{ "success", "error"?, "data"?, "warnings" }` and
//! never surfaces an error any other way. Advisory side operations that fail
//! add a message to `warnings` without failing the action.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub warnings: Vec<String>,
    /// HTTP status used when the envelope is sent over HTTP.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
            warnings: Vec::new(),
            status: StatusCode::OK,
        }
    }

    pub fn from_error(err: AppError) -> Self {
        let (status, message) = err.status_and_message();
        Self {
            success: false,
            error: Some(message),
            data: None,
            warnings: Vec::new(),
            status,
        }
    }

    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Override the HTTP status of a successful response (e.g. `201`).
    /// Failures keep the status derived from their error.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if self.success {
            self.status = status;
        }
        self
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
