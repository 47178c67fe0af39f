//! HTTP-facing errors. The session core never fails; only lookups done on
//! behalf of a request can.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown or unparsable quiz id, as given by the client.
    #[error("Quiz not found")]
    QuizNotFound(String),
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn quiz_not_found(id: impl ToString) -> Self {
        ApiError::QuizNotFound(id.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::QuizNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidDifficulty(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match &self {
            ApiError::QuizNotFound(id) => tracing::debug!(target: "catalog", quiz_id = %id, %status, "Quiz not found"),
            ApiError::InvalidDifficulty(raw) => tracing::debug!(target: "catalog", %raw, %status, "Invalid difficulty filter"),
            ApiError::RouteNotFound => tracing::debug!(target: "quizapp_backend", %status, "Route not found"),
        }
        (status, Json(ErrorOut { success: false, error: self.to_string() })).into_response()
    }
}
