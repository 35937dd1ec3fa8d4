//! Maps pipeline outcomes onto client-facing HTTP responses.

use crate::error::ErrorCategory;
use crate::models::{CompletionResponse, ErrorBody};
use crate::{Error, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const UPSTREAM_ERROR: &str = "OpenAI API error";
pub const SERVER_ERROR: &str = "Server error";
pub const CHAT_FAILED: &str = "Failed to process request";
pub const IMAGE_FAILED: &str = "Failed to analyze image";

/// An [`Error`] paired with the label reported for internal failures on the
/// route that produced it.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    internal_label: &'static str,
}

impl ApiError {
    pub fn new(error: Error, internal_label: &'static str) -> Self {
        Self {
            error,
            internal_label,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            Error::ClientInput(_) => StatusCode::BAD_REQUEST,
            Error::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match &self.error {
            Error::ClientInput(reason) => ErrorBody::new(reason.clone()),
            Error::Upstream { details, .. } => {
                ErrorBody::new(UPSTREAM_ERROR).with_details(details.clone())
            }
            other => ErrorBody::new(self.internal_label).with_message(other.to_string()),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::new(error, SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error.category() {
            ErrorCategory::ClientInput => tracing::info!("Rejected request: {}", self.error),
            ErrorCategory::Upstream => tracing::warn!("{}: {}", self.internal_label, self.error),
            ErrorCategory::Internal => tracing::error!("{}: {}", self.internal_label, self.error),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

/// 200 `{response}` on success, the categorized error body otherwise.
pub fn map_outcome(outcome: Result<String>, internal_label: &'static str) -> Response {
    match outcome {
        Ok(response) => Json(CompletionResponse { response }).into_response(),
        Err(error) => ApiError::new(error, internal_label).into_response(),
    }
}
