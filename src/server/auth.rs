use super::AppState;
use crate::models::ErrorBody;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const INVALID_API_KEY: &str = "Invalid or missing API key";

/// Enforces `X-API-Key` when the service is configured with a key; a no-op
/// otherwise.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.api_key.as_deref() {
        let authorized = request
            .headers()
            .get(API_KEY_HEADER)
            .is_some_and(|provided| bool::from(provided.as_bytes().ct_eq(expected.as_bytes())));

        if !authorized {
            tracing::warn!("Rejected {} without a valid API key", request.uri().path());
            return (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(INVALID_API_KEY)))
                .into_response();
        }
    }

    next.run(request).await
}
