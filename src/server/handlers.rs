use super::AppState;
use crate::models::{ErrorBody, HealthResponse, ImageForm, Upload};
use crate::request::{BODY_TOO_LARGE, BODY_UNREADABLE};
use crate::response::{map_outcome, ApiError, CHAT_FAILED, IMAGE_FAILED};
use crate::upload::{UploadGuard, FILE_TOO_LARGE, ONLY_IMAGES};
use crate::{Error, Result};
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};

pub const UNEXPECTED_FIELD: &str = "Unexpected field";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "AI backend is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn chat(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("Unreadable chat body: {}", rejection.body_text());
            let reason = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                BODY_TOO_LARGE
            } else {
                BODY_UNREADABLE
            };
            return ApiError::new(Error::client_input(reason), CHAT_FAILED).into_response();
        }
    };
    map_outcome(state.app.chat(&body).await, CHAT_FAILED)
}

/// A request that is not multipart at all is treated as a form without an
/// image.
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(mut multipart) => {
            match read_image_form(&mut multipart, state.app.upload_guard()).await {
                Ok(form) => form,
                Err(e) => return ApiError::new(e, IMAGE_FAILED).into_response(),
            }
        }
        Err(rejection) => {
            tracing::debug!("Image request is not multipart: {}", rejection.body_text());
            ImageForm::default()
        }
    };
    map_outcome(state.app.analyze_image(form).await, IMAGE_FAILED)
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}

/// Collects the single `image` file part and the optional `message` text
/// part. Any other file part is rejected.
///
/// The declared type is checked on the part headers, before the part body
/// is read.
async fn read_image_form(multipart: &mut Multipart, guard: &UploadGuard) -> Result<ImageForm> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (name.as_str(), file_name) {
            ("image", Some(file_name)) if form.image.is_none() => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !guard.is_allowed_type(&content_type) {
                    tracing::warn!(
                        "Rejected upload {:?}: content type {}",
                        file_name,
                        content_type
                    );
                    return Err(Error::client_input(ONLY_IMAGES));
                }
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.image = Some(Upload {
                    file_name: Some(file_name),
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            (_, Some(_)) => return Err(Error::client_input(UNEXPECTED_FIELD)),
            ("message", None) => {
                form.message = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::client_input(FILE_TOO_LARGE)
    } else {
        Error::client_input(err.body_text())
    }
}
