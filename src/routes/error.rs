use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::verification::ErrorResponse;
use crate::services::ocr::{ExtractionError, UnsupportedImage};

/// Errors surfaced by the verification endpoint.
///
/// Field mismatches are not errors; they are reported in a successful response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image file uploaded")]
    MissingImage,

    #[error("All fields are required")]
    MissingFields,

    #[error(transparent)]
    UnsupportedImage(#[from] UnsupportedImage),

    #[error("{}", multipart_error_text(.0))]
    Multipart(#[from] MultipartError),

    #[error("Failed to verify label")]
    Extraction(#[from] ExtractionError),
}

fn multipart_error_text(err: &MultipartError) -> &'static str {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "File too large"
    } else {
        "Invalid multipart request"
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Multipart(err) => err.status(),
            ApiError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            ApiError::Multipart(err) => Some(err.body_text()),
            ApiError::Extraction(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
