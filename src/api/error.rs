//! Error taxonomy for the HTTP surface.
//!
//! Every handler failure funnels into [`ApiError`], which renders as
//! `{"error": "<message>"}` with the matching status code. Internal
//! faults are logged in full and masked in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::denoise::DenoiseError;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The form carried no usable `file` field, or the multipart body
    /// was missing or unreadable.
    #[error("No file part")]
    MissingFile,
    /// A `file` field arrived with an empty filename.
    #[error("No selected file")]
    EmptyFilename,
    /// Filename extension outside the png/jpg/jpeg allow-list.
    #[error("Invalid file type")]
    InvalidFileType,
    /// Body past the upload size cap.
    #[error("Upload too large")]
    PayloadTooLarge,
    /// `strength` field that is not an integer >= 1.
    #[error("Invalid strength: {0}")]
    InvalidStrength(String),
    /// Bytes with an accepted extension that no decoder recognizes.
    #[error("Could not decode image")]
    UndecodableImage,
    /// Parameter derivation rejected the request.
    #[error(transparent)]
    Denoise(#[from] DenoiseError),
    /// Anything that is not the client's fault.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "internal error while serving request");
        }
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
