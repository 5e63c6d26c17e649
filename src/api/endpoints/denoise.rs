//! `POST /api/denoise`: multipart image in, base64 PNG out.

use std::io::Cursor;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::config;
use crate::denoise;

/// Extensions accepted for upload, checked against the submitted
/// filename.
const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Success envelope. Sizes are `[height, width, channels]`; channels is
/// always 3.
#[derive(Debug, Serialize)]
pub struct DenoiseResponse {
    pub status: &'static str,
    pub original_size: [u32; 3],
    pub denoised_size: [u32; 3],
    /// Base64-encoded PNG of the filtered image.
    pub denoised_image: String,
}

/// `POST /api/denoise`: run one denoising pass over an uploaded image.
///
/// Multipart fields: `file` (required), `method` (defaults to
/// `gaussian`), `strength` (defaults to 5). Unknown fields are ignored.
pub async fn denoise_image(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DenoiseResponse>, ApiError> {
    // A request that is not multipart at all carries no file part.
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::MissingFile);
    };

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut method = config::DEFAULT_METHOD.to_string();
    let mut strength_field: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_failure(e)),
        };
        match field.name() {
            Some("file") => {
                // A part without a filename is a plain form value, not
                // a file.
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(multipart_failure)?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("method") => {
                if let Ok(value) = field.text().await {
                    method = value;
                }
            }
            Some("strength") => {
                if let Ok(value) = field.text().await {
                    strength_field = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(ApiError::MissingFile);
    };
    if filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }
    if !allowed_file(&filename) {
        return Err(ApiError::InvalidFileType);
    }

    let strength = match strength_field {
        None => config::DEFAULT_STRENGTH,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value >= 1 => value,
            _ => return Err(ApiError::InvalidStrength(raw)),
        },
    };

    tracing::info!(
        filename = %filename,
        size_bytes = bytes.len(),
        method = %method,
        strength,
        "denoise request"
    );

    // Decode, filter, and re-encode off the async workers; all three
    // steps are CPU-bound.
    let response = tokio::task::spawn_blocking(move || process(&bytes, &method, strength))
        .await
        .map_err(|e| ApiError::Internal(format!("denoise task failed: {e}")))??;

    Ok(Json(response))
}

/// The synchronous decode -> dispatch -> encode sequence.
fn process(bytes: &[u8], method: &str, strength: u32) -> Result<DenoiseResponse, ApiError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| {
            tracing::warn!(error = %e, "upload failed to decode");
            ApiError::UndecodableImage
        })?
        .to_rgb8();

    let denoised = denoise::denoise(&decoded, method, strength)?;

    let png = encode_png(&denoised)
        .map_err(|e| ApiError::Internal(format!("png encoding failed: {e}")))?;

    Ok(DenoiseResponse {
        status: "success",
        original_size: shape(&decoded),
        denoised_size: shape(&denoised),
        denoised_image: STANDARD.encode(png),
    })
}

/// `[height, width, channels]`, the order the preview labels use.
fn shape(image: &RgbImage) -> [u32; 3] {
    [image.height(), image.width(), 3]
}

/// Serialize an image as PNG in memory.
fn encode_png(image: &RgbImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Extension allow-list on the last dot, case-insensitive. A name
/// without a dot has no extension and is refused.
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// A mid-stream multipart failure is either the body-size cap tripping
/// or a body the client broke off; only the former gets its own status.
fn multipart_failure(err: MultipartError) -> ApiError {
    tracing::warn!(error = %err, "multipart body could not be read");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::MissingFile
    }
}
