//! Error types for the renderer

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Renderer error types
///
/// Template text is never validated, so malformed markup, CSS or JS does
/// not produce an error; only data serialization and QR decoding can fail.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Card data or metadata could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Not a `data:<mime>;base64,<payload>` URL
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Serialize(e) => AppError::render_failed(e.to_string()),
            RenderError::InvalidDataUrl(msg) => AppError::invalid_data_url(msg),
            RenderError::Base64(e) => AppError::with_message(ErrorCode::InvalidDataUrl, e.to_string()),
        }
    }
}
