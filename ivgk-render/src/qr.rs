//! QR code data URLs
//!
//! The backend embeds the QR image as `data:<mime>;base64,<payload>`.
//! Decoding it lets the studio serve the image as a file download.

use crate::error::{RenderError, RenderResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::models::QrCode;

pub const DEFAULT_QR_FILE_NAME: &str = "vcard-qr.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 `data:` URL
pub fn decode_data_url(url: &str) -> RenderResult<DecodedImage> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::InvalidDataUrl("missing data: scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::InvalidDataUrl("missing payload separator".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| RenderError::InvalidDataUrl("only base64 payloads are supported".into()))?;
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(DecodedImage {
        mime: mime.to_string(),
        bytes,
    })
}

/// Suggested file name, with characters unsafe in a header removed
pub fn download_file_name(qr: &QrCode) -> String {
    let cleaned: String = qr
        .download_file_name
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect();
    if cleaned.is_empty() {
        DEFAULT_QR_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
