//! Attachment preparation.
//!
//! Mirrors what the complaint portal does before upload: accept only
//! JPEG/PNG/GIF/WebP files up to 10 MiB, shrink anything bigger than
//! 1024 px on its long edge, re-encode as JPEG and emit a base64 data URI.
//! When decoding fails the original bytes are sent as-is; the server stores
//! whatever encoded payload it is handed.

use std::{fs, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, codecs::jpeg::JpegEncoder};
use thiserror::Error;

const MAX_RAW_BYTES: usize = 10 * 1024 * 1024;
const MAX_DIMENSION: u32 = 1024;
const JPEG_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image is {0} bytes, larger than the 10 MiB limit")]
    TooLarge(usize),
    #[error("unsupported image format (JPEG, PNG, GIF or WebP required)")]
    Unsupported,
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Validate, compress and encode one attachment for submission.
pub fn prepare_image(path: &Path) -> Result<String, MediaError> {
    let bytes = fs::read(path)?;
    if bytes.len() > MAX_RAW_BYTES {
        return Err(MediaError::TooLarge(bytes.len()));
    }

    let format = image::guess_format(&bytes).map_err(|_| MediaError::Unsupported)?;
    let mime = mime_for(format).ok_or(MediaError::Unsupported)?;

    let decoded = match image::load_from_memory_with_format(&bytes, format) {
        Ok(decoded) => decoded,
        // Sniffable but undecodable: ship the original payload.
        Err(_) => return Ok(data_uri(mime, &bytes)),
    };

    let resized = if decoded.width().max(decoded.height()) > MAX_DIMENSION {
        decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        decoded
    };

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    match encoder.encode_image(&resized.to_rgb8()) {
        Ok(()) => Ok(data_uri("image/jpeg", &out)),
        Err(_) => Ok(data_uri(mime, &bytes)),
    }
}
