use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use std::path::Path;

use crate::AdvisorError;

/// MIME type assumed when none can be inferred
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Represents where the bytes of an uploaded image come from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Raw image bytes
    Bytes(Vec<u8>),
    /// A `data:<mime>;base64,<payload>` URL as produced by browser file readers
    DataUrl(String),
}

/// An uploaded image together with its declared MIME type
#[derive(Debug, Clone)]
pub struct RawImage {
    pub source: ImageSource,
    pub mime_type: String,
}

impl RawImage {
    /// Image read from disk, MIME type inferred from the file extension
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let mime_type = mime_type_for_path(&path).to_string();
        RawImage {
            source: ImageSource::Path(path),
            mime_type,
        }
    }

    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        RawImage {
            source: ImageSource::Bytes(data),
            mime_type: mime_type.into(),
        }
    }

    /// Image given as a data URL, MIME type taken from its header
    pub fn from_data_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let mime_type = data_url_mime_type(&url)
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        RawImage {
            source: ImageSource::DataUrl(url),
            mime_type,
        }
    }

    /// Override the declared MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Encode an image as a base64 string without any data-URL prefix
///
/// # Errors
/// Returns `EncodingError` if the file cannot be read or a data URL has no
/// decodable base64 payload
pub async fn encode(image: &RawImage) -> Result<String, AdvisorError> {
    let encoded = match &image.source {
        ImageSource::Path(path) => {
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| AdvisorError::EncodingError(format!("{}: {}", path, e)))?;
            STANDARD.encode(data)
        }
        ImageSource::Bytes(data) => STANDARD.encode(data),
        ImageSource::DataUrl(url) => data_url_payload(url)?,
    };

    debug!(
        "Encoded {} image as {} base64 characters",
        image.mime_type,
        encoded.len()
    );

    Ok(encoded)
}

/// Return the base64 payload of a data URL, with line wrapping removed
fn data_url_payload(url: &str) -> Result<String, AdvisorError> {
    let (_, payload) = url
        .split_once(',')
        .ok_or_else(|| AdvisorError::EncodingError("data URL has no payload".to_string()))?;

    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(AdvisorError::EncodingError(
            "data URL payload is empty".to_string(),
        ));
    }

    STANDARD
        .decode(&payload)
        .map_err(|e| AdvisorError::EncodingError(format!("data URL is not base64: {}", e)))?;

    Ok(payload)
}

fn data_url_mime_type(url: &str) -> Option<&str> {
    let header = url.strip_prefix("data:")?.split(',').next()?;
    let mime = header.split(';').next()?.trim();
    (!mime.is_empty()).then_some(mime)
}

fn mime_type_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_MIME_TYPE,
    }
}
