//! File uploads (order attachments, reference images).
//!
//! Validation happens before any network call: a wrong file type or an
//! oversize file is rejected locally as [`ApiError::Validation`]. The
//! backend's upload response has drifted across versions, so the body is
//! decoded as an explicit union of the known shapes and matched exhaustively.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::error::{ApiError, Result};

/// Upload size cap, matching the backend's limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted content types: the common image formats, PDF, Word, plain text.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Known upload response shapes, oldest last.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadBody {
    /// `{ "url": "..." }` (current).
    Object { url: String },
    /// A bare URL string (oldest endpoints).
    Text(String),
}

/// Client for the upload endpoint.
#[derive(Clone)]
pub struct UploadApi {
    api: ApiClient,
}

impl UploadApi {
    /// Create an upload client sharing the given transport.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload a file and return its served URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a disallowed content type or an
    /// oversize file, before any network traffic; otherwise the transport or
    /// backend error.
    pub async fn upload(&self, file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<String> {
        validate(mime_type, bytes.len())?;

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| ApiError::Validation(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);

        let body: UploadBody = self.api.post_multipart("/uploads", form).await?;
        let url = match body {
            UploadBody::Object { url } | UploadBody::Text(url) => url,
        };
        tracing::debug!(%url, "upload complete");
        Ok(url)
    }
}

fn validate(mime_type: &str, size: usize) -> Result<()> {
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(ApiError::Validation(format!(
            "unsupported file type: {mime_type}"
        )));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(format!(
            "file too large: {size} bytes (limit {MAX_UPLOAD_BYTES})"
        )));
    }
    Ok(())
}
