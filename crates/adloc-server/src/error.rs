//! Upload failures and their JSON shapes.

use adloc_core::PlatformError;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use serde::Serialize;

/// First entry of every failed upload's error list.
pub const UPLOAD_FAILED: &str = "An error occurred while loading the file.";

/// Reasons an upload is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The request is not a usable multipart form.
    #[error("invalid upload request: {0}")]
    Rejected(#[from] MultipartRejection),

    /// The form could not be read.
    #[error("could not read upload: {0}")]
    Multipart(#[from] MultipartError),

    /// No `file` field was sent.
    #[error("no file supplied")]
    NoFile,

    /// The file is not UTF-8 text.
    #[error("file is not valid UTF-8 text")]
    NotUtf8,

    /// The file content is malformed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Body of an upload response. Empty `errors` means success.
#[derive(Debug, Default, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct UploadResult {
    pub errors: Vec<String>,
}

impl UploadResult {
    pub fn failed(err: &UploadError) -> Self {
        Self {
            errors: vec![UPLOAD_FAILED.to_string(), err.to_string()],
        }
    }
}

/// Body of a rejected lookup.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct LookupError {
    pub errors: String,
}
