use std::sync::Arc;

use crate::config::UploadConfig;
use crate::storage::ObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub upload: UploadConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, upload: UploadConfig) -> Self {
        Self { store, upload }
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

/// Body of every non-2xx response.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub bucket: String,
}

/// A file pulled out of a multipart upload, before it reaches storage.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub data: bytes::Bytes,
}
