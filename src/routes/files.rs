//! File endpoints
//!
//! - `POST /upload/` - store a multipart `file` under its file name
//! - `GET /files/` - list every key in the bucket
//! - `GET /files/{file_name}` - stream an object back as raw bytes

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::BytesMut;
use tracing::{error, info, warn};

use crate::config::UploadConfig;
use crate::models::{AppState, FileListResponse, FileUpload, UploadResponse};
use crate::storage::StorageError;
use crate::types::{AppError, AppResult};
use crate::utils::validation::{
    resolve_content_type, size_limit_error, validate_file_name, validate_upload,
};

/// Name of the multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

/// Room for multipart boundaries and part headers on top of the payload.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.upload.max_file_size.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/upload", post(upload_file))
        .route("/upload/", post(upload_file))
        .route("/files", get(list_files))
        .route("/files/", get(list_files))
        .route("/files/{file_name}", get(get_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "Rejected non-multipart upload");
        AppError::InvalidRequest("Request must be multipart/form-data with a `file` field.".to_string())
    })?;

    let upload = read_file_field(&mut multipart, &state.upload).await?;
    validate_upload(&upload, &state.upload).inspect_err(|e| warn!("Validation error: {}", e))?;

    let size = upload.data.len();
    let stored = state
        .store
        .put(&upload.filename, upload.data, &upload.content_type)
        .await
        .inspect_err(|e| error!(file_name = %upload.filename, "Failed to upload file: {}", e))?;

    info!(file_name = %stored.key, size, "File uploaded successfully");
    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_url: stored.location,
    }))
}

/// Pull the `file` part out of the form, ignoring any other fields.
///
/// The payload is read chunk by chunk so an oversize upload is rejected as
/// soon as it crosses the limit.
async fn read_file_field(multipart: &mut Multipart, config: &UploadConfig) -> AppResult<FileUpload> {
    while let Some(mut field) = multipart.next_field().await.map_err(malformed_upload)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = validate_file_name(field.file_name())?;
        let content_type = resolve_content_type(&filename, field.content_type());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                size_limit_error(config.max_file_size)
            } else {
                malformed_upload(e)
            }
        })? {
            if data.len() + chunk.len() > config.max_file_size {
                return Err(size_limit_error(config.max_file_size));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(FileUpload {
            filename,
            content_type,
            data: data.freeze(),
        });
    }

    Err(AppError::InvalidRequest("No file provided.".to_string()))
}

fn malformed_upload(err: axum::extract::multipart::MultipartError) -> AppError {
    warn!(error = %err, "Malformed multipart body");
    AppError::InvalidRequest("Malformed multipart upload.".to_string())
}

async fn list_files(State(state): State<AppState>) -> AppResult<Json<FileListResponse>> {
    let files = state
        .store
        .list()
        .await
        .inspect_err(|e| error!("Failed to list files: {}", e))?;

    info!(count = files.len(), "Files listed successfully");
    Ok(Json(FileListResponse { files }))
}

async fn get_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<Response> {
    match state.store.get(&file_name).await {
        Ok(content) => {
            info!(file_name = %file_name, size = content.len(), "File retrieved successfully");
            Ok((
                [(header::CONTENT_TYPE, "application/octet-stream")],
                content,
            )
                .into_response())
        }
        Err(e) => {
            match &e {
                StorageError::NotFound(_) => warn!(file_name = %file_name, "File not found"),
                _ => error!(file_name = %file_name, "Failed to retrieve file: {}", e),
            }
            Err(e.into())
        }
    }
}
