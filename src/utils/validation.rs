// Upload validation

use crate::config::UploadConfig;
use crate::models::FileUpload;
use crate::types::{AppError, AppResult};

/// Content type to store an upload under.
///
/// The multipart part's declared type wins; otherwise it is guessed from
/// the file extension.
pub fn resolve_content_type(filename: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim).filter(|t| !t.is_empty()) {
        Some(declared) => declared.to_string(),
        None => mime_guess::from_path(filename)
            .first_or(mime::APPLICATION_OCTET_STREAM)
            .essence_str()
            .to_string(),
    }
}

/// The key is the file name exactly as sent; blank names are rejected.
pub fn validate_file_name(filename: Option<&str>) -> AppResult<String> {
    match filename {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(AppError::InvalidRequest("Uploaded file must have a file name.".to_string())),
    }
}

pub fn validate_file_type(upload: &FileUpload, config: &UploadConfig) -> AppResult<()> {
    if config.allowed_content_types.is_empty() {
        return Ok(());
    }

    let essence = upload
        .content_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str().to_lowercase())
        .unwrap_or_else(|_| upload.content_type.to_lowercase());

    if config.allowed_content_types.iter().any(|allowed| *allowed == essence) {
        Ok(())
    } else {
        Err(AppError::InvalidRequest("Unsupported file type.".to_string()))
    }
}

pub fn validate_file_size(upload: &FileUpload, config: &UploadConfig) -> AppResult<()> {
    if upload.data.len() > config.max_file_size {
        return Err(size_limit_error(config.max_file_size));
    }
    Ok(())
}

pub fn validate_upload(upload: &FileUpload, config: &UploadConfig) -> AppResult<()> {
    validate_file_type(upload, config)?;
    validate_file_size(upload, config)
}

pub fn size_limit_error(max_file_size: usize) -> AppError {
    AppError::InvalidRequest(format!(
        "File size exceeds the maximum limit of {}.",
        format_size(max_file_size)
    ))
}

fn format_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    const KB: usize = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}
