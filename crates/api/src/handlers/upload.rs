//! Multipart reading and object replacement shared by the avatar and
//! material-document handlers.

use axum::extract::Multipart;
use verde_cloud::storage::ObjectStore;
use verde_core::storage::validate_upload_size;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file part read fully into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parts of a multipart form this API accepts.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    /// Value of the optional `kind` text field.
    pub kind: Option<String>,
}

/// Read a multipart form, enforcing the configured size limit on `file`.
///
/// Unknown fields are skipped.
pub async fn read_form(mut multipart: Multipart, max_bytes: usize) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                validate_upload_size(bytes.len(), max_bytes)?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("kind") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.kind = Some(text.trim().to_string());
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Delete an object that has just been replaced.
///
/// The new object is already recorded, so a failure here only leaves an
/// orphan behind; it is logged and never surfaced to the caller.
pub async fn remove_replaced_object(state: &AppState, bucket: &str, old_path: Option<&str>) {
    let Some(path) = old_path else {
        return;
    };
    if let Err(e) = state.storage.remove(bucket, path).await {
        tracing::warn!(bucket, path, error = %e, "Failed to remove replaced object");
    }
}

/// Pass through the result of recording a freshly uploaded object. On error
/// the upload is removed so it is not left orphaned; removal failures are
/// logged and the original error is returned.
pub async fn discard_upload_on_error<T>(
    store: &dyn ObjectStore,
    bucket: &str,
    path: &str,
    recorded: AppResult<T>,
) -> AppResult<T> {
    if recorded.is_err() {
        if let Err(e) = store.remove(bucket, path).await {
            tracing::warn!(bucket, path, error = %e, "Failed to remove unrecorded upload");
        }
    }
    recorded
}
