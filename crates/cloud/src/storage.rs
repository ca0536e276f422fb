//! Object storage for avatars and material documents.
//!
//! [`ObjectStore`] is the seam the API talks to. [`SupabaseStorage`] speaks
//! the hosted storage REST API; [`LocalFsStore`] writes under a directory for
//! development and tests. Removing an object that is already gone succeeds
//! on both backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use verde_core::error::CoreError;
use verde_core::storage::validate_object_path;

/// Errors from an object storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed.
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Local filesystem failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bucket or object path was rejected before any I/O.
    #[error(transparent)]
    InvalidPath(#[from] CoreError),
}

/// Minimal object storage interface.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/path`. Fails if the object already exists.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Delete `bucket/path`. Succeeds when the object does not exist.
    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError>;

    /// Publicly reachable URL for `bucket/path`.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

fn check_location(bucket: &str, path: &str) -> Result<(), StorageError> {
    if bucket.is_empty() || bucket.contains('/') {
        return Err(CoreError::Validation(format!("Invalid bucket '{bucket}'")).into());
    }
    validate_object_path(path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Hosted storage (REST)
// ---------------------------------------------------------------------------

/// REST client for Supabase-compatible object storage.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStorage {
    /// * `api_key` - Service-role key when available, otherwise the anon key.
    pub fn new(client: reqwest::Client, base_url: &str, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        check_location(bucket, path)?;

        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        tracing::debug!(bucket, path, "Object uploaded");
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        check_location(bucket, path)?;

        // The batch delete endpoint answers 200 with an empty list for
        // objects that do not exist.
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{bucket}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(bucket, path, "Object already absent");
            return Ok(());
        }
        Self::ensure_success(response).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

/// Stores objects as files under `root/<bucket>/<path>`.
pub struct LocalFsStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFsStore {
    /// * `public_base_url` - Prefix the API serves `root` under, e.g. `/files`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, path: &str) -> PathBuf {
        self.root.join(bucket).join(path)
    }
}

#[async_trait]
impl ObjectStore for LocalFsStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        check_location(bucket, path)?;

        let dest = self.object_path(bucket, path);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if tokio::fs::try_exists(&dest).await? {
            return Err(StorageError::Api {
                status: 409,
                body: format!("Object {bucket}/{path} already exists"),
            });
        }
        tokio::fs::write(&dest, &bytes).await?;
        tracing::debug!(bucket, path, bytes = bytes.len(), "Object written to local store");
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        check_location(bucket, path)?;

        match tokio::fs::remove_file(self.object_path(bucket, path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.public_base_url)
    }
}
