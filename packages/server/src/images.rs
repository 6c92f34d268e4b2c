//! # Image Ingestion
//!
//! Turns operator input into a public image URL, either by checking a pasted link or by
//! storing an uploaded file.
//!
//! | Input | Steps | Failure |
//! |-------|-------|---------|
//! | URL | share-link rewrite, `HEAD` probe (2xx and `Content-Type: image/*`) | `InvalidImage` |
//! | File | size then MIME check, store as `<entity>-<millis>.<ext>` in the bucket | `FileTooLarge`, `UnsupportedType`, `Upload` |

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::CONTENT_TYPE;
use store::images::{is_image_content_type, object_name, validate_upload, Bucket};
use store::urls::rewrite_share_link;
use store::ValidationError;

use crate::error::IngestError;

/// Publicly readable object storage.
pub trait ObjectStorage {
    /// Store `bytes` as `name` in `bucket` and return the object's public URL.
    fn put(
        &self,
        bucket: Bucket,
        name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, IngestError>>;
}

/// Buckets as directories under `root`, served at `public_base`.
#[derive(Clone, Debug)]
pub struct FsObjectStorage {
    root: PathBuf,
    public_base: String,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, bucket: Bucket, name: &str) -> String {
        format!("{}/{}/{}", self.public_base, bucket.as_str(), name)
    }
}

impl ObjectStorage for FsObjectStorage {
    async fn put(&self, bucket: Bucket, name: &str, bytes: Vec<u8>) -> Result<String, IngestError> {
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(IngestError::Upload(format!("invalid object name `{name}`")));
        }
        let dir = self.root.join(bucket.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), bytes).await?;
        Ok(self.public_url(bucket, name))
    }
}

#[derive(Clone, Debug)]
pub struct ImageIngestor<S> {
    storage: S,
    http: reqwest::Client,
}

impl<S: ObjectStorage> ImageIngestor<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            http: reqwest::Client::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rewrite a pasted link if it is a known share page, then check it serves an image.
    pub async fn resolve_url(&self, input: &str) -> Result<String, IngestError> {
        let url = rewrite_share_link(input);
        if url.is_empty() {
            return Err(invalid("no URL given"));
        }

        let response = self.http.head(&url).send().await.map_err(|err| {
            tracing::warn!(%url, error = %err, "image probe failed");
            invalid("the URL could not be reached")
        })?;

        if !response.status().is_success() {
            return Err(invalid(format!("the URL answered {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !is_image_content_type(content_type) {
            return Err(invalid("the URL does not point to an image"));
        }

        Ok(url)
    }

    /// Validate and store an uploaded file; nothing is written when validation fails.
    pub async fn upload(
        &self,
        bucket: Bucket,
        entity: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, IngestError> {
        let kind = validate_upload(bytes.len() as u64, mime)?;
        let name = object_name(entity, now_millis(), file_name, kind);

        let url = self.storage.put(bucket, &name, bytes).await.map_err(|err| {
            tracing::error!(bucket = bucket.as_str(), %name, error = %err, "image upload failed");
            err
        })?;
        tracing::info!(bucket = bucket.as_str(), %name, "image stored");
        Ok(url)
    }
}

fn invalid(reason: impl Into<String>) -> IngestError {
    IngestError::Validation(ValidationError::InvalidImage {
        reason: reason.into(),
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
