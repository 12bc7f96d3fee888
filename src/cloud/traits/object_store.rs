// ABOUTME: Object storage operations trait.
// ABOUTME: Probe object metadata, upload files, and tag objects.

use super::shared_types::{ObjectHead, ObjectUpload};
use crate::types::{BucketName, ObjectKey, TagSet};
use async_trait::async_trait;
use std::path::PathBuf;

/// Object storage operations: probe, upload, tag.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch object metadata. `Ok(None)` means the object does not exist;
    /// every other failure is an error.
    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> Result<Option<ObjectHead>, ObjectStoreError>;

    /// Upload a local file as a single object.
    async fn put_object(&self, upload: &ObjectUpload<'_>) -> Result<(), ObjectStoreError>;

    /// Replace the tag set of an object.
    async fn put_object_tagging(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        tags: &TagSet,
    ) -> Result<(), ObjectStoreError>;
}

/// Errors from object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("bucket not found: {0}")]
    NoSuchBucket(String),

    #[error("failed to read {}: {reason}", path.display())]
    LocalFile { path: PathBuf, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request failed: {0}")]
    Request(String),
}
