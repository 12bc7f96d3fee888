// ABOUTME: Uploads a function code package once and points every target function at it.
// ABOUTME: Always re-uploads; the key is suffixed with the commit id.

use super::error::PublishError;
use crate::cloud::{FunctionCodeUpdate, FunctionOps, ObjectStore, ObjectUpload};
use crate::sync::content_type;
use crate::types::{BucketName, CommitId, FunctionName, ObjectKey, TagSet};
use nonempty::NonEmpty;
use std::path::Path;
use tracing::{info, warn};

/// Functions that now run the uploaded package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub key: ObjectKey,
    pub updated: Vec<FunctionName>,
}

/// `<prefix>/<artifact file name>.<commit id>`
pub fn artifact_key(
    prefix: &str,
    artifact: &Path,
    commit_id: &CommitId,
) -> Result<ObjectKey, PublishError> {
    let file_name = artifact
        .file_name()
        .ok_or_else(|| PublishError::NoFileName(artifact.to_path_buf()))?;

    let mut versioned = file_name.to_os_string();
    versioned.push(".");
    versioned.push(commit_id.as_str());

    Ok(ObjectKey::join(prefix, Path::new(&versioned))?)
}

pub struct FunctionArtifactPublisher<'a, C> {
    cloud: &'a C,
}

impl<'a, C> FunctionArtifactPublisher<'a, C>
where
    C: ObjectStore + FunctionOps,
{
    pub fn new(cloud: &'a C) -> Self {
        Self { cloud }
    }

    /// Upload `artifact`, tag it, then update every target.
    ///
    /// A failed update does not stop the remaining targets; all failures are
    /// reported together once every target was attempted.
    pub async fn publish(
        &self,
        artifact: &Path,
        bucket: &BucketName,
        prefix: &str,
        commit_id: &CommitId,
        targets: &NonEmpty<FunctionName>,
        tags: &TagSet,
    ) -> Result<PublishReport, PublishError> {
        let key = artifact_key(prefix, artifact, commit_id)?;
        let headers = content_type::infer(artifact);

        info!(bucket = %bucket, key = %key, "uploading function package");
        let upload = ObjectUpload {
            bucket,
            key: &key,
            source: artifact,
            content_type: headers.content_type.as_deref(),
            content_encoding: headers.content_encoding,
        };
        self.cloud
            .put_object(&upload)
            .await
            .map_err(|source| PublishError::Upload {
                key: key.clone(),
                source,
            })?;

        self.cloud
            .put_object_tagging(bucket, &key, tags)
            .await
            .map_err(|source| PublishError::Tagging {
                key: key.clone(),
                source,
            })?;

        let mut updated = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();

        for function in targets.iter() {
            let update = FunctionCodeUpdate {
                function: function.clone(),
                bucket: bucket.clone(),
                key: key.clone(),
            };
            match self.cloud.update_function_code(&update).await {
                Ok(()) => {
                    info!(function = %function, key = %key, "function updated");
                    updated.push(function.clone());
                }
                Err(e) => {
                    warn!(function = %function, error = %e, "function update failed");
                    failures.push((function.clone(), e));
                }
            }
        }

        if failures.is_empty() {
            Ok(PublishReport { key, updated })
        } else {
            Err(PublishError::FunctionUpdates {
                key,
                updated,
                failures,
            })
        }
    }
}
