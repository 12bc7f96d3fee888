// ABOUTME: One-way directory sync into object storage with MD5/entity-tag change detection.
// ABOUTME: Absent keys are created, differing keys are overwritten, identical keys are skipped.

use super::content_type;
use super::error::{
    FingerprintSnafu, KeySnafu, OutsideRootSnafu, ProbeSnafu, SyncError, TaggingSnafu,
    UploadSnafu, WalkSnafu,
};
use super::fingerprint::{ContentFingerprint, normalize_etag};
use crate::cloud::{ObjectStore, ObjectUpload};
use crate::types::{BucketName, ObjectKey, TagSet};
use snafu::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What the synchronizer learned about one local file before deciding.
#[derive(Debug, Clone)]
pub struct SyncManifestEntry {
    pub local_path: PathBuf,
    pub relative_path: PathBuf,
    pub remote_key: ObjectKey,
    /// Computed only when a remote object exists.
    pub local_fingerprint: Option<ContentFingerprint>,
    pub remote_exists: bool,
    /// Normalized entity tag of the remote object, when reported.
    pub remote_fingerprint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Overwrite,
    Skip,
}

impl SyncManifestEntry {
    pub fn action(&self) -> SyncAction {
        if !self.remote_exists {
            return SyncAction::Create;
        }

        match (&self.local_fingerprint, &self.remote_fingerprint) {
            (Some(local), Some(remote)) if local.matches_etag(remote) => SyncAction::Skip,
            _ => SyncAction::Overwrite,
        }
    }
}

/// Outcome of a sync run. `overwritten` is a subset of `uploaded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: Vec<ObjectKey>,
    pub skipped: Vec<ObjectKey>,
    pub overwritten: Vec<ObjectKey>,
}

pub struct DirectorySynchronizer<'a, S> {
    store: &'a S,
}

impl<'a, S> DirectorySynchronizer<'a, S>
where
    S: ObjectStore,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Mirror every regular file under `local_root` to `bucket` under `prefix`.
    ///
    /// Files are visited in lexicographic order. Each upload is followed by a
    /// tagging call with `tags`. The first failure aborts the run.
    pub async fn sync(
        &self,
        local_root: &Path,
        bucket: &BucketName,
        prefix: &str,
        tags: &TagSet,
    ) -> Result<SyncReport, SyncError> {
        let files = collect_files(local_root)?;
        debug!(root = %local_root.display(), files = files.len(), "collected local files");

        let mut report = SyncReport::default();

        for local_path in files {
            let entry = self.inspect(local_root, local_path, bucket, prefix).await?;
            let action = entry.action();

            if action == SyncAction::Skip {
                info!(key = %entry.remote_key, "identical, skipping");
                report.skipped.push(entry.remote_key);
                continue;
            }

            self.upload(&entry, bucket, tags).await?;

            if action == SyncAction::Overwrite {
                report.overwritten.push(entry.remote_key.clone());
            }
            report.uploaded.push(entry.remote_key);
        }

        info!(
            uploaded = report.uploaded.len(),
            skipped = report.skipped.len(),
            overwritten = report.overwritten.len(),
            "sync complete"
        );

        Ok(report)
    }

    async fn inspect(
        &self,
        local_root: &Path,
        local_path: PathBuf,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<SyncManifestEntry, SyncError> {
        let relative_path = local_path
            .strip_prefix(local_root)
            .ok()
            .context(OutsideRootSnafu { path: &local_path })?
            .to_path_buf();

        let remote_key =
            ObjectKey::join(prefix, &relative_path).context(KeySnafu { path: &local_path })?;

        let head = self
            .store
            .head_object(bucket, &remote_key)
            .await
            .context(ProbeSnafu {
                key: remote_key.clone(),
            })?;

        let (remote_exists, remote_fingerprint, local_fingerprint) = match head {
            None => (false, None, None),
            Some(head) => {
                let local = ContentFingerprint::of_file(&local_path)
                    .await
                    .context(FingerprintSnafu { path: &local_path })?;
                let remote = head.e_tag.as_deref().map(|e| normalize_etag(e).to_string());
                (true, remote, Some(local))
            }
        };

        Ok(SyncManifestEntry {
            local_path,
            relative_path,
            remote_key,
            local_fingerprint,
            remote_exists,
            remote_fingerprint,
        })
    }

    async fn upload(
        &self,
        entry: &SyncManifestEntry,
        bucket: &BucketName,
        tags: &TagSet,
    ) -> Result<(), SyncError> {
        let headers = content_type::infer(&entry.local_path);
        let upload = ObjectUpload {
            bucket,
            key: &entry.remote_key,
            source: &entry.local_path,
            content_type: headers.content_type.as_deref(),
            content_encoding: headers.content_encoding,
        };

        info!(
            key = %entry.remote_key,
            content_type = headers.content_type.as_deref().unwrap_or("-"),
            "uploading"
        );

        self.store.put_object(&upload).await.context(UploadSnafu {
            key: entry.remote_key.clone(),
        })?;

        self.store
            .put_object_tagging(bucket, &entry.remote_key, tags)
            .await
            .context(TaggingSnafu {
                key: entry.remote_key.clone(),
            })
    }
}

/// Every regular file below `root`, sorted by path. Symlinks are not
/// traversed but a symlink to a file counts as a file.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.context(WalkSnafu { root })?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
