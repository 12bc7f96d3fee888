// ABOUTME: Sync error types with SNAFU context selectors.
// ABOUTME: Separates local file problems, remote probe failures, and upload failures.

use crate::cloud::ObjectStoreError;
use crate::types::{ObjectKey, ObjectKeyError};
use snafu::Snafu;
use std::path::PathBuf;

/// Errors that abort a directory sync run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyncError {
    #[snafu(display("failed to walk {}: {source}", root.display()))]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[snafu(display("{} is outside the source directory", path.display()))]
    OutsideRoot { path: PathBuf },

    #[snafu(display("cannot derive an object key for {}: {source}", path.display()))]
    Key {
        path: PathBuf,
        source: ObjectKeyError,
    },

    #[snafu(display("failed to probe {key}: {source}"))]
    Probe {
        key: ObjectKey,
        source: ObjectStoreError,
    },

    #[snafu(display("failed to fingerprint {}: {source}", path.display()))]
    Fingerprint {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to upload {key}: {source}"))]
    Upload {
        key: ObjectKey,
        source: ObjectStoreError,
    },

    #[snafu(display("failed to tag {key}: {source}"))]
    Tagging {
        key: ObjectKey,
        source: ObjectStoreError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    /// Reading the local tree or a local file failed.
    LocalFiles,
    /// Remote metadata could not be fetched for a reason other than absence.
    Probe,
    /// Uploading or tagging an object failed.
    Upload,
}

impl SyncError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::Walk { .. }
            | SyncError::OutsideRoot { .. }
            | SyncError::Key { .. }
            | SyncError::Fingerprint { .. } => SyncErrorKind::LocalFiles,
            SyncError::Probe { .. } => SyncErrorKind::Probe,
            SyncError::Upload { .. } | SyncError::Tagging { .. } => SyncErrorKind::Upload,
        }
    }

    /// The object key involved, if the failure concerns a remote object.
    pub fn key(&self) -> Option<&ObjectKey> {
        match self {
            SyncError::Probe { key, .. }
            | SyncError::Upload { key, .. }
            | SyncError::Tagging { key, .. } => Some(key),
            _ => None,
        }
    }
}
