// ABOUTME: Errors raised while publishing a function artifact.

use crate::cloud::{FunctionError, ObjectStoreError};
use crate::types::{FunctionName, ObjectKey, ObjectKeyError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("artifact path has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    #[error("cannot derive an object key for the artifact: {0}")]
    Key(#[from] ObjectKeyError),

    #[error("failed to upload {key}: {source}")]
    Upload {
        key: ObjectKey,
        #[source]
        source: ObjectStoreError,
    },

    #[error("failed to tag {key}: {source}")]
    Tagging {
        key: ObjectKey,
        #[source]
        source: ObjectStoreError,
    },

    #[error("function updates failed for {key}: {}", describe(.failures))]
    FunctionUpdates {
        key: ObjectKey,
        updated: Vec<FunctionName>,
        failures: Vec<(FunctionName, FunctionError)>,
    },
}

fn describe(failures: &[(FunctionName, FunctionError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// The artifact could not be mapped to an object key.
    Artifact,
    /// Upload or tagging failed; no function was touched.
    Upload,
    /// The artifact was uploaded but at least one function update failed.
    FunctionUpdate,
}

impl PublishError {
    pub fn kind(&self) -> PublishErrorKind {
        match self {
            PublishError::NoFileName(_) | PublishError::Key(_) => PublishErrorKind::Artifact,
            PublishError::Upload { .. } | PublishError::Tagging { .. } => PublishErrorKind::Upload,
            PublishError::FunctionUpdates { .. } => PublishErrorKind::FunctionUpdate,
        }
    }
}
