// ABOUTME: Application-wide error types for ci-deploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::publish::PublishError;
use crate::rollout::RolloutError;
use crate::sync::{InvalidationError, SyncError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required setting {flag} (or environment variable {env})")]
    MissingSetting {
        flag: &'static str,
        env: &'static str,
    },

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("source directory does not exist: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("artifact does not exist: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("artifact is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error(transparent)]
    Rollout(#[from] RolloutError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Invalidation(#[from] InvalidationError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this error was raised before any remote call was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound(_)
                | Error::MissingSetting { .. }
                | Error::MissingEnvVar(_)
                | Error::InvalidSetting { .. }
                | Error::SourceDirMissing(_)
                | Error::NotADirectory(_)
                | Error::ArtifactMissing(_)
                | Error::NotAFile(_)
                | Error::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
