// ABOUTME: Error types for task definition registration and service rollout.
// ABOUTME: Every variant is fatal; nothing is retried or rolled back.

use crate::cloud::EcsError;

/// Errors that can occur while deriving, registering, or rolling out a task definition.
#[derive(Debug, thiserror::Error)]
pub enum RolloutError {
    /// The source task definition could not be described.
    #[error("failed to describe task definition {family}: {source}")]
    Describe { family: String, source: EcsError },

    /// The described document has no family name.
    #[error("task definition {0} was described without a family")]
    MissingFamily(String),

    /// The described document has nothing to put the new image into.
    #[error("task definition {0} has no container definitions")]
    NoContainers(String),

    /// Registration of the new revision was rejected.
    #[error("failed to register a new revision of {family}: {source}")]
    Register { family: String, source: EcsError },

    /// The service update was rejected.
    #[error("failed to update service {service} in cluster {cluster}: {source}")]
    UpdateService {
        cluster: String,
        service: String,
        source: EcsError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutErrorKind {
    /// The task definition family does not exist.
    NotFound,
    /// The described document cannot be turned into a registration.
    InvalidDocument,
    /// The control plane rejected the new revision.
    Registration,
    /// The control plane rejected the service update.
    ServiceUpdate,
}

impl RolloutError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RolloutErrorKind {
        match self {
            RolloutError::Describe {
                source: EcsError::TaskDefinitionNotFound(_),
                ..
            } => RolloutErrorKind::NotFound,
            RolloutError::Describe { .. }
            | RolloutError::MissingFamily(_)
            | RolloutError::NoContainers(_) => RolloutErrorKind::InvalidDocument,
            RolloutError::Register { .. } => RolloutErrorKind::Registration,
            RolloutError::UpdateService { .. } => RolloutErrorKind::ServiceUpdate,
        }
    }
}
