// ABOUTME: Container service operations traits.
// ABOUTME: Describe and register task definitions, and roll services onto them.

use super::shared_types::{RegisterTaskDefinition, ServiceUpdate, TaskDefinition, TaskDefinitionRef};
use async_trait::async_trait;

/// Task definition registry operations.
#[async_trait]
pub trait TaskDefinitionOps: Send + Sync {
    /// Describe the latest active revision of a family (or an exact `family:revision`).
    async fn describe_task_definition(&self, family: &str) -> Result<TaskDefinition, EcsError>;

    /// Register a new revision and return its reference.
    async fn register_task_definition(
        &self,
        request: &RegisterTaskDefinition,
    ) -> Result<TaskDefinitionRef, EcsError>;
}

/// Service operations.
#[async_trait]
pub trait ServiceOps: Send + Sync {
    /// Submit a service update. Returns once the control plane accepts it.
    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), EcsError>;
}

/// Errors from container service operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("task definition not found: {0}")]
    TaskDefinitionNotFound(String),

    #[error("cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request failed: {0}")]
    Request(String),
}
