// ABOUTME: Serverless function code deployment trait.
// ABOUTME: Points a deployed function at a code package in object storage.

use super::shared_types::FunctionCodeUpdate;
use async_trait::async_trait;

#[async_trait]
pub trait FunctionOps: Send + Sync {
    async fn update_function_code(&self, update: &FunctionCodeUpdate)
    -> Result<(), FunctionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("function not found: {0}")]
    NotFound(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("function is being updated: {0}")]
    Conflict(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request failed: {0}")]
    Request(String),
}
