// ABOUTME: CDN cache invalidation trait.

use super::shared_types::InvalidationBatch;
use crate::types::InvalidationId;
use async_trait::async_trait;

#[async_trait]
pub trait CdnOps: Send + Sync {
    /// Submit one invalidation batch and return the id assigned to it.
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<InvalidationId, CdnError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CdnError {
    #[error("distribution not found: {0}")]
    NoSuchDistribution(String),

    #[error("too many invalidations in progress: {0}")]
    TooManyInvalidations(String),

    #[error("invalid invalidation batch: {0}")]
    InvalidBatch(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request failed: {0}")]
    Request(String),
}
