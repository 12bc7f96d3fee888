// ABOUTME: CDN cache invalidation for keys that were overwritten during a sync.
// ABOUTME: Builds one batch per run with a unique caller reference.

use crate::cloud::{CallerReference, CdnError, CdnOps, InvalidationBatch};
use crate::types::{DistributionId, InvalidationId, ObjectKey};
use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// CloudFront rejects batches once this many wildcard-free paths are in flight.
pub const MAX_PATHS_IN_PROGRESS: usize = 3000;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
#[error("failed to invalidate {paths} paths in distribution {distribution}: {source}")]
pub struct InvalidationError {
    pub distribution: DistributionId,
    pub paths: usize,
    #[source]
    pub source: CdnError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationOutcome {
    /// No distribution was configured.
    NoDistribution,
    /// Nothing was overwritten, so nothing was sent.
    NothingToInvalidate,
    Submitted {
        id: InvalidationId,
        batch: InvalidationBatch,
    },
}

impl CallerReference {
    /// A reference unique per call: UTC timestamp, host, process, sequence.
    pub fn generate() -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
        let host = gethostname::gethostname();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self::new(format!(
            "{timestamp}-{}-{}-{sequence}",
            host.to_string_lossy(),
            std::process::id()
        ))
    }
}

/// CDN paths for `keys`, first occurrence wins.
pub fn build_batch(
    distribution_id: &DistributionId,
    keys: &[ObjectKey],
    caller_reference: CallerReference,
) -> InvalidationBatch {
    let mut seen = HashSet::new();
    let paths = keys
        .iter()
        .map(ObjectKey::cdn_path)
        .filter(|path| seen.insert(path.clone()))
        .collect();
    InvalidationBatch {
        distribution_id: distribution_id.clone(),
        paths,
        caller_reference,
    }
}

pub struct CacheInvalidator<'a, C> {
    cdn: &'a C,
}

impl<'a, C> CacheInvalidator<'a, C>
where
    C: CdnOps,
{
    pub fn new(cdn: &'a C) -> Self {
        Self { cdn }
    }

    pub async fn invalidate(
        &self,
        distribution_id: Option<&DistributionId>,
        overwritten: &[ObjectKey],
    ) -> Result<InvalidationOutcome, InvalidationError> {
        let Some(distribution_id) = distribution_id else {
            return Ok(InvalidationOutcome::NoDistribution);
        };
        if overwritten.is_empty() {
            return Ok(InvalidationOutcome::NothingToInvalidate);
        }

        let batch = build_batch(distribution_id, overwritten, CallerReference::generate());
        info!(
            distribution = %distribution_id,
            paths = batch.paths.len(),
            caller_reference = %batch.caller_reference,
            "creating invalidation"
        );

        let id = self
            .cdn
            .create_invalidation(&batch)
            .await
            .map_err(|source| InvalidationError {
                distribution: distribution_id.clone(),
                paths: batch.paths.len(),
                source,
            })?;

        info!(invalidation = %id, "invalidation submitted");
        Ok(InvalidationOutcome::Submitted { id, batch })
    }
}
