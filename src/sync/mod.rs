// ABOUTME: Directory sync to object storage and CDN cache invalidation.
// ABOUTME: Change detection compares local MD5 digests with remote entity tags.

pub mod content_type;
mod error;
mod fingerprint;
mod invalidation;
mod synchronizer;

pub use error::{SyncError, SyncErrorKind};
pub use fingerprint::{CHUNK_SIZE, ContentFingerprint, normalize_etag};
pub use invalidation::{
    CacheInvalidator, InvalidationError, InvalidationOutcome, MAX_PATHS_IN_PROGRESS, build_batch,
};
pub use synchronizer::{
    DirectorySynchronizer, SyncAction, SyncManifestEntry, SyncReport, collect_files,
};
