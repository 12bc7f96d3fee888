// ABOUTME: Validated domain types and type-safe resource identifiers.
// ABOUTME: Build metadata, commit ids, repository URIs, object keys, function names.

mod build_metadata;
mod commit_id;
mod function_name;
mod id;
mod object_key;
mod repository_uri;

pub use build_metadata::{
    BuildMetadata, MAX_TAG_VALUE_LEN, TAG_BRANCH, TAG_BUILD_NUMBER, TAG_BUILD_URL, TAG_COMMIT_ID,
    TAG_COMMITTER_EMAIL, TAG_COMMITTER_NAME, TAG_COMMITTER_USERNAME, TAG_MESSAGE, Tag, TagCasing,
    TagSet, sanitize_tag_value,
};
pub use commit_id::{CommitId, CommitIdError};
pub use function_name::{FunctionName, FunctionNameError};
pub use id::{BucketName, ClusterName, DistributionId, Id, InvalidationId, ServiceName};
pub use object_key::{ObjectKey, ObjectKeyError};
pub use repository_uri::{RepositoryUri, RepositoryUriError};
