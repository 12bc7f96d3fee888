// ABOUTME: Serverless function artifact publishing.
// ABOUTME: One upload and one tagging call, then one code update per target function.

mod error;
mod publisher;

pub use error::{PublishError, PublishErrorKind};
pub use publisher::{FunctionArtifactPublisher, PublishReport, artifact_key};
