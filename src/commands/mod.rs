// ABOUTME: Command module aggregator for the ci-deploy CLI.
// ABOUTME: Shared setup: environment prefixing, settings loading, tags, and warnings.

mod cloud_connection;
mod ecs;
mod env;
mod lambda;
mod s3;

pub use ecs::deploy_ecs;
pub use env::print_environment;
pub use lambda::deploy_lambda;
pub use s3::deploy_s3;

use ci_deploy::config::{Environment, Settings};
use ci_deploy::diagnostics::{Diagnostics, Warning};
use ci_deploy::error::Result;
use ci_deploy::output::Output;
use ci_deploy::types::{BuildMetadata, TagSet};
use std::path::Path;

/// Apply the variable prefix: the flag, else `ENVVAR_PREFIX`, else `CI_BRANCH`.
pub fn resolve_environment(env: Environment, flag: Option<String>) -> Environment {
    let prefix = flag
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .or_else(|| env.value("ENVVAR_PREFIX").map(str::to_string))
        .or_else(|| env.value("CI_BRANCH").map(str::to_string));

    match prefix {
        Some(prefix) => {
            tracing::debug!(%prefix, "resolving prefixed environment variables");
            env.with_prefix(&prefix)
        }
        None => env,
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::discover(&std::env::current_dir()?),
    }
}

/// Build tags, recording a warning for every value that had to be rewritten.
fn build_tags(metadata: &BuildMetadata, diag: &mut Diagnostics) -> TagSet {
    let tags = metadata.to_tags();
    for key in tags.sanitized_keys() {
        diag.warn(Warning::tag_sanitized(format!(
            "tag {key} contained characters outside the tag grammar and was rewritten"
        )));
    }
    tags
}

fn report_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(warning);
    }
}
