// ABOUTME: S3 deploy command: directory sync followed by CDN invalidation of overwritten keys.

use super::cloud_connection::connect_to_cloud;
use super::{build_tags, report_warnings};
use ci_deploy::cloud::AwsOptions;
use ci_deploy::config::SyncInputs;
use ci_deploy::diagnostics::{Diagnostics, Warning};
use ci_deploy::error::Result;
use ci_deploy::output::Output;
use ci_deploy::sync::{
    CacheInvalidator, DirectorySynchronizer, InvalidationOutcome, MAX_PATHS_IN_PROGRESS,
};
use ci_deploy::types::{BuildMetadata, ObjectKey};
use serde_json::json;

pub async fn deploy_s3(
    inputs: SyncInputs,
    metadata: &BuildMetadata,
    aws: &AwsOptions,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();
    let tags = build_tags(metadata, &mut diag);

    output.progress(&format!(
        "Syncing {} to s3://{}/{}",
        inputs.source_dir.display(),
        inputs.bucket,
        inputs.prefix
    ));

    let cloud = connect_to_cloud(aws, output).await;

    output.progress("  → Comparing and uploading files...");
    let report = DirectorySynchronizer::new(&cloud)
        .sync(&inputs.source_dir, &inputs.bucket, &inputs.prefix, &tags)
        .await?;
    output.progress(&format!(
        "  → {} uploaded ({} overwritten), {} unchanged",
        report.uploaded.len(),
        report.overwritten.len(),
        report.skipped.len()
    ));

    if inputs.distribution_id.is_some() && report.overwritten.len() > MAX_PATHS_IN_PROGRESS {
        diag.warn(Warning::invalidation_limit(format!(
            "invalidating {} paths exceeds the {} paths CloudFront processes at once",
            report.overwritten.len(),
            MAX_PATHS_IN_PROGRESS
        )));
    }

    let outcome = CacheInvalidator::new(&cloud)
        .invalidate(inputs.distribution_id.as_ref(), &report.overwritten)
        .await?;

    let invalidation = match &outcome {
        InvalidationOutcome::NoDistribution => {
            output.progress("  → No CloudFront distribution configured");
            None
        }
        InvalidationOutcome::NothingToInvalidate => {
            output.progress("  → No CloudFront objects to invalidate");
            None
        }
        InvalidationOutcome::Submitted { id, batch } => {
            output.progress(&format!(
                "  → Invalidating {} paths in distribution {} (caller reference {})",
                batch.paths.len(),
                batch.distribution_id,
                batch.caller_reference
            ));
            Some(id.to_string())
        }
    };

    report_warnings(&diag, output);
    output.success_with(
        &format!(
            "Synced {} files to {} ({} unchanged)",
            report.uploaded.len(),
            inputs.bucket,
            report.skipped.len()
        ),
        Some(json!({
            "bucket": inputs.bucket.as_str(),
            "uploaded": keys(&report.uploaded),
            "skipped": keys(&report.skipped),
            "overwritten": keys(&report.overwritten),
            "invalidation": invalidation,
        })),
    );
    Ok(())
}

fn keys(keys: &[ObjectKey]) -> Vec<&str> {
    keys.iter().map(ObjectKey::as_str).collect()
}
