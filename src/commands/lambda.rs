// ABOUTME: Lambda deploy command: upload the zip package once and update every target function.

use super::cloud_connection::connect_to_cloud;
use super::{build_tags, report_warnings};
use ci_deploy::cloud::AwsOptions;
use ci_deploy::config::PublishInputs;
use ci_deploy::diagnostics::Diagnostics;
use ci_deploy::error::Result;
use ci_deploy::output::Output;
use ci_deploy::publish::FunctionArtifactPublisher;
use ci_deploy::types::BuildMetadata;
use serde_json::json;

pub async fn deploy_lambda(
    inputs: PublishInputs,
    metadata: &BuildMetadata,
    aws: &AwsOptions,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();
    let tags = build_tags(metadata, &mut diag);

    output.progress(&format!(
        "Publishing {} to {} function(s)",
        inputs.artifact.display(),
        inputs.functions.len()
    ));

    let cloud = connect_to_cloud(aws, output).await;

    output.progress(&format!(
        "  → Uploading package to {} and updating functions...",
        inputs.bucket
    ));
    let report = FunctionArtifactPublisher::new(&cloud)
        .publish(
            &inputs.artifact,
            &inputs.bucket,
            &inputs.prefix,
            metadata.commit_id(),
            &inputs.functions,
            &tags,
        )
        .await?;

    report_warnings(&diag, output);
    let updated: Vec<&str> = report.updated.iter().map(|f| f.as_str()).collect();
    output.success_with(
        &format!(
            "Updated {} to s3://{}/{}",
            updated.join(", "),
            inputs.bucket,
            report.key
        ),
        Some(json!({
            "bucket": inputs.bucket.as_str(),
            "key": report.key.as_str(),
            "functions": updated,
        })),
    );
    Ok(())
}
