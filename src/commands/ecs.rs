// ABOUTME: ECS deploy command: new task definition revision for the build image, then service update.

use super::cloud_connection::connect_to_cloud;
use super::{build_tags, report_warnings};
use ci_deploy::cloud::AwsOptions;
use ci_deploy::config::EcsInputs;
use ci_deploy::diagnostics::{Diagnostics, Warning};
use ci_deploy::error::Result;
use ci_deploy::output::Output;
use ci_deploy::rollout::{RolloutTarget, ServiceRolloutClient};
use ci_deploy::types::BuildMetadata;
use serde_json::json;

pub async fn deploy_ecs(
    inputs: EcsInputs,
    metadata: &BuildMetadata,
    aws: &AwsOptions,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();
    let tags = build_tags(metadata, &mut diag);
    let image = inputs.repository.image_for(metadata.commit_id());

    output.progress(&format!(
        "Deploying {} to service {} in cluster {}",
        image, inputs.service, inputs.cluster
    ));

    let cloud = connect_to_cloud(aws, output).await;
    let client = ServiceRolloutClient::new(&cloud);

    output.progress(&format!(
        "  → Registering new revision of {}...",
        inputs.family
    ));
    let target = RolloutTarget {
        family: &inputs.family,
        cluster: &inputs.cluster,
        service: &inputs.service,
        repository: &inputs.repository,
    };
    let report = client.deploy(&target, metadata.commit_id(), &tags).await?;

    if !report.untouched_containers.is_empty() {
        diag.warn(Warning::multiple_containers(format!(
            "task definition {} has more than one container; only the first image was replaced (untouched: {})",
            report.task_definition,
            report.untouched_containers.join(", ")
        )));
    }

    report_warnings(&diag, output);
    output.success_with(
        &format!(
            "Service {} updated to task definition {}",
            inputs.service, report.task_definition
        ),
        Some(json!({
            "cluster": inputs.cluster.as_str(),
            "service": inputs.service.as_str(),
            "task_definition": report.task_definition.to_string(),
            "image": image,
        })),
    );
    Ok(())
}
