// ABOUTME: Derives a registrable task definition from a described one.
// ABOUTME: Drops control-plane fields, swaps the primary container image, attaches build tags.

use super::RolloutError;
use crate::cloud::{RegisterTaskDefinition, TaskDefinition};
use crate::types::{CommitId, RepositoryUri, TagCasing, TagSet};

/// Result of mutating a described task definition.
#[derive(Debug, Clone)]
pub struct MutatedTaskDefinition {
    /// The registration request for the new revision.
    pub request: RegisterTaskDefinition,
    /// Names of container definitions that kept their previous image.
    pub untouched_containers: Vec<String>,
}

/// Build the registration request for the next revision.
///
/// Only fields accepted on registration are carried over; ARN, status,
/// compatibilities, required attributes, revision and registration
/// timestamps are left behind, as are the retired inference accelerators. The first container definition's image
/// becomes `<repository>:<commit>`. Any further containers are copied
/// unchanged and reported in `untouched_containers`.
pub fn mutate(
    existing: TaskDefinition,
    repository: &RepositoryUri,
    commit: &CommitId,
    tags: &TagSet,
) -> Result<MutatedTaskDefinition, RolloutError> {
    let TaskDefinition {
        task_definition_arn,
        family,
        task_role_arn,
        execution_role_arn,
        network_mode,
        container_definitions,
        volumes,
        placement_constraints,
        requires_compatibilities,
        cpu,
        memory,
        pid_mode,
        ipc_mode,
        proxy_configuration,
        ephemeral_storage,
        runtime_platform,
        enable_fault_injection,
        ..
    } = existing;

    let described_as = task_definition_arn.unwrap_or_default();
    let family = family.ok_or_else(|| RolloutError::MissingFamily(described_as))?;

    let mut container_definitions = container_definitions.unwrap_or_default();
    let Some(primary) = container_definitions.first_mut() else {
        return Err(RolloutError::NoContainers(family));
    };
    primary.image = Some(repository.image_for(commit));

    let untouched_containers = container_definitions
        .iter()
        .skip(1)
        .map(|c| c.name.clone().unwrap_or_else(|| "<unnamed>".to_string()))
        .collect();

    tracing::debug!(
        %family,
        tags = %tags.to_wire(TagCasing::Lowercase),
        "derived task definition"
    );

    let request = RegisterTaskDefinition {
        family,
        task_role_arn,
        execution_role_arn,
        network_mode,
        container_definitions,
        volumes: volumes.unwrap_or_default(),
        placement_constraints: placement_constraints.unwrap_or_default(),
        requires_compatibilities: requires_compatibilities.unwrap_or_default(),
        cpu,
        memory,
        pid_mode,
        ipc_mode,
        proxy_configuration,
        ephemeral_storage,
        runtime_platform,
        enable_fault_injection,
        tags: tags
            .iter()
            .map(|tag| (tag.key.clone(), tag.value.clone()))
            .collect(),
    };

    Ok(MutatedTaskDefinition {
        request,
        untouched_containers,
    })
}
