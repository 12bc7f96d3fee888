// ABOUTME: Thin client over task definition registration and service updates.
// ABOUTME: Rollouts are fire-and-forget: accepted by the control plane means done.

use super::{RolloutError, mutate};
use crate::cloud::{
    RegisterTaskDefinition, ServiceOps, ServiceUpdate, TaskDefinition, TaskDefinitionOps,
    TaskDefinitionRef,
};
use crate::types::{ClusterName, CommitId, RepositoryUri, ServiceName, TagSet};

/// Where a new image should be rolled out.
#[derive(Debug, Clone)]
pub struct RolloutTarget<'a> {
    pub family: &'a str,
    pub cluster: &'a ClusterName,
    pub service: &'a ServiceName,
    pub repository: &'a RepositoryUri,
}

/// Outcome of a rollout accepted by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutReport {
    pub task_definition: TaskDefinitionRef,
    /// Containers beyond the first, which kept their previous image.
    pub untouched_containers: Vec<String>,
}

pub struct ServiceRolloutClient<'a, C> {
    cloud: &'a C,
}

impl<'a, C> ServiceRolloutClient<'a, C>
where
    C: TaskDefinitionOps + ServiceOps,
{
    pub fn new(cloud: &'a C) -> Self {
        Self { cloud }
    }

    /// Describe, mutate, register, then update the service.
    ///
    /// Nothing is registered if the described definition cannot be mutated,
    /// and the service is left alone if registration fails.
    pub async fn deploy(
        &self,
        target: &RolloutTarget<'_>,
        commit: &CommitId,
        tags: &TagSet,
    ) -> Result<RolloutReport, RolloutError> {
        let existing = self.describe(target.family).await?;
        let mutated = mutate(existing, target.repository, commit, tags)?;
        let task_definition = self.register(&mutated.request).await?;
        self.rollout(target.cluster, target.service, &task_definition)
            .await?;

        Ok(RolloutReport {
            task_definition,
            untouched_containers: mutated.untouched_containers,
        })
    }

    /// Fetch the latest revision of `family`.
    pub async fn describe(&self, family: &str) -> Result<TaskDefinition, RolloutError> {
        self.cloud
            .describe_task_definition(family)
            .await
            .map_err(|source| RolloutError::Describe {
                family: family.to_string(),
                source,
            })
    }

    /// Register a new revision; the returned reference names the assigned revision.
    pub async fn register(
        &self,
        request: &RegisterTaskDefinition,
    ) -> Result<TaskDefinitionRef, RolloutError> {
        let registered = self
            .cloud
            .register_task_definition(request)
            .await
            .map_err(|source| RolloutError::Register {
                family: request.family.clone(),
                source,
            })?;

        tracing::info!(task_definition = %registered, "registered task definition");
        Ok(registered)
    }

    /// Point `service` at `task_definition`, always forcing a new deployment.
    ///
    /// Does not wait for the deployment to reach a steady state.
    pub async fn rollout(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        task_definition: &TaskDefinitionRef,
    ) -> Result<(), RolloutError> {
        let update = ServiceUpdate {
            cluster: cluster.clone(),
            service: service.clone(),
            task_definition: task_definition.clone(),
            force_new_deployment: true,
        };

        self.cloud
            .update_service(&update)
            .await
            .map_err(|source| RolloutError::UpdateService {
                cluster: cluster.to_string(),
                service: service.to_string(),
                source,
            })?;

        tracing::info!(%cluster, %service, %task_definition, "service update accepted");
        Ok(())
    }
}
