// ABOUTME: Typed request and response structures shared by the capability traits.
// ABOUTME: One explicit structure per remote operation instead of loose key/value maps.

use crate::types::{
    BucketName, ClusterName, DistributionId, FunctionName, ObjectKey, ServiceName,
};
use aws_sdk_ecs::types::{
    Compatibility, ContainerDefinition, EphemeralStorage, IpcMode, NetworkMode, PidMode,
    ProxyConfiguration, RuntimePlatform, TaskDefinitionPlacementConstraint, Volume,
};
use std::fmt;
use std::path::Path;

/// The control plane's description of a registered task definition.
pub use aws_sdk_ecs::types::TaskDefinition;

/// Metadata of an existing remote object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    /// Entity tag as reported by the store, quotes included.
    pub e_tag: Option<String>,
    /// Object size in bytes.
    pub content_length: Option<i64>,
}

/// A single-object upload from a local file.
#[derive(Debug, Clone, Copy)]
pub struct ObjectUpload<'a> {
    pub bucket: &'a BucketName,
    pub key: &'a ObjectKey,
    pub source: &'a Path,
    pub content_type: Option<&'a str>,
    pub content_encoding: Option<&'a str>,
}

/// Registration request for a new task definition revision.
///
/// Only fields accepted on registration exist here; identity and status
/// fields assigned by the control plane cannot be expressed.
#[derive(Debug, Clone, Default)]
pub struct RegisterTaskDefinition {
    pub family: String,
    pub task_role_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub network_mode: Option<NetworkMode>,
    pub container_definitions: Vec<ContainerDefinition>,
    pub volumes: Vec<Volume>,
    pub placement_constraints: Vec<TaskDefinitionPlacementConstraint>,
    pub requires_compatibilities: Vec<Compatibility>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub pid_mode: Option<PidMode>,
    pub ipc_mode: Option<IpcMode>,
    pub proxy_configuration: Option<ProxyConfiguration>,
    pub ephemeral_storage: Option<EphemeralStorage>,
    pub runtime_platform: Option<RuntimePlatform>,
    pub enable_fault_injection: Option<bool>,
    pub tags: Vec<(String, String)>,
}

/// A deployable `family:revision` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinitionRef {
    pub family: String,
    pub revision: i32,
}

impl fmt::Display for TaskDefinitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.revision)
    }
}

/// Point a service at a task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUpdate {
    pub cluster: ClusterName,
    pub service: ServiceName,
    pub task_definition: TaskDefinitionRef,
    pub force_new_deployment: bool,
}

/// Client token that makes an invalidation request distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerReference(String);

impl CallerReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cache invalidation covering every listed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationBatch {
    pub distribution_id: DistributionId,
    pub paths: Vec<String>,
    pub caller_reference: CallerReference,
}

/// Point a function at a code package stored in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCodeUpdate {
    pub function: FunctionName,
    pub bucket: BucketName,
    pub key: ObjectKey,
}
