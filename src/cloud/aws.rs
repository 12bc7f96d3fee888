// ABOUTME: AWS SDK implementation of every control-plane capability trait.
// ABOUTME: S3 for objects, ECS for task definitions and services, CloudFront, Lambda.

use crate::cloud::traits::{
    CdnError, CdnOps, EcsError, FunctionCodeUpdate, FunctionError, FunctionOps,
    InvalidationBatch, ObjectHead, ObjectStore, ObjectStoreError, ObjectUpload,
    RegisterTaskDefinition, ServiceOps, ServiceUpdate, TaskDefinition, TaskDefinitionOps,
    TaskDefinitionRef,
};
use crate::types::{BucketName, InvalidationId, ObjectKey, TagCasing, TagSet};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::time::Duration;

/// Options for loading AWS credentials and region.
#[derive(Debug, Clone, Default)]
pub struct AwsOptions {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub operation_timeout: Option<Duration>,
}

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Error code reported by the service plus a full diagnostic chain.
fn error_parts<E, R>(e: &SdkError<E, R>) -> (Option<String>, String)
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    (
        e.code().map(str::to_string),
        DisplayErrorContext(e).to_string(),
    )
}

fn map_object_error<E, R>(e: SdkError<E, R>, key: &ObjectKey) -> ObjectStoreError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let (code, detail) = error_parts(&e);
    let message = format!("{}: {}", key, detail);
    match code.as_deref() {
        Some("AccessDenied") | Some("Forbidden") => ObjectStoreError::AccessDenied(message),
        Some("NoSuchBucket") => ObjectStoreError::NoSuchBucket(message),
        Some("InvalidTag") | Some("InvalidArgument") | Some("MalformedXML") => {
            ObjectStoreError::InvalidRequest(message)
        }
        _ => ObjectStoreError::Request(message),
    }
}

fn map_describe_error<E, R>(e: SdkError<E, R>, family: &str) -> EcsError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let (code, detail) = error_parts(&e);
    match code.as_deref() {
        // The registry reports unknown families as a client error.
        Some("ClientException") => EcsError::TaskDefinitionNotFound(format!("{family}: {detail}")),
        _ => map_ecs_code(code.as_deref(), detail),
    }
}

fn map_ecs_error<E, R>(e: SdkError<E, R>) -> EcsError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let (code, detail) = error_parts(&e);
    map_ecs_code(code.as_deref(), detail)
}

fn map_ecs_code(code: Option<&str>, detail: String) -> EcsError {
    match code {
        Some("ClusterNotFoundException") => EcsError::ClusterNotFound(detail),
        Some("ServiceNotFoundException") | Some("ServiceNotActiveException") => {
            EcsError::ServiceNotFound(detail)
        }
        Some("InvalidParameterException") => EcsError::InvalidParameter(detail),
        Some("AccessDeniedException") => EcsError::AccessDenied(detail),
        _ => EcsError::Request(detail),
    }
}

fn map_cdn_error<E, R>(e: SdkError<E, R>) -> CdnError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let (code, detail) = error_parts(&e);
    match code.as_deref() {
        Some("NoSuchDistribution") => CdnError::NoSuchDistribution(detail),
        Some("TooManyInvalidationsInProgress") => CdnError::TooManyInvalidations(detail),
        Some("InvalidArgument") | Some("BatchTooLarge") | Some("MissingBody") => {
            CdnError::InvalidBatch(detail)
        }
        Some("AccessDenied") => CdnError::AccessDenied(detail),
        _ => CdnError::Request(detail),
    }
}

fn map_function_error<E, R>(e: SdkError<E, R>, update: &FunctionCodeUpdate) -> FunctionError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let (code, detail) = error_parts(&e);
    let message = format!("{}: {}", update.function, detail);
    match code.as_deref() {
        Some("ResourceNotFoundException") => FunctionError::NotFound(message),
        Some("InvalidParameterValueException") => FunctionError::InvalidParameter(message),
        Some("ResourceConflictException") => FunctionError::Conflict(message),
        Some("AccessDeniedException") => FunctionError::AccessDenied(message),
        _ => FunctionError::Request(message),
    }
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items.to_vec())
    }
}

// =============================================================================
// AwsCloud
// =============================================================================

/// Control-plane capabilities backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct AwsCloud {
    s3: aws_sdk_s3::Client,
    ecs: aws_sdk_ecs::Client,
    cloudfront: aws_sdk_cloudfront::Client,
    lambda: aws_sdk_lambda::Client,
}

impl AwsCloud {
    /// Load shared configuration (credentials chain, region, timeouts) and
    /// build one client per service.
    pub async fn connect(options: &AwsOptions) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref profile) = options.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(ref region) = options.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }

        if let Some(timeout) = options.operation_timeout {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }

        let config = loader.load().await;
        tracing::debug!(region = ?config.region(), "loaded AWS configuration");

        Self {
            s3: aws_sdk_s3::Client::new(&config),
            ecs: aws_sdk_ecs::Client::new(&config),
            cloudfront: aws_sdk_cloudfront::Client::new(&config),
            lambda: aws_sdk_lambda::Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for AwsCloud {
    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> Result<Option<ObjectHead>, ObjectStoreError> {
        let result = self
            .s3
            .head_object()
            .bucket(bucket.as_str())
            .key(key.as_str())
            .send()
            .await;

        match result {
            Ok(output) => Ok(Some(ObjectHead {
                e_tag: output.e_tag().map(str::to_string),
                content_length: output.content_length(),
            })),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|service| service.is_not_found()) =>
            {
                Ok(None)
            }
            Err(e) => Err(map_object_error(e, key)),
        }
    }

    async fn put_object(&self, upload: &ObjectUpload<'_>) -> Result<(), ObjectStoreError> {
        let body = ByteStream::from_path(upload.source)
            .await
            .map_err(|e| ObjectStoreError::LocalFile {
                path: upload.source.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.s3
            .put_object()
            .bucket(upload.bucket.as_str())
            .key(upload.key.as_str())
            .body(body)
            .set_content_type(upload.content_type.map(str::to_string))
            .set_content_encoding(upload.content_encoding.map(str::to_string))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_object_error(e, upload.key))
    }

    async fn put_object_tagging(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        tags: &TagSet,
    ) -> Result<(), ObjectStoreError> {
        use aws_sdk_s3::types::{Tag, Tagging};

        tracing::debug!(
            %bucket,
            %key,
            tags = %tags.to_wire(TagCasing::Capitalized),
            "tagging object"
        );

        let tag_set = tags
            .iter()
            .map(|tag| Tag::builder().key(&tag.key).value(&tag.value).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ObjectStoreError::InvalidRequest(e.to_string()))?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| ObjectStoreError::InvalidRequest(e.to_string()))?;

        self.s3
            .put_object_tagging()
            .bucket(bucket.as_str())
            .key(key.as_str())
            .tagging(tagging)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_object_error(e, key))
    }
}

#[async_trait]
impl TaskDefinitionOps for AwsCloud {
    async fn describe_task_definition(&self, family: &str) -> Result<TaskDefinition, EcsError> {
        let output = self
            .ecs
            .describe_task_definition()
            .task_definition(family)
            .send()
            .await
            .map_err(|e| map_describe_error(e, family))?;

        output
            .task_definition()
            .cloned()
            .ok_or_else(|| EcsError::TaskDefinitionNotFound(family.to_string()))
    }

    async fn register_task_definition(
        &self,
        request: &RegisterTaskDefinition,
    ) -> Result<TaskDefinitionRef, EcsError> {
        use aws_sdk_ecs::types::Tag;

        let tags: Vec<Tag> = request
            .tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect();

        let output = self
            .ecs
            .register_task_definition()
            .family(&request.family)
            .set_task_role_arn(request.task_role_arn.clone())
            .set_execution_role_arn(request.execution_role_arn.clone())
            .set_network_mode(request.network_mode.clone())
            .set_container_definitions(Some(request.container_definitions.clone()))
            .set_volumes(non_empty(&request.volumes))
            .set_placement_constraints(non_empty(&request.placement_constraints))
            .set_requires_compatibilities(non_empty(&request.requires_compatibilities))
            .set_cpu(request.cpu.clone())
            .set_memory(request.memory.clone())
            .set_pid_mode(request.pid_mode.clone())
            .set_ipc_mode(request.ipc_mode.clone())
            .set_proxy_configuration(request.proxy_configuration.clone())
            .set_ephemeral_storage(request.ephemeral_storage.clone())
            .set_runtime_platform(request.runtime_platform.clone())
            .set_enable_fault_injection(request.enable_fault_injection)
            .set_tags(non_empty(&tags))
            .send()
            .await
            .map_err(map_ecs_error)?;

        let registered = output.task_definition().ok_or_else(|| {
            EcsError::Request("registration response carried no task definition".to_string())
        })?;

        Ok(TaskDefinitionRef {
            family: registered
                .family()
                .unwrap_or(request.family.as_str())
                .to_string(),
            revision: registered.revision(),
        })
    }
}

#[async_trait]
impl ServiceOps for AwsCloud {
    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), EcsError> {
        self.ecs
            .update_service()
            .cluster(update.cluster.as_str())
            .service(update.service.as_str())
            .task_definition(update.task_definition.to_string())
            .force_new_deployment(update.force_new_deployment)
            .send()
            .await
            .map(|_| ())
            .map_err(map_ecs_error)
    }
}

#[async_trait]
impl CdnOps for AwsCloud {
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<InvalidationId, CdnError> {
        use aws_sdk_cloudfront::types::{InvalidationBatch as Batch, Paths};

        let quantity = i32::try_from(batch.paths.len())
            .map_err(|_| CdnError::InvalidBatch(format!("{} paths", batch.paths.len())))?;

        let paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(batch.paths.clone()))
            .build()
            .map_err(|e| CdnError::InvalidBatch(e.to_string()))?;

        let request = Batch::builder()
            .paths(paths)
            .caller_reference(batch.caller_reference.as_str())
            .build()
            .map_err(|e| CdnError::InvalidBatch(e.to_string()))?;

        let output = self
            .cloudfront
            .create_invalidation()
            .distribution_id(batch.distribution_id.as_str())
            .invalidation_batch(request)
            .send()
            .await
            .map_err(map_cdn_error)?;

        Ok(InvalidationId::new(
            output
                .invalidation()
                .map(|invalidation| invalidation.id().to_string())
                .unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl FunctionOps for AwsCloud {
    async fn update_function_code(
        &self,
        update: &FunctionCodeUpdate,
    ) -> Result<(), FunctionError> {
        self.lambda
            .update_function_code()
            .function_name(update.function.as_str())
            .s3_bucket(update.bucket.as_str())
            .s3_key(update.key.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(|e| map_function_error(e, update))
    }
}
