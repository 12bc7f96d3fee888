// ABOUTME: Test support utilities.
// ABOUTME: A recording in-memory control plane implementing every capability trait.

#![allow(dead_code)]

use async_trait::async_trait;
use ci_deploy::cloud::{
    CdnError, CdnOps, EcsError, FunctionCodeUpdate, FunctionError, FunctionOps,
    InvalidationBatch, ObjectHead, ObjectStore, ObjectStoreError, ObjectUpload,
    RegisterTaskDefinition, ServiceOps, ServiceUpdate, TaskDefinition, TaskDefinitionOps,
    TaskDefinitionRef,
};
use ci_deploy::sync::ContentFingerprint;
use ci_deploy::types::{BucketName, InvalidationId, ObjectKey, TagSet};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("ci_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One remote call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HeadObject {
        bucket: String,
        key: String,
    },
    PutObject {
        bucket: String,
        key: String,
        content_type: Option<String>,
        content_encoding: Option<String>,
    },
    PutObjectTagging {
        bucket: String,
        key: String,
        tags: Vec<(String, String)>,
    },
    DescribeTaskDefinition {
        family: String,
    },
    RegisterTaskDefinition {
        family: String,
    },
    UpdateService(ServiceUpdate),
    CreateInvalidation(InvalidationBatch),
    UpdateFunctionCode(FunctionCodeUpdate),
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub e_tag: String,
    pub content_type: Option<String>,
    pub tags: Vec<(String, String)>,
}

#[derive(Default)]
struct Failures {
    head: HashSet<String>,
    put: HashSet<String>,
    register: bool,
    update_service: bool,
    invalidation: bool,
    functions: HashSet<String>,
}

#[derive(Default)]
pub struct FakeCloud {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    task_definitions: Mutex<HashMap<String, TaskDefinition>>,
    revisions: Mutex<HashMap<String, i32>>,
    registrations: Mutex<Vec<RegisterTaskDefinition>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Failures>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object whose entity tag is the quoted MD5 of `body`.
    pub fn seed_object(&self, bucket: &str, key: &str, body: &[u8]) {
        let e_tag = format!("\"{}\"", ContentFingerprint::of_bytes(body).as_hex());
        self.seed_object_with_etag(bucket, key, body, &e_tag);
    }

    pub fn seed_object_with_etag(&self, bucket: &str, key: &str, body: &[u8], e_tag: &str) {
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                e_tag: e_tag.to_string(),
                content_type: None,
                tags: Vec::new(),
            },
        );
    }

    pub fn seed_task_definition(&self, definition: TaskDefinition) {
        let family = definition.family().unwrap_or_default().to_string();
        self.revisions
            .lock()
            .insert(family.clone(), definition.revision());
        self.task_definitions.lock().insert(family, definition);
    }

    pub fn fail_head(&self, key: &str) {
        self.failures.lock().head.insert(key.to_string());
    }

    pub fn fail_put(&self, key: &str) {
        self.failures.lock().put.insert(key.to_string());
    }

    pub fn fail_register(&self) {
        self.failures.lock().register = true;
    }

    pub fn fail_update_service(&self) {
        self.failures.lock().update_service = true;
    }

    pub fn fail_invalidation(&self) {
        self.failures.lock().invalidation = true;
    }

    pub fn fail_function(&self, name: &str) {
        self.failures.lock().functions.insert(name.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn registrations(&self) -> Vec<RegisterTaskDefinition> {
        self.registrations.lock().clone()
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PutObject { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn tagged_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PutObjectTagging { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn service_updates(&self) -> Vec<ServiceUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateService(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn invalidations(&self) -> Vec<InvalidationBatch> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateInvalidation(batch) => Some(batch),
                _ => None,
            })
            .collect()
    }

    pub fn function_updates(&self) -> Vec<FunctionCodeUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateFunctionCode(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ObjectStore for FakeCloud {
    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> Result<Option<ObjectHead>, ObjectStoreError> {
        self.record(Call::HeadObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if self.failures.lock().head.contains(key.as_str()) {
            return Err(ObjectStoreError::AccessDenied(key.to_string()));
        }

        Ok(self.object(bucket.as_str(), key.as_str()).map(|o| ObjectHead {
            e_tag: Some(o.e_tag),
            content_length: Some(o.body.len() as i64),
        }))
    }

    async fn put_object(&self, upload: &ObjectUpload<'_>) -> Result<(), ObjectStoreError> {
        self.record(Call::PutObject {
            bucket: upload.bucket.to_string(),
            key: upload.key.to_string(),
            content_type: upload.content_type.map(str::to_string),
            content_encoding: upload.content_encoding.map(str::to_string),
        });

        if self.failures.lock().put.contains(upload.key.as_str()) {
            return Err(ObjectStoreError::Request(format!("put {}", upload.key)));
        }

        let body = std::fs::read(upload.source).map_err(|e| ObjectStoreError::LocalFile {
            path: upload.source.to_path_buf(),
            reason: e.to_string(),
        })?;
        let e_tag = format!("\"{}\"", ContentFingerprint::of_bytes(&body).as_hex());

        self.objects.lock().insert(
            (upload.bucket.to_string(), upload.key.to_string()),
            StoredObject {
                body,
                e_tag,
                content_type: upload.content_type.map(str::to_string),
                tags: Vec::new(),
            },
        );
        Ok(())
    }

    async fn put_object_tagging(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        tags: &TagSet,
    ) -> Result<(), ObjectStoreError> {
        let tags: Vec<(String, String)> = tags
            .iter()
            .map(|t| (t.key.clone(), t.value.clone()))
            .collect();
        self.record(Call::PutObjectTagging {
            bucket: bucket.to_string(),
            key: key.to_string(),
            tags: tags.clone(),
        });

        let mut objects = self.objects.lock();
        let object = objects
            .get_mut(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| ObjectStoreError::InvalidRequest(format!("no such key {key}")))?;
        object.tags = tags;
        Ok(())
    }
}

#[async_trait]
impl TaskDefinitionOps for FakeCloud {
    async fn describe_task_definition(&self, family: &str) -> Result<TaskDefinition, EcsError> {
        self.record(Call::DescribeTaskDefinition {
            family: family.to_string(),
        });

        let name = family.split(':').next().unwrap_or(family);
        self.task_definitions
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| EcsError::TaskDefinitionNotFound(family.to_string()))
    }

    async fn register_task_definition(
        &self,
        request: &RegisterTaskDefinition,
    ) -> Result<TaskDefinitionRef, EcsError> {
        self.record(Call::RegisterTaskDefinition {
            family: request.family.clone(),
        });

        if self.failures.lock().register {
            return Err(EcsError::InvalidParameter("registration rejected".to_string()));
        }

        self.registrations.lock().push(request.clone());
        let mut revisions = self.revisions.lock();
        let revision = revisions.entry(request.family.clone()).or_insert(0);
        *revision += 1;

        Ok(TaskDefinitionRef {
            family: request.family.clone(),
            revision: *revision,
        })
    }
}

#[async_trait]
impl ServiceOps for FakeCloud {
    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), EcsError> {
        self.record(Call::UpdateService(update.clone()));

        if self.failures.lock().update_service {
            return Err(EcsError::ServiceNotFound(update.service.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CdnOps for FakeCloud {
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<InvalidationId, CdnError> {
        self.record(Call::CreateInvalidation(batch.clone()));

        if self.failures.lock().invalidation {
            return Err(CdnError::TooManyInvalidations(
                batch.distribution_id.to_string(),
            ));
        }
        Ok(InvalidationId::new(format!(
            "I{}",
            self.invalidations().len()
        )))
    }
}

#[async_trait]
impl FunctionOps for FakeCloud {
    async fn update_function_code(
        &self,
        update: &FunctionCodeUpdate,
    ) -> Result<(), FunctionError> {
        self.record(Call::UpdateFunctionCode(update.clone()));

        if self.failures.lock().functions.contains(update.function.as_str()) {
            return Err(FunctionError::NotFound(update.function.to_string()));
        }
        Ok(())
    }
}
