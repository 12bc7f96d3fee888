// ABOUTME: Configuration for ci-deploy: environment snapshot, settings file, input resolution.
// ABOUTME: Flags win over the environment, which wins over ci-deploy.yml, which wins over defaults.

mod env_value;
mod environment;
mod inputs;

pub use env_value::EnvValue;
pub use environment::{Environment, REDACTED, is_secret};
pub use inputs::{
    AwsArgs, BuildArgs, DEFAULT_SOURCE_DIR, EcsArgs, EcsInputs, PublishArgs, PublishInputs,
    Resolver, SyncArgs, SyncInputs,
};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "ci-deploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "ci-deploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ci-deploy/config.yml";

/// Optional defaults loaded from a settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub aws: AwsSettings,

    #[serde(default)]
    pub ecs: EcsSettings,

    #[serde(default)]
    pub s3: S3Settings,

    #[serde(default)]
    pub lambda: LambdaSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsSettings {
    #[serde(default)]
    pub profile: Option<EnvValue>,

    #[serde(default)]
    pub region: Option<EnvValue>,

    #[serde(default, with = "humantime_serde")]
    pub operation_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EcsSettings {
    #[serde(default)]
    pub task_definition_family: Option<EnvValue>,

    #[serde(default)]
    pub cluster: Option<EnvValue>,

    #[serde(default)]
    pub repository_uri: Option<EnvValue>,

    #[serde(default)]
    pub service: Option<EnvValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Settings {
    #[serde(default)]
    pub bucket: Option<EnvValue>,

    #[serde(default)]
    pub source_dir: Option<EnvValue>,

    #[serde(default)]
    pub prefix: Option<EnvValue>,

    #[serde(default)]
    pub cloudfront_distribution_id: Option<EnvValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LambdaSettings {
    #[serde(default)]
    pub functions: Vec<EnvValue>,

    #[serde(default)]
    pub path_to_zip: Option<EnvValue>,

    #[serde(default)]
    pub bucket: Option<EnvValue>,

    #[serde(default)]
    pub prefix: Option<EnvValue>,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, or defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings file");
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }
}
