// ABOUTME: Command inputs and their resolution from flags, environment, and settings file.
// ABOUTME: Every configuration error surfaces here, before any remote client exists.

use super::{EnvValue, Environment, Settings};
use crate::cloud::AwsOptions;
use crate::error::{Error, Result};
use crate::types::{
    BucketName, BuildMetadata, ClusterName, CommitId, DistributionId, FunctionName,
    RepositoryUri, ServiceName,
};
use clap::Args;
use nonempty::NonEmpty;
use std::path::PathBuf;

/// Default local directory synced to the bucket.
pub const DEFAULT_SOURCE_DIR: &str = "/artifacts/";

/// CI build metadata flags.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Commit being deployed [env: CI_COMMIT_ID]
    #[arg(long)]
    pub ci_commit_id: Option<String>,

    /// Commit message [env: CI_COMMIT_MESSAGE]
    #[arg(long)]
    pub ci_message: Option<String>,

    /// Branch name [env: CI_BRANCH]
    #[arg(long)]
    pub ci_branch: Option<String>,

    /// Build number [env: CI_BUILD_ID]
    #[arg(long)]
    pub ci_build_number: Option<String>,

    /// Link to the build [env: CI_BUILD_URL]
    #[arg(long)]
    pub ci_build_url: Option<String>,

    /// Committer email [env: CI_COMMITTER_EMAIL]
    #[arg(long)]
    pub ci_committer_email: Option<String>,

    /// Committer username [env: CI_COMMITTER_USERNAME]
    #[arg(long)]
    pub ci_committer_username: Option<String>,

    /// Committer display name [env: CI_COMMITTER_NAME]
    #[arg(long)]
    pub ci_committer_name: Option<String>,
}

/// AWS connection flags.
#[derive(Debug, Clone, Default, Args)]
pub struct AwsArgs {
    /// Named AWS profile [env: AWS_PROFILE]
    #[arg(long, global = true)]
    pub aws_profile: Option<String>,

    /// AWS region [env: AWS_REGION]
    #[arg(long, global = true)]
    pub aws_region: Option<String>,
}

/// Service rollout flags.
#[derive(Debug, Clone, Default, Args)]
pub struct EcsArgs {
    /// Task definition family to derive the new revision from [env: TASK_DEFINITION_FAMILY]
    #[arg(long)]
    pub task_definition_family: Option<String>,

    /// Cluster running the service [env: ECS_CLUSTER]
    #[arg(long)]
    pub ecs_cluster: Option<String>,

    /// Repository the new image was pushed to [env: ECR_REPOSITORY_URI]
    #[arg(long)]
    pub ecr_repository_uri: Option<String>,

    /// Service to roll out [env: ECS_SERVICE_NAME]
    #[arg(long)]
    pub ecs_service_name: Option<String>,
}

/// Directory sync flags.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Destination bucket [env: S3_BUCKET]
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// Local directory to upload [env: SOURCE_DIR] [default: /artifacts/]
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Distribution to invalidate overwritten objects in [env: CLOUDFRONT_DISTRIBUTION_ID]
    #[arg(long)]
    pub cloudfront_distribution_id: Option<String>,

    /// Key prefix inside the bucket [env: S3_PREFIX]
    #[arg(long)]
    pub s3_prefix: Option<String>,
}

/// Function publish flags.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Function to update; repeat for several [env: FUNCTION_NAME, comma separated]
    #[arg(long = "function-name")]
    pub function_names: Vec<String>,

    /// Zip package to upload [env: PATH_TO_ZIP]
    #[arg(long)]
    pub path_to_zip: Option<String>,

    /// Bucket to upload the package to [env: S3_BUCKET]
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// Key prefix inside the bucket [env: S3_PREFIX]
    #[arg(long)]
    pub s3_prefix: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EcsInputs {
    pub family: String,
    pub cluster: ClusterName,
    pub repository: RepositoryUri,
    pub service: ServiceName,
}

#[derive(Debug, Clone)]
pub struct SyncInputs {
    pub bucket: BucketName,
    pub source_dir: PathBuf,
    pub distribution_id: Option<DistributionId>,
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct PublishInputs {
    pub functions: NonEmpty<FunctionName>,
    pub artifact: PathBuf,
    pub bucket: BucketName,
    pub prefix: String,
}

/// Resolves command inputs against the environment snapshot and settings file.
pub struct Resolver<'a> {
    env: &'a Environment,
    settings: &'a Settings,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a Environment, settings: &'a Settings) -> Self {
        Self { env, settings }
    }

    fn lookup(
        &self,
        flag: Option<&str>,
        env_key: &str,
        file: Option<&EnvValue>,
    ) -> Result<Option<String>> {
        if let Some(value) = flag.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(Some(value.to_string()));
        }

        if let Some(value) = self.env.value(env_key) {
            return Ok(Some(value.to_string()));
        }

        match file {
            Some(value) => {
                let resolved = value.resolve(self.env)?;
                let resolved = resolved.trim();
                Ok((!resolved.is_empty()).then(|| resolved.to_string()))
            }
            None => Ok(None),
        }
    }

    fn require(
        &self,
        flag_value: Option<&str>,
        flag: &'static str,
        env_key: &'static str,
        file: Option<&EnvValue>,
    ) -> Result<String> {
        self.lookup(flag_value, env_key, file)?
            .ok_or(Error::MissingSetting { flag, env: env_key })
    }

    fn optional(&self, flag_value: Option<&str>, env_key: &str) -> Result<String> {
        Ok(self.lookup(flag_value, env_key, None)?.unwrap_or_default())
    }

    pub fn build_metadata(&self, args: &BuildArgs) -> Result<BuildMetadata> {
        let commit = self.require(
            args.ci_commit_id.as_deref(),
            "--ci-commit-id",
            "CI_COMMIT_ID",
            None,
        )?;
        let commit_id = CommitId::new(&commit).map_err(|e| Error::InvalidSetting {
            field: "commit id",
            reason: e.to_string(),
        })?;

        Ok(BuildMetadata::new(commit_id)
            .message(self.optional(args.ci_message.as_deref(), "CI_COMMIT_MESSAGE")?)
            .branch(self.optional(args.ci_branch.as_deref(), "CI_BRANCH")?)
            .build_number(self.optional(args.ci_build_number.as_deref(), "CI_BUILD_ID")?)
            .build_url(self.optional(args.ci_build_url.as_deref(), "CI_BUILD_URL")?)
            .committer_email(
                self.optional(args.ci_committer_email.as_deref(), "CI_COMMITTER_EMAIL")?,
            )
            .committer_username(
                self.optional(args.ci_committer_username.as_deref(), "CI_COMMITTER_USERNAME")?,
            )
            .committer_name(
                self.optional(args.ci_committer_name.as_deref(), "CI_COMMITTER_NAME")?,
            ))
    }

    pub fn aws_options(&self, args: &AwsArgs) -> Result<AwsOptions> {
        let aws = &self.settings.aws;
        Ok(AwsOptions {
            profile: self.lookup(
                args.aws_profile.as_deref(),
                "AWS_PROFILE",
                aws.profile.as_ref(),
            )?,
            region: self.lookup(args.aws_region.as_deref(), "AWS_REGION", aws.region.as_ref())?,
            operation_timeout: aws.operation_timeout,
        })
    }

    pub fn ecs(&self, args: &EcsArgs) -> Result<EcsInputs> {
        let ecs = &self.settings.ecs;

        let family = self.require(
            args.task_definition_family.as_deref(),
            "--task-definition-family",
            "TASK_DEFINITION_FAMILY",
            ecs.task_definition_family.as_ref(),
        )?;
        let cluster = self.require(
            args.ecs_cluster.as_deref(),
            "--ecs-cluster",
            "ECS_CLUSTER",
            ecs.cluster.as_ref(),
        )?;
        let repository = self.require(
            args.ecr_repository_uri.as_deref(),
            "--ecr-repository-uri",
            "ECR_REPOSITORY_URI",
            ecs.repository_uri.as_ref(),
        )?;
        let service = self.require(
            args.ecs_service_name.as_deref(),
            "--ecs-service-name",
            "ECS_SERVICE_NAME",
            ecs.service.as_ref(),
        )?;

        let repository = RepositoryUri::parse(&repository).map_err(|e| Error::InvalidSetting {
            field: "repository uri",
            reason: e.to_string(),
        })?;

        Ok(EcsInputs {
            family,
            cluster: ClusterName::new(cluster),
            repository,
            service: ServiceName::new(service),
        })
    }

    pub fn sync(&self, args: &SyncArgs) -> Result<SyncInputs> {
        let s3 = &self.settings.s3;

        let bucket = self.require(
            args.s3_bucket.as_deref(),
            "--s3-bucket",
            "S3_BUCKET",
            s3.bucket.as_ref(),
        )?;
        let source_dir = self
            .lookup(
                args.source_dir.as_deref(),
                "SOURCE_DIR",
                s3.source_dir.as_ref(),
            )?
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        let distribution_id = self.lookup(
            args.cloudfront_distribution_id.as_deref(),
            "CLOUDFRONT_DISTRIBUTION_ID",
            s3.cloudfront_distribution_id.as_ref(),
        )?;
        let prefix = self
            .lookup(args.s3_prefix.as_deref(), "S3_PREFIX", s3.prefix.as_ref())?
            .unwrap_or_default();

        let source_dir = PathBuf::from(source_dir);
        if !source_dir.exists() {
            return Err(Error::SourceDirMissing(source_dir));
        }
        if !source_dir.is_dir() {
            return Err(Error::NotADirectory(source_dir));
        }

        Ok(SyncInputs {
            bucket: BucketName::new(bucket),
            source_dir: source_dir.canonicalize()?,
            distribution_id: distribution_id.map(DistributionId::new),
            prefix,
        })
    }

    pub fn publish(&self, args: &PublishArgs) -> Result<PublishInputs> {
        let lambda = &self.settings.lambda;

        let names = self.function_names(args)?;
        let functions = names
            .iter()
            .map(|name| {
                FunctionName::new(name).map_err(|e| Error::InvalidSetting {
                    field: "function name",
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let functions = NonEmpty::from_vec(functions).ok_or(Error::MissingSetting {
            flag: "--function-name",
            env: "FUNCTION_NAME",
        })?;

        let artifact = self.require(
            args.path_to_zip.as_deref(),
            "--path-to-zip",
            "PATH_TO_ZIP",
            lambda.path_to_zip.as_ref(),
        )?;
        let bucket = self.require(
            args.s3_bucket.as_deref(),
            "--s3-bucket",
            "S3_BUCKET",
            lambda.bucket.as_ref(),
        )?;
        let prefix = self
            .lookup(args.s3_prefix.as_deref(), "S3_PREFIX", lambda.prefix.as_ref())?
            .unwrap_or_default();

        let artifact = PathBuf::from(artifact);
        if !artifact.exists() {
            return Err(Error::ArtifactMissing(artifact));
        }
        if !artifact.is_file() {
            return Err(Error::NotAFile(artifact));
        }

        Ok(PublishInputs {
            functions,
            artifact: artifact.canonicalize()?,
            bucket: BucketName::new(bucket),
            prefix,
        })
    }

    fn function_names(&self, args: &PublishArgs) -> Result<Vec<String>> {
        let from_flags: Vec<String> = args
            .function_names
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if !from_flags.is_empty() {
            return Ok(from_flags);
        }

        if let Some(value) = self.env.value("FUNCTION_NAME") {
            return Ok(value
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect());
        }

        self.settings
            .lambda
            .functions
            .iter()
            .map(|value| value.resolve(self.env))
            .collect()
    }
}
