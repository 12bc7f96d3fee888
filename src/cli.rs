// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the deploy targets, the env listing, and global flags.

use ci_deploy::config::{AwsArgs, BuildArgs, EcsArgs, PublishArgs, SyncArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ci-deploy")]
#[command(about = "Deploy CI build outputs to ECS services, S3/CloudFront and Lambda")]
#[command(version)]
pub struct Cli {
    /// Expose <PREFIX>_<NAME> variables as <NAME> [env: ENVVAR_PREFIX, else CI_BRANCH]
    #[arg(long, global = true)]
    pub envvar_prefix: Option<String>,

    /// Settings file (default: ci-deploy.yml in the working directory, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub aws: AwsArgs,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result and warnings
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a build to one target
    Deploy {
        #[command(flatten)]
        build: BuildArgs,

        #[command(subcommand)]
        target: DeployTarget,
    },

    /// Print the resolved environment with secrets redacted
    Env,
}

#[derive(Subcommand)]
pub enum DeployTarget {
    /// Register a task definition revision for the new image and roll the service
    Ecs(EcsArgs),

    /// Sync a directory to a bucket and invalidate overwritten objects
    S3(SyncArgs),

    /// Upload a zip package and point functions at it
    #[command(alias = "lambda-func")]
    Lambda(PublishArgs),
}
