// ABOUTME: Entry point for the ci-deploy CLI application.
// ABOUTME: Parses arguments, resolves configuration, and dispatches to a deploy target.

mod cli;
mod commands;

use ci_deploy::config::{Environment, Resolver};
use ci_deploy::error::Result;
use ci_deploy::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands, DeployTarget};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let env = commands::resolve_environment(Environment::from_process(), cli.envvar_prefix);

    match cli.command {
        Commands::Env => {
            commands::print_environment(&env, output);
            Ok(())
        }
        Commands::Deploy { build, target } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            let resolver = Resolver::new(&env, &settings);
            let metadata = resolver.build_metadata(&build)?;
            let aws = resolver.aws_options(&cli.aws)?;

            match target {
                DeployTarget::Ecs(args) => {
                    let inputs = resolver.ecs(&args)?;
                    commands::deploy_ecs(inputs, &metadata, &aws, output).await
                }
                DeployTarget::S3(args) => {
                    let inputs = resolver.sync(&args)?;
                    commands::deploy_s3(inputs, &metadata, &aws, output).await
                }
                DeployTarget::Lambda(args) => {
                    let inputs = resolver.publish(&args)?;
                    commands::deploy_lambda(inputs, &metadata, &aws, output).await
                }
            }
        }
    }
}
