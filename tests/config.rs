// ABOUTME: Integration tests for configuration: settings file, environment snapshot, resolution.
// ABOUTME: Covers prefix overrides, redaction, precedence, and pre-flight validation errors.

use ci_deploy::config::*;
use ci_deploy::error::Error;
use std::fs;
use std::time::Duration;

fn env(vars: &[(&str, &str)]) -> Environment {
    Environment::from_vars(vars.iter().copied())
}

mod settings_file {
    use super::*;

    #[test]
    fn parse_full_settings() {
        let yaml = r#"
aws:
  profile: deploy
  region: eu-west-1
  operation_timeout: 90s
ecs:
  task_definition_family: web
  cluster: prod
  repository_uri: 123456789012.dkr.ecr.eu-west-1.amazonaws.com/web
  service: web
s3:
  bucket: assets
  source_dir: ./public
  prefix: site
  cloudfront_distribution_id:
    env: DISTRIBUTION
    default: E2EXAMPLE
lambda:
  functions:
    - fn-a
    - env: EXTRA_FUNCTION
  path_to_zip: build/handler.zip
"#;
        let settings = Settings::from_yaml(yaml).unwrap();

        assert_eq!(
            settings.aws.operation_timeout,
            Some(Duration::from_secs(90))
        );
        assert_eq!(
            settings.ecs.cluster,
            Some(EnvValue::Literal("prod".to_string()))
        );
        assert_eq!(
            settings.s3.cloudfront_distribution_id,
            Some(EnvValue::FromEnv {
                var: "DISTRIBUTION".to_string(),
                default: Some("E2EXAMPLE".to_string()),
            })
        );
        assert_eq!(settings.lambda.functions.len(), 2);
    }

    #[test]
    fn empty_document_is_default() {
        let settings = Settings::from_yaml("").unwrap();
        assert!(settings.ecs.cluster.is_none());
        assert!(settings.lambda.functions.is_empty());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            Settings::from_yaml("ecs: [unclosed"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn discover_prefers_primary_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "s3:\n  bucket: primary\n").unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "s3:\n  bucket: alternate\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(
            settings.s3.bucket,
            Some(EnvValue::Literal("primary".to_string()))
        );
    }

    #[test]
    fn discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::discover(dir.path()).unwrap();
        assert!(settings.s3.bucket.is_none());
    }

    #[test]
    fn env_reference_without_default_must_resolve() {
        let value = EnvValue::FromEnv {
            var: "MISSING".to_string(),
            default: None,
        };
        assert!(matches!(
            value.resolve(&Environment::default()),
            Err(Error::MissingEnvVar(name)) if name == "MISSING"
        ));
    }
}

mod environment {
    use super::*;

    #[test]
    fn prefixed_variables_override_plain_ones() {
        let env = env(&[
            ("S3_BUCKET", "default-bucket"),
            ("STAGING_S3_BUCKET", "staging-bucket"),
        ]);

        let resolved = env.with_prefix("STAGING");

        assert_eq!(resolved.get("S3_BUCKET"), Some("staging-bucket"));
        assert_eq!(resolved.get("STAGING_S3_BUCKET"), Some("staging-bucket"));
    }

    #[test]
    fn prefix_match_ignores_case_and_dashes() {
        let env = env(&[("Feature-Login_ECS_CLUSTER", "feature")]);

        let resolved = env.with_prefix("feature-login");

        assert_eq!(resolved.get("ECS_CLUSTER"), Some("feature"));
    }

    #[test]
    fn prefix_requires_separator() {
        let env = env(&[("PRODUCTION", "yes"), ("PRODX", "1"), ("PROD", "bare")]);

        let resolved = env.with_prefix("PROD");

        assert_eq!(resolved, env);
    }

    #[test]
    fn resolution_never_touches_the_source_snapshot() {
        let env = env(&[("DEV_S3_BUCKET", "dev")]);
        let _ = env.with_prefix("DEV");
        assert_eq!(env.get("S3_BUCKET"), None);
    }

    #[test]
    fn secrets_are_redacted_in_listing() {
        let env = env(&[
            ("AWS_SECRET_ACCESS_KEY", "hunter2"),
            ("api_secret_token", "hunter3"),
            ("S3_BUCKET", "assets"),
        ]);

        let listing: Vec<(&str, &str)> = env.redacted().collect();

        assert_eq!(
            listing,
            vec![
                ("AWS_SECRET_ACCESS_KEY", REDACTED),
                ("S3_BUCKET", "assets"),
                ("api_secret_token", REDACTED),
            ]
        );
    }

    #[test]
    fn process_snapshot_sees_variables() {
        temp_env::with_var("CI_DEPLOY_TEST_MARKER", Some("present"), || {
            let env = Environment::from_process();
            assert_eq!(env.get("CI_DEPLOY_TEST_MARKER"), Some("present"));
        });
    }
}

mod resolution {
    use super::*;

    fn build_env() -> Environment {
        env(&[
            ("CI_COMMIT_ID", "abc123"),
            ("CI_BRANCH", "main"),
            ("CI_COMMIT_MESSAGE", "ship it"),
        ])
    }

    #[test]
    fn build_metadata_from_environment() {
        let env = build_env();
        let settings = Settings::default();

        let metadata = Resolver::new(&env, &settings)
            .build_metadata(&BuildArgs::default())
            .unwrap();

        assert_eq!(metadata.commit_id().as_str(), "abc123");
        assert_eq!(metadata.branch_name(), "main");
    }

    #[test]
    fn flag_wins_over_environment() {
        let env = build_env();
        let settings = Settings::default();
        let args = BuildArgs {
            ci_commit_id: Some("def456".to_string()),
            ..Default::default()
        };

        let metadata = Resolver::new(&env, &settings)
            .build_metadata(&args)
            .unwrap();

        assert_eq!(metadata.commit_id().as_str(), "def456");
    }

    #[test]
    fn missing_commit_id_names_flag_and_variable() {
        let env = Environment::default();
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .build_metadata(&BuildArgs::default())
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSetting {
                flag: "--ci-commit-id",
                env: "CI_COMMIT_ID"
            }
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn ecs_environment_wins_over_settings_file() {
        let env = env(&[("ECS_CLUSTER", "from-env")]);
        let settings = Settings::from_yaml(
            r#"
ecs:
  task_definition_family: web
  cluster: from-file
  repository_uri: registry.example.com/web
  service: web
"#,
        )
        .unwrap();

        let inputs = Resolver::new(&env, &settings)
            .ecs(&EcsArgs::default())
            .unwrap();

        assert_eq!(inputs.cluster.as_str(), "from-env");
        assert_eq!(inputs.family, "web");
        assert_eq!(inputs.repository.name(), "web");
    }

    #[test]
    fn ecs_rejects_tagged_repository() {
        let env = env(&[
            ("TASK_DEFINITION_FAMILY", "web"),
            ("ECS_CLUSTER", "prod"),
            ("ECR_REPOSITORY_URI", "registry.example.com/web:latest"),
            ("ECS_SERVICE_NAME", "web"),
        ]);
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .ecs(&EcsArgs::default())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidSetting { .. }));
    }

    #[test]
    fn sync_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let env = env(&[
            ("S3_BUCKET", "assets"),
            ("SOURCE_DIR", missing.to_str().unwrap()),
        ]);
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .sync(&SyncArgs::default())
            .unwrap_err();

        assert!(matches!(err, Error::SourceDirMissing(_)));
    }

    #[test]
    fn sync_rejects_file_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let env = env(&[("S3_BUCKET", "assets"), ("SOURCE_DIR", file.to_str().unwrap())]);
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .sync(&SyncArgs::default())
            .unwrap_err();

        assert!(matches!(err, Error::NotADirectory(_)));
    }

    #[test]
    fn sync_inputs_with_optional_values() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(&[
            ("S3_BUCKET", "assets"),
            ("SOURCE_DIR", dir.path().to_str().unwrap()),
            ("CLOUDFRONT_DISTRIBUTION_ID", "E2EXAMPLE"),
        ]);
        let settings = Settings::default();

        let inputs = Resolver::new(&env, &settings)
            .sync(&SyncArgs::default())
            .unwrap();

        assert_eq!(inputs.bucket.as_str(), "assets");
        assert_eq!(inputs.prefix, "");
        assert_eq!(
            inputs.distribution_id.as_ref().map(|d| d.as_str()),
            Some("E2EXAMPLE")
        );
        assert_eq!(inputs.source_dir, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn publish_splits_function_names() {
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("handler.zip");
        fs::write(&zip, "zip").unwrap();
        let env = env(&[
            ("FUNCTION_NAME", "fn-a, fn-b"),
            ("PATH_TO_ZIP", zip.to_str().unwrap()),
            ("S3_BUCKET", "deployments"),
        ]);
        let settings = Settings::default();

        let inputs = Resolver::new(&env, &settings)
            .publish(&PublishArgs::default())
            .unwrap();

        let names: Vec<&str> = inputs.functions.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["fn-a", "fn-b"]);
    }

    #[test]
    fn publish_rejects_directory_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(&[
            ("FUNCTION_NAME", "fn-a"),
            ("PATH_TO_ZIP", dir.path().to_str().unwrap()),
            ("S3_BUCKET", "deployments"),
        ]);
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .publish(&PublishArgs::default())
            .unwrap_err();

        assert!(matches!(err, Error::NotAFile(_)));
    }

    #[test]
    fn publish_requires_a_function() {
        let env = Environment::default();
        let settings = Settings::default();

        let err = Resolver::new(&env, &settings)
            .publish(&PublishArgs::default())
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSetting {
                flag: "--function-name",
                ..
            }
        ));
    }

    #[test]
    fn aws_options_from_settings_file() {
        let env = Environment::default();
        let settings = Settings::from_yaml("aws:\n  region: eu-west-1\n  operation_timeout: 30s\n")
            .unwrap();

        let options = Resolver::new(&env, &settings)
            .aws_options(&AwsArgs::default())
            .unwrap();

        assert_eq!(options.region.as_deref(), Some("eu-west-1"));
        assert_eq!(options.profile, None);
        assert_eq!(options.operation_timeout, Some(Duration::from_secs(30)));
    }
}
