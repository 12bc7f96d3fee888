// ABOUTME: Shared helper for building the AWS-backed control plane client.
// ABOUTME: Called only after every input has been resolved and validated.

use ci_deploy::cloud::{AwsCloud, AwsOptions};
use ci_deploy::output::Output;

pub async fn connect_to_cloud(options: &AwsOptions, output: &Output) -> AwsCloud {
    match (&options.profile, &options.region) {
        (Some(profile), Some(region)) => output.progress(&format!(
            "  → Loading AWS configuration (profile {profile}, region {region})..."
        )),
        (Some(profile), None) => output.progress(&format!(
            "  → Loading AWS configuration (profile {profile})..."
        )),
        (None, Some(region)) => output.progress(&format!(
            "  → Loading AWS configuration (region {region})..."
        )),
        (None, None) => output.progress("  → Loading AWS configuration..."),
    }

    AwsCloud::connect(options).await
}
