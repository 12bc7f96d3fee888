// ABOUTME: Env command: lists the resolved environment with secret values redacted.

use ci_deploy::config::Environment;
use ci_deploy::output::{Output, OutputMode};
use serde_json::{Map, Value};

pub fn print_environment(env: &Environment, output: &Output) {
    match output.mode() {
        OutputMode::Json => {
            let vars: Map<String, Value> = env
                .redacted()
                .map(|(name, value)| (name.to_string(), Value::from(value)))
                .collect();
            output.success_with(
                &format!("{} variables", env.len()),
                Some(Value::Object(vars)),
            );
        }
        OutputMode::Normal | OutputMode::Quiet => {
            for (name, value) in env.redacted() {
                println!("{name}={value}");
            }
        }
    }
}
