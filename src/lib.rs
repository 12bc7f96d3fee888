// ABOUTME: Library root for ci-deploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cloud;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod publish;
pub mod rollout;
pub mod sync;
pub mod types;
