// ABOUTME: Task definition mutation and service rollout.
// ABOUTME: Describe, derive the next revision for a new image, register it, roll the service.

mod client;
mod error;
mod mutator;

pub use client::{RolloutReport, RolloutTarget, ServiceRolloutClient};
pub use error::{RolloutError, RolloutErrorKind};
pub use mutator::{MutatedTaskDefinition, mutate};
