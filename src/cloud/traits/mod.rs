// ABOUTME: Composable capability traits for the remote control plane.
// ABOUTME: Defines ObjectStore, TaskDefinitionOps, ServiceOps, CdnOps, FunctionOps.

mod cdn;
mod functions;
mod object_store;
mod shared_types;
mod task_definitions;

pub use cdn::{CdnError, CdnOps};
pub use functions::{FunctionError, FunctionOps};
pub use object_store::{ObjectStore, ObjectStoreError};
pub use shared_types::*;
pub use task_definitions::{EcsError, ServiceOps, TaskDefinitionOps};
