// ABOUTME: Remote control-plane capabilities and their AWS implementation.
// ABOUTME: Consumers depend on the traits; the binary wires in AwsCloud.

mod aws;
pub mod traits;

pub use aws::{AwsCloud, AwsOptions};
pub use traits::*;
