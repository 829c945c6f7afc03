//! Infrastructure layer: the remote resource client seam, an in-memory
//! store backing it, and provisioning helpers built on the job runner and
//! the paginator.

pub mod client;
pub mod memory;
pub mod provisioning;

pub use client::{ClientError, Filesystem, ResourceClient};
pub use memory::InMemoryResourceStore;
pub use provisioning::{ProvisionError, child_path, create_children, destroy_with_dependents};
