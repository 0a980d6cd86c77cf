//! Ordered, idempotent application of a validated policy model to the
//! decision service's admin surface.

mod memory;
mod provisioner;
mod stage;
mod r#trait;

pub use memory::{CreatedItem, InMemoryPolicyAdmin};
pub use provisioner::{ProvisionSummary, Provisioner};
pub use stage::ProvisionStage;
pub use r#trait::PolicyAdmin;
