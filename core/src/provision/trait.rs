use async_trait::async_trait;

use crate::error::AdminError;
use crate::model::{ConditionSet, ConditionSetRule, Resource, Role, UserAttribute};

/// Admin surface of the decision service. Each call creates one item and is
/// fallible on its own; `AdminError::Conflict` means the item already exists.
#[async_trait]
pub trait PolicyAdmin: Send + Sync {
    fn name(&self) -> &str;

    async fn create_resource(&self, resource: &Resource) -> Result<(), AdminError>;

    async fn create_user_attribute(&self, attribute: &UserAttribute) -> Result<(), AdminError>;

    /// Permissions are sent flattened as `resource:action` strings.
    async fn create_role(&self, role: &Role) -> Result<(), AdminError>;

    async fn create_condition_set(&self, set: &ConditionSet) -> Result<(), AdminError>;

    async fn create_condition_set_rule(&self, rule: &ConditionSetRule) -> Result<(), AdminError>;
}
