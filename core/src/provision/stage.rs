use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStage {
    Resources,
    UserAttributes,
    Roles,
    UserSets,
    ResourceSets,
    ConditionSetRules,
}

impl ProvisionStage {
    /// Application order. Later stages reference items created by earlier ones.
    pub const ORDERED: [ProvisionStage; 6] = [
        ProvisionStage::Resources,
        ProvisionStage::UserAttributes,
        ProvisionStage::Roles,
        ProvisionStage::UserSets,
        ProvisionStage::ResourceSets,
        ProvisionStage::ConditionSetRules,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionStage::Resources => "resources",
            ProvisionStage::UserAttributes => "user_attributes",
            ProvisionStage::Roles => "roles",
            ProvisionStage::UserSets => "user_sets",
            ProvisionStage::ResourceSets => "resource_sets",
            ProvisionStage::ConditionSetRules => "condition_set_rules",
        }
    }
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
