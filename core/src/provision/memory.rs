use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AdminError;
use crate::model::{
    parse_permission, ConditionSet, ConditionSetKind, ConditionSetRule, Resource, Role,
    UserAttribute,
};

use super::{PolicyAdmin, ProvisionStage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedItem {
    pub stage: ProvisionStage,
    pub key: String,
}

#[derive(Default)]
struct State {
    resources: BTreeMap<String, BTreeSet<String>>,
    user_attributes: BTreeSet<String>,
    roles: BTreeSet<String>,
    condition_sets: BTreeMap<String, ConditionSetKind>,
    rules: BTreeSet<String>,
    log: Vec<CreatedItem>,
    fail_on: Option<String>,
}

/// Admin surface kept in memory. Rejects references to items it has not
/// seen yet and reports duplicates as conflicts, like the hosted service.
/// Backs dry runs and tests.
#[derive(Default)]
pub struct InMemoryPolicyAdmin {
    state: Mutex<State>,
}

impl InMemoryPolicyAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent create for `key` fails with `AdminError::Rejected`.
    pub fn failing_on(key: impl Into<String>) -> Self {
        let admin = Self::default();
        admin.lock().fail_on = Some(key.into());
        admin
    }

    /// Successful creates, in the order they happened.
    pub fn created(&self) -> Vec<CreatedItem> {
        self.lock().log.clone()
    }

    pub fn has_role(&self, key: &str) -> bool {
        self.lock().roles.contains(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // a poisoned lock only means another test thread panicked mid-write
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl State {
    fn check_injected(&self, key: &str) -> Result<(), AdminError> {
        if self.fail_on.as_deref() == Some(key) {
            return Err(AdminError::Rejected {
                reason: format!("injected failure for `{key}`"),
            });
        }
        Ok(())
    }

    fn push(&mut self, stage: ProvisionStage, key: &str) {
        self.log.push(CreatedItem {
            stage,
            key: key.to_string(),
        });
    }

    fn require_resource_action(&self, resource: &str, action: &str) -> Result<(), AdminError> {
        match self.resources.get(resource) {
            None => Err(AdminError::Rejected {
                reason: format!("unknown resource `{resource}`"),
            }),
            Some(actions) if !actions.contains(action) => Err(AdminError::Rejected {
                reason: format!("unknown action `{action}` on `{resource}`"),
            }),
            Some(_) => Ok(()),
        }
    }

    fn require_set(&self, key: &str, kind: ConditionSetKind) -> Result<(), AdminError> {
        match self.condition_sets.get(key) {
            Some(k) if *k == kind => Ok(()),
            _ => Err(AdminError::Rejected {
                reason: format!("unknown {} `{key}`", kind.as_str()),
            }),
        }
    }
}

#[async_trait]
impl PolicyAdmin for InMemoryPolicyAdmin {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn create_resource(&self, resource: &Resource) -> Result<(), AdminError> {
        let mut st = self.lock();
        st.check_injected(&resource.key)?;
        if st.resources.contains_key(&resource.key) {
            return Err(AdminError::Conflict {
                key: resource.key.clone(),
            });
        }
        st.resources
            .insert(resource.key.clone(), resource.actions.clone());
        st.push(ProvisionStage::Resources, &resource.key);
        Ok(())
    }

    async fn create_user_attribute(&self, attribute: &UserAttribute) -> Result<(), AdminError> {
        let mut st = self.lock();
        st.check_injected(&attribute.key)?;
        if !st.user_attributes.insert(attribute.key.clone()) {
            return Err(AdminError::Conflict {
                key: attribute.key.clone(),
            });
        }
        st.push(ProvisionStage::UserAttributes, &attribute.key);
        Ok(())
    }

    async fn create_role(&self, role: &Role) -> Result<(), AdminError> {
        let key = role.key();
        let mut st = self.lock();
        st.check_injected(&key)?;
        for permission in role.flattened_permissions() {
            let Some((resource, action)) = parse_permission(&permission) else {
                return Err(AdminError::Rejected {
                    reason: format!("malformed permission `{permission}`"),
                });
            };
            st.require_resource_action(resource, action)?;
        }
        if !st.roles.insert(key.clone()) {
            return Err(AdminError::Conflict { key });
        }
        st.push(ProvisionStage::Roles, &key);
        Ok(())
    }

    async fn create_condition_set(&self, set: &ConditionSet) -> Result<(), AdminError> {
        let mut st = self.lock();
        st.check_injected(&set.key)?;
        if let Some(resource) = set.resource_id.as_deref() {
            if !st.resources.contains_key(resource) {
                return Err(AdminError::Rejected {
                    reason: format!("unknown resource `{resource}`"),
                });
            }
        }
        if st.condition_sets.contains_key(&set.key) {
            return Err(AdminError::Conflict {
                key: set.key.clone(),
            });
        }
        st.condition_sets.insert(set.key.clone(), set.kind);
        let stage = match set.kind {
            ConditionSetKind::UserSet => ProvisionStage::UserSets,
            ConditionSetKind::ResourceSet => ProvisionStage::ResourceSets,
        };
        st.push(stage, &set.key);
        Ok(())
    }

    async fn create_condition_set_rule(&self, rule: &ConditionSetRule) -> Result<(), AdminError> {
        let key = rule.key();
        let mut st = self.lock();
        st.check_injected(&key)?;
        let Some((resource, action)) = parse_permission(&rule.permission) else {
            return Err(AdminError::Rejected {
                reason: format!("malformed permission `{}`", rule.permission),
            });
        };
        st.require_resource_action(resource, action)?;
        st.require_set(&rule.user_set, ConditionSetKind::UserSet)?;
        st.require_set(&rule.resource_set, ConditionSetKind::ResourceSet)?;
        if !st.rules.insert(key.clone()) {
            return Err(AdminError::Conflict { key });
        }
        st.push(ProvisionStage::ConditionSetRules, &key);
        Ok(())
    }
}
