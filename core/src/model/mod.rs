//! Declarative ABAC policy model: resources, attributes, condition sets,
//! condition-set rules and roles.
//!
//! A [`PolicyModel`] carries no behavior beyond lookups. It must pass
//! [`PolicyModel::validate`] before it can be handed to the provisioner.

mod builtin;
mod condition;
mod validate;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub use builtin::keys;
pub use condition::{AttrScope, AttributePath, Condition, Operator, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Bool,
    String,
    Number,
    Time,
    Array,
    Json,
}

impl AttrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::Bool => "bool",
            AttrType::String => "string",
            AttrType::Number => "number",
            AttrType::Time => "time",
            AttrType::Array => "array",
            AttrType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrSpec {
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub actions: BTreeSet<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrSpec>,
}

impl Resource {
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    pub fn has_attribute(&self, attr: &str) -> bool {
        self.attributes.contains_key(attr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    pub key: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionSetKind {
    #[serde(rename = "userset")]
    UserSet,
    #[serde(rename = "resourceset")]
    ResourceSet,
}

impl ConditionSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionSetKind::UserSet => "userset",
            ConditionSetKind::ResourceSet => "resourceset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ConditionSetKind,
    /// Target resource; only meaningful for resource sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub conditions: Condition,
}

/// Binds a user set, a `"<resource>:<action>"` permission and a resource set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSetRule {
    pub user_set: String,
    pub permission: String,
    pub resource_set: String,
}

impl ConditionSetRule {
    /// Stable identifier used for logging and provisioning errors.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.user_set, self.permission, self.resource_set)
    }
}

/// Splits `"<resource>:<action>"`. Both halves must be non-empty.
pub fn parse_permission(permission: &str) -> Option<(&str, &str)> {
    let (resource, action) = permission.split_once(':')?;
    if resource.is_empty() || action.is_empty() || action.contains(':') {
        return None;
    }
    Some((resource, action))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permission {
    pub resource: String,
    pub actions: Vec<String>,
    /// Allowed values per resource attribute. Informational only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Condition sets (user or resource) whose rules refine this permission.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_sets: Vec<String>,
}

impl Permission {
    pub fn flatten(&self) -> impl Iterator<Item = String> + '_ {
        self.actions
            .iter()
            .map(move |action| format!("{}:{}", self.resource, action))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Lowercased name with spaces replaced by underscores.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase().replace(' ', "_")
    }

    pub fn description(&self) -> String {
        format!("Role for {} with ABAC rules", self.name)
    }

    /// `"<resource>:<action>"` strings for every action of every permission.
    /// An empty list means the role is maximally restricted.
    pub fn flattened_permissions(&self) -> Vec<String> {
        self.permissions.iter().flat_map(|p| p.flatten()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyModel {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub user_attributes: Vec<UserAttribute>,
    #[serde(default)]
    pub user_sets: Vec<ConditionSet>,
    #[serde(default)]
    pub resource_sets: Vec<ConditionSet>,
    #[serde(default)]
    pub condition_set_rules: Vec<ConditionSetRule>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl PolicyModel {
    pub fn resource(&self, key: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.key == key)
    }

    pub fn user_attribute(&self, key: &str) -> Option<&UserAttribute> {
        self.user_attributes.iter().find(|a| a.key == key)
    }

    pub fn condition_set(&self, key: &str) -> Option<&ConditionSet> {
        self.user_sets
            .iter()
            .chain(self.resource_sets.iter())
            .find(|c| c.key == key)
    }

    /// Rules that refine `permission`: those on one of its actions whose user
    /// set or resource set is listed in `permission.condition_sets`.
    pub fn rules_for(&self, permission: &Permission) -> Vec<&ConditionSetRule> {
        self.condition_set_rules
            .iter()
            .filter(|rule| {
                let Some((resource, action)) = parse_permission(&rule.permission) else {
                    return false;
                };
                resource == permission.resource
                    && permission.actions.iter().any(|a| a == action)
                    && permission
                        .condition_sets
                        .iter()
                        .any(|cs| cs == &rule.user_set || cs == &rule.resource_set)
            })
            .collect()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks every cross-reference and returns the first dangling one.
    pub fn validate(self) -> Result<ValidatedModel, crate::error::ValidationError> {
        validate::validate(&self)?;
        Ok(ValidatedModel(self))
    }
}

/// A model whose cross-references are known to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedModel(PolicyModel);

impl Deref for ValidatedModel {
    type Target = PolicyModel;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Permission tier a caller belongs to; each maps to a role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    OptedInUser,
    RestrictedUser,
    PremiumUser,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::OptedInUser => "opted_in_user",
            Tier::RestrictedUser => "restricted_user",
            Tier::PremiumUser => "premium_user",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
