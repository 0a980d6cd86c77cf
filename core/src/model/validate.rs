use std::collections::HashSet;

use crate::error::ValidationError;

use super::{
    parse_permission, AttrScope, ConditionSet, ConditionSetKind, ConditionSetRule, PolicyModel,
    Role,
};

pub(super) fn validate(model: &PolicyModel) -> Result<(), ValidationError> {
    check_unique(
        "resource",
        model.resources.iter().map(|r| r.key.as_str()),
    )?;
    check_unique(
        "user attribute",
        model.user_attributes.iter().map(|a| a.key.as_str()),
    )?;
    check_unique(
        "condition set",
        model
            .user_sets
            .iter()
            .chain(model.resource_sets.iter())
            .map(|c| c.key.as_str()),
    )?;
    let role_keys: Vec<String> = model.roles.iter().map(Role::key).collect();
    check_unique("role", role_keys.iter().map(String::as_str))?;

    for set in &model.user_sets {
        check_condition_set(model, set, ConditionSetKind::UserSet)?;
    }
    for set in &model.resource_sets {
        check_condition_set(model, set, ConditionSetKind::ResourceSet)?;
    }
    for rule in &model.condition_set_rules {
        check_rule(model, rule)?;
    }
    for role in &model.roles {
        check_role(model, role)?;
    }
    Ok(())
}

fn check_unique<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.trim().is_empty() {
            return Err(ValidationError::Invalid {
                owner: kind.to_string(),
                reason: "empty key".into(),
            });
        }
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateKey {
                kind,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn check_condition_set(
    model: &PolicyModel,
    set: &ConditionSet,
    declared_as: ConditionSetKind,
) -> Result<(), ValidationError> {
    let owner = format!("condition set `{}`", set.key);
    if set.kind != declared_as {
        return Err(ValidationError::ConditionSetKindMismatch {
            owner,
            condition_set: set.key.clone(),
            expected: declared_as.as_str(),
        });
    }

    match set.kind {
        ConditionSetKind::UserSet => {
            if set.resource_id.is_some() {
                return Err(ValidationError::Invalid {
                    owner,
                    reason: "user sets cannot target a resource".into(),
                });
            }
            for path in set.conditions.attribute_paths() {
                let resolves = path.scope == AttrScope::User
                    && model.user_attribute(&path.attribute).is_some();
                if !resolves {
                    return Err(ValidationError::UnknownAttribute {
                        owner,
                        attribute: path.to_string(),
                    });
                }
            }
        }
        ConditionSetKind::ResourceSet => {
            let Some(resource_id) = set.resource_id.as_deref() else {
                return Err(ValidationError::Invalid {
                    owner,
                    reason: "resource sets must name a resource_id".into(),
                });
            };
            let Some(resource) = model.resource(resource_id) else {
                return Err(ValidationError::UnknownResource {
                    owner,
                    resource: resource_id.to_string(),
                });
            };
            for path in set.conditions.attribute_paths() {
                let resolves =
                    path.scope == AttrScope::Resource && resource.has_attribute(&path.attribute);
                if !resolves {
                    return Err(ValidationError::UnknownAttribute {
                        owner,
                        attribute: path.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_action(
    model: &PolicyModel,
    owner: &str,
    resource_key: &str,
    action: &str,
) -> Result<(), ValidationError> {
    let Some(resource) = model.resource(resource_key) else {
        return Err(ValidationError::UnknownResource {
            owner: owner.to_string(),
            resource: resource_key.to_string(),
        });
    };
    if !resource.has_action(action) {
        return Err(ValidationError::UnknownAction {
            owner: owner.to_string(),
            resource: resource_key.to_string(),
            action: action.to_string(),
        });
    }
    Ok(())
}

fn expect_set<'a>(
    model: &'a PolicyModel,
    owner: &str,
    key: &str,
    kind: ConditionSetKind,
) -> Result<&'a ConditionSet, ValidationError> {
    let Some(set) = model.condition_set(key) else {
        return Err(ValidationError::UnknownConditionSet {
            owner: owner.to_string(),
            condition_set: key.to_string(),
        });
    };
    if set.kind != kind {
        return Err(ValidationError::ConditionSetKindMismatch {
            owner: owner.to_string(),
            condition_set: key.to_string(),
            expected: kind.as_str(),
        });
    }
    Ok(set)
}

fn check_rule(model: &PolicyModel, rule: &ConditionSetRule) -> Result<(), ValidationError> {
    let owner = format!("condition set rule `{}`", rule.key());
    let Some((resource_key, action)) = parse_permission(&rule.permission) else {
        return Err(ValidationError::MalformedPermission {
            owner,
            permission: rule.permission.clone(),
        });
    };
    check_action(model, &owner, resource_key, action)?;
    expect_set(model, &owner, &rule.user_set, ConditionSetKind::UserSet)?;
    let resource_set = expect_set(
        model,
        &owner,
        &rule.resource_set,
        ConditionSetKind::ResourceSet,
    )?;

    let target = resource_set.resource_id.as_deref().unwrap_or_default();
    if target != resource_key {
        return Err(ValidationError::RuleResourceMismatch {
            owner,
            resource_set: rule.resource_set.clone(),
            expected: resource_key.to_string(),
            actual: target.to_string(),
        });
    }
    Ok(())
}

fn check_role(model: &PolicyModel, role: &Role) -> Result<(), ValidationError> {
    let owner = format!("role `{}`", role.key());
    for permission in &role.permissions {
        if permission.actions.is_empty() {
            return Err(ValidationError::Invalid {
                owner,
                reason: format!("permission on `{}` lists no actions", permission.resource),
            });
        }
        for action in &permission.actions {
            check_action(model, &owner, &permission.resource, action)?;
        }

        // check_action above guarantees the resource exists
        if let Some(resource) = model.resource(&permission.resource) {
            for attr in permission.attributes.keys() {
                if !resource.has_attribute(attr) {
                    return Err(ValidationError::UnknownAttribute {
                        owner,
                        attribute: format!("resource.{attr}"),
                    });
                }
            }
        }

        for cs in &permission.condition_sets {
            let Some(set) = model.condition_set(cs) else {
                return Err(ValidationError::UnknownConditionSet {
                    owner,
                    condition_set: cs.clone(),
                });
            };
            if set.kind == ConditionSetKind::ResourceSet
                && set.resource_id.as_deref() != Some(permission.resource.as_str())
            {
                return Err(ValidationError::RuleResourceMismatch {
                    owner,
                    resource_set: cs.clone(),
                    expected: permission.resource.clone(),
                    actual: set.resource_id.clone().unwrap_or_default(),
                });
            }
        }
        if !permission.condition_sets.is_empty() && model.rules_for(permission).is_empty() {
            return Err(ValidationError::Invalid {
                owner,
                reason: format!(
                    "condition sets {:?} on `{}` resolve to no condition set rule",
                    permission.condition_sets, permission.resource
                ),
            });
        }
    }
    Ok(())
}
