use std::collections::{BTreeMap, BTreeSet};

use super::{
    AttrSpec, AttrType, AttributePath, Condition, ConditionSet, ConditionSetKind,
    ConditionSetRule, Permission, PolicyModel, Resource, Role, UserAttribute,
};

/// Resource, action and attribute names shared between the built-in model
/// and the typed check requests in [`crate::decision`].
pub mod keys {
    pub const FINANCIAL_ADVICE: &str = "financial_advice";
    pub const FINANCIAL_DOCUMENT: &str = "financial_document";
    pub const FINANCIAL_RESPONSE: &str = "financial_response";
    pub const PORTFOLIO: &str = "portfolio";

    pub const RECEIVE: &str = "receive";
    pub const READ: &str = "read";
    pub const REQUIRES_DISCLAIMER: &str = "requires_disclaimer";
    pub const UPDATE: &str = "update";
    pub const ANALYZE: &str = "analyze";

    pub const IS_AI_GENERATED: &str = "is_ai_generated";
    pub const CONTAINS_ADVICE: &str = "contains_advice";
    pub const RISK_LEVEL: &str = "risk_level";
    pub const DOC_TYPE: &str = "doc_type";
    pub const CLASSIFICATION: &str = "classification";
    pub const CLEARANCE_REQUIRED: &str = "clearance_required";
    pub const OWNER_ID: &str = "owner_id";
    pub const VALUE_TIER: &str = "value_tier";

    pub const CLEARANCE_LEVEL: &str = "clearance_level";
    pub const AI_ADVICE_OPTED_IN: &str = "ai_advice_opted_in";
}

fn attr(attr_type: AttrType, description: &str) -> AttrSpec {
    AttrSpec {
        attr_type,
        description: description.to_string(),
    }
}

fn resource(
    key: &str,
    name: &str,
    description: &str,
    actions: &[&str],
    attributes: Vec<(&str, AttrSpec)>,
) -> Resource {
    Resource {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect::<BTreeSet<_>>(),
        attributes: attributes
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PolicyModel {
    /// The Financial Advisor security perimeter.
    pub fn financial_advisor() -> Self {
        use keys::*;

        let resources = vec![
            resource(
                FINANCIAL_ADVICE,
                "Financial Advice",
                "AI-generated financial advice",
                &[RECEIVE],
                vec![
                    (IS_AI_GENERATED, attr(AttrType::Bool, "Whether the advice is AI-generated")),
                    (
                        RISK_LEVEL,
                        attr(AttrType::String, "Risk level of the advice (low, medium, high)"),
                    ),
                ],
            ),
            resource(
                FINANCIAL_DOCUMENT,
                "Financial Document",
                "Financial knowledge documents",
                &[READ],
                vec![
                    (DOC_TYPE, attr(AttrType::String, "Type of financial document")),
                    (CLASSIFICATION, attr(AttrType::String, "Document classification level")),
                    (
                        CLEARANCE_REQUIRED,
                        attr(AttrType::String, "Required clearance level to access"),
                    ),
                ],
            ),
            resource(
                FINANCIAL_RESPONSE,
                "Financial Response",
                "AI-generated response content",
                &[REQUIRES_DISCLAIMER],
                vec![
                    (
                        CONTAINS_ADVICE,
                        attr(AttrType::Bool, "Whether the response contains financial advice"),
                    ),
                    (RISK_LEVEL, attr(AttrType::String, "Risk level of the response")),
                ],
            ),
            resource(
                PORTFOLIO,
                "Investment Portfolio",
                "User investment portfolio",
                &[UPDATE, READ, ANALYZE],
                vec![
                    (OWNER_ID, attr(AttrType::String, "Portfolio owner ID")),
                    (VALUE_TIER, attr(AttrType::String, "Portfolio value classification")),
                ],
            ),
        ];

        let user_attributes = vec![
            UserAttribute {
                key: CLEARANCE_LEVEL.into(),
                attr_type: AttrType::String,
                description: "User's security clearance level (low, high)".into(),
            },
            UserAttribute {
                key: AI_ADVICE_OPTED_IN.into(),
                attr_type: AttrType::Bool,
                description: "Whether user has opted in to receive AI-generated advice".into(),
            },
        ];

        let user_sets = vec![
            ConditionSet {
                key: "opted_in_users".into(),
                name: "AI Advice Opted-in Users".into(),
                description: "Users who have consented to AI-generated advice".into(),
                kind: ConditionSetKind::UserSet,
                resource_id: None,
                conditions: Condition::all_of([Condition::equals(
                    AttributePath::user(AI_ADVICE_OPTED_IN),
                    true,
                )]),
            },
            ConditionSet {
                key: "high_clearance_users".into(),
                name: "High Clearance Users".into(),
                description: "Users with high-level document access".into(),
                kind: ConditionSetKind::UserSet,
                resource_id: None,
                conditions: Condition::all_of([Condition::equals(
                    AttributePath::user(CLEARANCE_LEVEL),
                    "high",
                )]),
            },
        ];

        let resource_sets = vec![
            ConditionSet {
                key: "confidential_docs".into(),
                name: "Confidential Documents".into(),
                description: "Documents with confidential classification".into(),
                kind: ConditionSetKind::ResourceSet,
                resource_id: Some(FINANCIAL_DOCUMENT.into()),
                conditions: Condition::all_of([Condition::equals(
                    AttributePath::resource(CLASSIFICATION),
                    "confidential",
                )]),
            },
            ConditionSet {
                key: "finance_advice".into(),
                name: "Financial Advice".into(),
                description: "Financial advice with ai content".into(),
                kind: ConditionSetKind::ResourceSet,
                resource_id: Some(FINANCIAL_ADVICE.into()),
                conditions: Condition::all_of([Condition::equals(
                    AttributePath::resource(IS_AI_GENERATED),
                    true,
                )]),
            },
        ];

        let condition_set_rules = vec![
            ConditionSetRule {
                user_set: "opted_in_users".into(),
                permission: format!("{FINANCIAL_ADVICE}:{RECEIVE}"),
                resource_set: "finance_advice".into(),
            },
            ConditionSetRule {
                user_set: "high_clearance_users".into(),
                permission: format!("{FINANCIAL_DOCUMENT}:{READ}"),
                resource_set: "confidential_docs".into(),
            },
        ];

        let roles = vec![
            Role::new("restricted_user"),
            Role::new("premium_user")
                .with_permission(Permission {
                    resource: FINANCIAL_ADVICE.into(),
                    actions: strings(&[RECEIVE]),
                    attributes: [(IS_AI_GENERATED.to_string(), strings(&["true", "false"]))]
                        .into_iter()
                        .collect(),
                    condition_sets: strings(&["opted_in_users", "finance_advice"]),
                })
                .with_permission(Permission {
                    resource: FINANCIAL_DOCUMENT.into(),
                    actions: strings(&[READ]),
                    attributes: BTreeMap::new(),
                    condition_sets: strings(&["high_clearance_users", "confidential_docs"]),
                })
                .with_permission(Permission {
                    resource: PORTFOLIO.into(),
                    actions: strings(&[UPDATE, READ, ANALYZE]),
                    attributes: [(VALUE_TIER.to_string(), strings(&["premium", "standard"]))]
                        .into_iter()
                        .collect(),
                    condition_sets: Vec::new(),
                }),
        ];

        PolicyModel {
            resources,
            user_attributes,
            user_sets,
            resource_sets,
            condition_set_rules,
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_model_is_consistent() {
        PolicyModel::financial_advisor()
            .validate()
            .expect("built-in model must validate");
    }

    #[test]
    fn every_referenced_action_exists_on_its_resource() {
        let model = PolicyModel::financial_advisor();
        for role in &model.roles {
            for p in &role.permissions {
                let r = model.resource(&p.resource).unwrap();
                for a in &p.actions {
                    assert!(r.has_action(a), "{}:{} missing", p.resource, a);
                }
            }
        }
        for rule in &model.condition_set_rules {
            let (res, action) = super::super::parse_permission(&rule.permission).unwrap();
            assert!(model.resource(res).unwrap().has_action(action));
        }
    }
}
