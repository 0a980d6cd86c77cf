use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use finguard_core::api as core_api;
use finguard_core::config::AdminConfig;
use finguard_core::model::{ConditionSet, ConditionSetRule, Resource, Role, UserAttribute};

use crate::http::{body_snippet, build_client, join_url};

/// Permit admin API (`/v2/schema/...` and `/v2/facts/...`).
pub struct PermitAdmin {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    project: String,
    environment: String,
}

#[derive(Serialize)]
struct ResourceBody<'a> {
    key: &'a str,
    name: &'a str,
    description: &'a str,
    actions: BTreeMap<&'a str, Map<String, Value>>,
    attributes: BTreeMap<&'a str, AttributeBody<'a>>,
}

#[derive(Serialize)]
struct AttributeBody<'a> {
    #[serde(rename = "type")]
    attr_type: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct UserAttributeBody<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    attr_type: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct RoleBody<'a> {
    key: String,
    name: &'a str,
    description: String,
    permissions: Vec<String>,
}

impl PermitAdmin {
    pub fn new(cfg: &AdminConfig) -> anyhow::Result<Self> {
        if cfg.api_key.trim().is_empty() {
            anyhow::bail!("admin api key is not configured (set PERMIT_KEY or [admin].api_key)");
        }
        Ok(Self {
            client: build_client(cfg.timeout_ms)?,
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
            project: cfg.project.clone(),
            environment: cfg.environment.clone(),
        })
    }

    fn schema_url(&self, path: &str) -> String {
        join_url(
            &self.api_url,
            &format!("v2/schema/{}/{}/{}", self.project, self.environment, path),
        )
    }

    fn facts_url(&self, path: &str) -> String {
        join_url(
            &self.api_url,
            &format!("v2/facts/{}/{}/{}", self.project, self.environment, path),
        )
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: String,
        item_key: &str,
        body: &B,
    ) -> Result<(), core_api::AdminError> {
        tracing::debug!(target: "finguard.provision", url = %url, item = item_key, "admin create");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| core_api::AdminError::Transport(anyhow::Error::new(e)))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::CONFLICT {
            return Err(core_api::AdminError::Conflict {
                key: item_key.to_string(),
            });
        }
        let body_snippet = body_snippet(resp).await;
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::NOT_FOUND
        {
            return Err(core_api::AdminError::Rejected {
                reason: format!("{}: {}", status.as_u16(), body_snippet),
            });
        }
        Err(core_api::AdminError::HttpStatus {
            status: status.as_u16(),
            body_snippet,
        })
    }
}

#[async_trait]
impl core_api::PolicyAdmin for PermitAdmin {
    fn name(&self) -> &str {
        "permit"
    }

    async fn create_resource(&self, resource: &Resource) -> Result<(), core_api::AdminError> {
        let body = ResourceBody {
            key: &resource.key,
            name: &resource.name,
            description: &resource.description,
            actions: resource
                .actions
                .iter()
                .map(|a| (a.as_str(), Map::new()))
                .collect(),
            attributes: resource
                .attributes
                .iter()
                .map(|(k, spec)| {
                    (
                        k.as_str(),
                        AttributeBody {
                            attr_type: spec.attr_type.as_str(),
                            description: &spec.description,
                        },
                    )
                })
                .collect(),
        };
        self.post(self.schema_url("resources"), &resource.key, &body)
            .await
    }

    async fn create_user_attribute(
        &self,
        attribute: &UserAttribute,
    ) -> Result<(), core_api::AdminError> {
        let body = UserAttributeBody {
            key: &attribute.key,
            attr_type: attribute.attr_type.as_str(),
            description: &attribute.description,
        };
        self.post(
            self.schema_url("resources/__user/attributes"),
            &attribute.key,
            &body,
        )
        .await
    }

    async fn create_role(&self, role: &Role) -> Result<(), core_api::AdminError> {
        let key = role.key();
        let body = RoleBody {
            key: key.clone(),
            name: &role.name,
            description: role.description(),
            permissions: role.flattened_permissions(),
        };
        self.post(self.schema_url("roles"), &key, &body).await
    }

    async fn create_condition_set(&self, set: &ConditionSet) -> Result<(), core_api::AdminError> {
        self.post(self.schema_url("condition_sets"), &set.key, set)
            .await
    }

    async fn create_condition_set_rule(
        &self,
        rule: &ConditionSetRule,
    ) -> Result<(), core_api::AdminError> {
        let body = json!({
            "user_set": rule.user_set,
            "permission": rule.permission,
            "resource_set": rule.resource_set,
        });
        self.post(self.facts_url("set_rules"), &rule.key(), &body)
            .await
    }
}
