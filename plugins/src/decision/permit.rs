use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use finguard_core::api as core_api;
use finguard_core::config::PermitDecisionConfig;

use crate::http::{body_snippet, build_client, join_url};

/// Client for a Permit policy decision point (`POST {pdp}/allowed`).
pub struct PermitDecider {
    client: reqwest::Client,
    pdp_url: String,
    api_key: String,
    tenant: String,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct AllowedRequest<'a> {
    user: UserRef<'a>,
    action: &'a str,
    resource: ResourceRef<'a>,
    context: Map<String, Value>,
}

#[derive(Serialize)]
struct UserRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct ResourceRef<'a> {
    #[serde(rename = "type")]
    resource_type: &'a str,
    attributes: &'a Map<String, Value>,
    tenant: &'a str,
}

#[derive(Deserialize)]
struct AllowedResponse {
    allow: bool,
}

impl PermitDecider {
    pub fn new(cfg: &PermitDecisionConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(cfg.timeout_ms)?,
            pdp_url: cfg.pdp_url.clone(),
            api_key: cfg.api_key.clone(),
            tenant: cfg.tenant.clone(),
            timeout_ms: cfg.timeout_ms,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> core_api::DecisionError {
        if e.is_timeout() {
            core_api::DecisionError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            core_api::DecisionError::Transport(anyhow::Error::new(e))
        }
    }
}

#[async_trait]
impl core_api::PolicyDecider for PermitDecider {
    fn name(&self) -> &str {
        "permit"
    }

    async fn check(
        &self,
        subject: &str,
        action: &str,
        resource: &core_api::CheckResource,
    ) -> Result<bool, core_api::DecisionError> {
        let body = AllowedRequest {
            user: UserRef { key: subject },
            action,
            resource: ResourceRef {
                resource_type: &resource.resource_type,
                attributes: &resource.attributes,
                tenant: &self.tenant,
            },
            context: Map::new(),
        };

        let resp = self
            .client
            .post(join_url(&self.pdp_url, "allowed"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(core_api::DecisionError::Unauthorized);
        }
        if !status.is_success() {
            return Err(core_api::DecisionError::HttpStatus {
                status: status.as_u16(),
                body_snippet: body_snippet(resp).await,
            });
        }

        let decoded: AllowedResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                core_api::DecisionError::Decode(anyhow::Error::new(e))
            }
        })?;
        Ok(decoded.allow)
    }
}
