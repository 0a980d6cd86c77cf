use std::sync::Arc;

use serde::Serialize;

use crate::gate::{AuthorizationGate, ComplianceGate};
use crate::generator::ContentGenerator;
use crate::types::{Query, Response};

/// Metadata key set on answers that were authorized in degraded mode.
pub const AUTHORIZATION_MODE_KEY: &str = "authorization_mode";

pub struct RunWithQueryArgs {
    pub query: Query,
    pub run_id: String,
    pub auth_gate: Arc<AuthorizationGate>,
    pub compliance_gate: Arc<ComplianceGate>,
    pub generator: Arc<dyn ContentGenerator>,
}

/// Business result of one request. Hard failures are `PipelineError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Answered { response: Response },
    Denied { reason: String },
}

impl PipelineOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            PipelineOutcome::Answered { response } => Some(response),
            PipelineOutcome::Denied { .. } => None,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, PipelineOutcome::Denied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answered_nests_the_response() {
        let outcome = PipelineOutcome::Answered {
            response: Response::new("x"),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "status": "answered",
                "response": {
                    "answer": "x",
                    "includes_advice": false,
                    "disclaimer_added": false,
                }
            })
        );
    }

    #[test]
    fn denied_carries_reason() {
        let outcome = PipelineOutcome::Denied {
            reason: "no".into(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "status": "denied", "reason": "no" })
        );
        assert!(outcome.response().is_none());
    }
}
