use std::sync::Arc;

use crate::classifier::AdviceClassifier;
use crate::decision::{check_request, DecisionBackend, ResponseContentRequest};
use crate::error::PolicyCheckError;
use crate::types::{Identity, Response};

pub const DISCLAIMER: &str = "\n\nIMPORTANT DISCLAIMER: This is AI-generated financial advice. \
This information is for educational purposes only and should not be considered as professional \
financial advice. Always consult with a qualified financial advisor before making investment \
decisions.";

/// Metadata key recording how the compliance decision was reached.
pub const COMPLIANCE_MODE_KEY: &str = "compliance_mode";

pub struct ComplianceGate {
    backend: DecisionBackend,
    classifier: Arc<dyn AdviceClassifier>,
    always_disclaim: bool,
}

impl ComplianceGate {
    /// `always_disclaim` only applies when `backend` is degraded.
    pub fn new(
        backend: DecisionBackend,
        classifier: Arc<dyn AdviceClassifier>,
        always_disclaim: bool,
    ) -> Self {
        Self {
            backend,
            classifier,
            always_disclaim,
        }
    }

    /// Classifies the answer and appends the disclaimer when required.
    /// Idempotent: a response that already carries the disclaimer is
    /// returned as is, without another decision-service call.
    pub async fn enforce(
        &self,
        identity: &Identity,
        mut response: Response,
    ) -> Result<Response, PolicyCheckError> {
        if response.disclaimer_added {
            return Ok(response);
        }

        let contains_advice = self.classifier.is_advice(&response.answer);
        if !contains_advice {
            return Ok(response);
        }

        let required = match &self.backend {
            DecisionBackend::Live(decider) => {
                let request = ResponseContentRequest { contains_advice };
                check_request(decider.as_ref(), &identity.user_id, &request).await?
            }
            DecisionBackend::Degraded => {
                tracing::warn!(
                    target: "finguard.degraded",
                    gate = "compliance",
                    user_id = %identity.user_id,
                    always_disclaim = self.always_disclaim,
                    "decision service not configured; applying degraded compliance"
                );
                response.insert_metadata(COMPLIANCE_MODE_KEY, "degraded");
                self.always_disclaim
            }
        };

        if required {
            response.answer.push_str(DISCLAIMER);
            response.disclaimer_added = true;
            response.includes_advice = true;
        }
        tracing::info!(
            target: "finguard.compliance",
            user_id = %identity.user_id,
            contains_advice,
            disclaimer_added = response.disclaimer_added,
            "response enforced"
        );
        Ok(response)
    }
}
