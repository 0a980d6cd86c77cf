use std::sync::Arc;

use serde::Serialize;

use crate::classifier::AdviceClassifier;
use crate::decision::{check_request, AdviceRequest, DecisionBackend};
use crate::error::PolicyCheckError;
use crate::types::{Identity, Query};

pub const REASON_NOT_OPTED_IN: &str =
    "User has not opted in to receive AI-generated financial advice";
pub const REASON_NO_PERMISSION: &str = "User does not have permission to access this information";
pub const REASON_SERVICE_UNAVAILABLE: &str =
    "Authorization service is unavailable; AI-generated advice is disabled";

/// Outcome of the pre-generation check. A denial is a business result, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Authorization {
    Allowed,
    /// Allowed without consulting the decision service.
    AllowedDegraded,
    Denied { reason: String },
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            Authorization::Allowed | Authorization::AllowedDegraded
        )
    }

    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            Authorization::Denied { reason } => Some(reason),
            _ => None,
        }
    }
}

pub struct AuthorizationGate {
    backend: DecisionBackend,
    classifier: Arc<dyn AdviceClassifier>,
    fail_open: bool,
}

impl AuthorizationGate {
    /// `fail_open` only applies when `backend` is degraded.
    pub fn new(
        backend: DecisionBackend,
        classifier: Arc<dyn AdviceClassifier>,
        fail_open: bool,
    ) -> Self {
        Self {
            backend,
            classifier,
            fail_open,
        }
    }

    pub fn backend(&self) -> &DecisionBackend {
        &self.backend
    }

    pub async fn authorize(
        &self,
        identity: &Identity,
        query: &Query,
    ) -> Result<Authorization, PolicyCheckError> {
        let seeking_advice = self.classifier.is_advice(&query.question);

        let decider = match &self.backend {
            DecisionBackend::Live(d) => d,
            DecisionBackend::Degraded => {
                tracing::warn!(
                    target: "finguard.degraded",
                    gate = "authorization",
                    user_id = %identity.user_id,
                    seeking_advice,
                    fail_open = self.fail_open,
                    "decision service not configured; applying degraded authorization"
                );
                return Ok(if self.fail_open {
                    Authorization::AllowedDegraded
                } else {
                    Authorization::Denied {
                        reason: REASON_SERVICE_UNAVAILABLE.to_string(),
                    }
                });
            }
        };

        let request = AdviceRequest {
            is_ai_generated: seeking_advice,
        };
        let permitted = check_request(decider.as_ref(), &identity.user_id, &request).await?;

        if permitted {
            tracing::info!(
                target: "finguard.auth",
                user_id = %identity.user_id,
                seeking_advice,
                "authorized"
            );
            return Ok(Authorization::Allowed);
        }

        let reason = if seeking_advice {
            REASON_NOT_OPTED_IN
        } else {
            REASON_NO_PERMISSION
        };
        tracing::info!(
            target: "finguard.auth",
            user_id = %identity.user_id,
            seeking_advice,
            reason,
            "denied"
        );
        Ok(Authorization::Denied {
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::decision::FixedDecider;
    use crate::error::DecisionError;
    use crate::model::keys;
    use serde_json::json;

    fn gate(decider: Arc<FixedDecider>) -> AuthorizationGate {
        AuthorizationGate::new(
            DecisionBackend::live(decider),
            Arc::new(KeywordClassifier::query_default()),
            true,
        )
    }

    #[tokio::test]
    async fn denial_reason_depends_on_advice_seeking() {
        let decider = Arc::new(FixedDecider::deny());
        let g = gate(decider.clone());
        let who = Identity::example_restricted();

        let seeking = Query::new("Should I buy index funds?", who.clone());
        assert_eq!(
            g.authorize(&who, &seeking).await.unwrap(),
            Authorization::Denied {
                reason: REASON_NOT_OPTED_IN.into()
            }
        );

        let plain = Query::new("What is an index fund?", who.clone());
        assert_eq!(
            g.authorize(&who, &plain).await.unwrap().denial_reason(),
            Some(REASON_NO_PERMISSION)
        );
    }

    #[tokio::test]
    async fn sends_typed_advice_request() {
        let decider = Arc::new(FixedDecider::allow());
        let who = Identity::example_premium();
        let q = Query::new("Can you suggest a strategy?", who.clone());
        let before = (who.clone(), q.clone());

        assert_eq!(
            gate(decider.clone()).authorize(&who, &q).await.unwrap(),
            Authorization::Allowed
        );
        assert_eq!((who, q), before);

        let calls = decider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].subject, "user@example.com");
        assert_eq!(calls[0].action, keys::RECEIVE);
        assert_eq!(calls[0].resource.resource_type, keys::FINANCIAL_ADVICE);
        assert_eq!(
            calls[0].resource.attributes.get(keys::IS_AI_GENERATED),
            Some(&json!(true))
        );
    }

    #[tokio::test]
    async fn service_failure_is_an_error_not_a_denial() {
        let decider = Arc::new(FixedDecider::timing_out());
        let who = Identity::example_premium();
        let q = Query::new("recommend something", who.clone());
        let err = gate(decider).authorize(&who, &q).await.unwrap_err();
        assert_eq!(err.action, keys::RECEIVE);
        assert_eq!(err.resource_type, keys::FINANCIAL_ADVICE);
        assert!(matches!(err.source, DecisionError::Timeout { .. }));
    }

    #[tokio::test]
    async fn degraded_mode_is_flagged() {
        let who = Identity::example_restricted();
        let q = Query::new("should i sell?", who.clone());
        let classifier = Arc::new(KeywordClassifier::query_default());

        let open = AuthorizationGate::new(DecisionBackend::Degraded, classifier.clone(), true);
        assert_eq!(
            open.authorize(&who, &q).await.unwrap(),
            Authorization::AllowedDegraded
        );

        let closed = AuthorizationGate::new(DecisionBackend::Degraded, classifier, false);
        let result = closed.authorize(&who, &q).await.unwrap();
        assert!(!result.is_allowed());
        assert_eq!(result.denial_reason(), Some(REASON_SERVICE_UNAVAILABLE));
    }
}
