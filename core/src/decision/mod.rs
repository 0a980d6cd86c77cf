//! Decision-service capability and the typed requests sent to it.

mod fixed;
mod request;
mod r#trait;

use std::sync::Arc;

use crate::error::PolicyCheckError;

pub use fixed::{FixedDecider, RecordedCheck};
pub use request::{AdviceRequest, CheckResource, ResourceRequest, ResponseContentRequest};
pub use r#trait::PolicyDecider;

/// How the gates reach a decision, chosen once at composition time.
#[derive(Clone)]
pub enum DecisionBackend {
    /// Every check goes to the decision service.
    Live(Arc<dyn PolicyDecider>),
    /// No decision service is configured; gates apply their documented
    /// fallbacks and emit a warning each time.
    Degraded,
}

impl DecisionBackend {
    pub fn live(decider: Arc<dyn PolicyDecider>) -> Self {
        DecisionBackend::Live(decider)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, DecisionBackend::Degraded)
    }

    pub fn name(&self) -> &str {
        match self {
            DecisionBackend::Live(d) => d.name(),
            DecisionBackend::Degraded => "degraded",
        }
    }
}

/// Sends a typed request and attaches the check's identity to any failure.
pub async fn check_request<R: ResourceRequest>(
    decider: &dyn PolicyDecider,
    subject: &str,
    request: &R,
) -> Result<bool, PolicyCheckError> {
    let resource = request.to_resource();
    tracing::debug!(
        target: "finguard.decision",
        decider = %decider.name(),
        subject,
        action = R::ACTION,
        resource_type = R::RESOURCE_TYPE,
        "permission check"
    );
    match decider.check(subject, R::ACTION, &resource).await {
        Ok(allowed) => {
            tracing::debug!(
                target: "finguard.decision",
                subject,
                action = R::ACTION,
                allowed,
                "permission check answered"
            );
            Ok(allowed)
        }
        Err(source) => {
            tracing::error!(
                target: "finguard.decision",
                subject,
                action = R::ACTION,
                resource_type = R::RESOURCE_TYPE,
                retryable = source.is_retryable(),
                error = %source,
                "permission check failed"
            );
            Err(PolicyCheckError {
                subject: subject.to_string(),
                action: R::ACTION.to_string(),
                resource_type: R::RESOURCE_TYPE.to_string(),
                source,
            })
        }
    }
}

impl std::fmt::Debug for DecisionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionBackend::Live(d) => f.debug_tuple("Live").field(&d.name()).finish(),
            DecisionBackend::Degraded => f.write_str("Degraded"),
        }
    }
}
