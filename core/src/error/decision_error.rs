use thiserror::Error;

/// Failure of the decision-service call itself.
///
/// A `false` answer is never an error; these variants cover only the cases
/// where no answer was obtained.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision service timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("decision service unreachable")]
    Transport(#[source] anyhow::Error),

    #[error("decision service rejected credentials")]
    Unauthorized,

    #[error("decision service returned unexpected status {status}: {body_snippet}")]
    HttpStatus { status: u16, body_snippet: String },

    #[error("decision service response could not be decoded")]
    Decode(#[source] anyhow::Error),
}

impl DecisionError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DecisionError::Timeout { .. } | DecisionError::Transport(_)
        ) || matches!(self, DecisionError::HttpStatus { status, .. } if *status >= 500)
    }
}

/// A policy check that could not be completed, with the check it belonged to.
#[derive(Debug, Error)]
#[error("permission check failed: subject={subject} action={action} resource={resource_type}")]
pub struct PolicyCheckError {
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    #[source]
    pub source: DecisionError,
}

pub type SecurityError = PolicyCheckError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_error_names_the_check() {
        let err = PolicyCheckError {
            subject: "user@example.com".into(),
            action: "receive".into(),
            resource_type: "financial_advice".into(),
            source: DecisionError::Timeout { timeout_ms: 250 },
        };
        let msg = err.to_string();
        assert!(msg.contains("user@example.com"));
        assert!(msg.contains("receive"));
        assert!(msg.contains("financial_advice"));
        assert!(std::error::Error::source(&err)
            .map(|s| s.to_string().contains("250ms"))
            .unwrap_or(false));
    }

    #[test]
    fn retryable_classification() {
        assert!(DecisionError::Timeout { timeout_ms: 1 }.is_retryable());
        assert!(DecisionError::HttpStatus {
            status: 503,
            body_snippet: String::new()
        }
        .is_retryable());
        assert!(!DecisionError::Unauthorized.is_retryable());
        assert!(!DecisionError::HttpStatus {
            status: 400,
            body_snippet: String::new()
        }
        .is_retryable());
    }
}
