use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::DecisionError;

use super::{CheckResource, PolicyDecider};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCheck {
    pub subject: String,
    pub action: String,
    pub resource: CheckResource,
}

#[derive(Debug, Clone, Copy)]
enum Answer {
    Allow(bool),
    Fail(FailKind),
}

#[derive(Debug, Clone, Copy)]
enum FailKind {
    Timeout,
    Unauthorized,
    Unavailable,
}

/// In-process decider with a fixed answer. Records every call so tests can
/// assert what was asked.
#[derive(Debug)]
pub struct FixedDecider {
    answer: Answer,
    per_action: HashMap<String, Answer>,
    calls: Mutex<Vec<RecordedCheck>>,
}

impl FixedDecider {
    pub fn allow() -> Self {
        Self::with(Answer::Allow(true))
    }

    pub fn deny() -> Self {
        Self::with(Answer::Allow(false))
    }

    pub fn answering(allowed: bool) -> Self {
        Self::with(Answer::Allow(allowed))
    }

    pub fn timing_out() -> Self {
        Self::with(Answer::Fail(FailKind::Timeout))
    }

    pub fn unauthorized() -> Self {
        Self::with(Answer::Fail(FailKind::Unauthorized))
    }

    pub fn unavailable() -> Self {
        Self::with(Answer::Fail(FailKind::Unavailable))
    }

    fn with(answer: Answer) -> Self {
        Self {
            answer,
            per_action: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the answer for one action.
    pub fn with_action(mut self, action: &str, allowed: bool) -> Self {
        self.per_action
            .insert(action.to_string(), Answer::Allow(allowed));
        self
    }

    /// Makes one action fail as if the service were unreachable.
    pub fn failing_action(mut self, action: &str) -> Self {
        self.per_action
            .insert(action.to_string(), Answer::Fail(FailKind::Unavailable));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCheck> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl PolicyDecider for FixedDecider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn check(
        &self,
        subject: &str,
        action: &str,
        resource: &CheckResource,
    ) -> Result<bool, DecisionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCheck {
                subject: subject.to_string(),
                action: action.to_string(),
                resource: resource.clone(),
            });
        }
        let answer = self.per_action.get(action).unwrap_or(&self.answer);
        match *answer {
            Answer::Allow(allowed) => Ok(allowed),
            Answer::Fail(FailKind::Timeout) => Err(DecisionError::Timeout { timeout_ms: 0 }),
            Answer::Fail(FailKind::Unauthorized) => Err(DecisionError::Unauthorized),
            Answer::Fail(FailKind::Unavailable) => Err(DecisionError::Transport(
                anyhow::anyhow!("decision service unavailable"),
            )),
        }
    }
}
