use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{Identity, Response};

use super::ContentGenerator;

/// Returns the same answer for every prompt and counts invocations.
#[derive(Debug)]
pub struct CannedGenerator {
    answer: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _context: &Identity,
    ) -> Result<Response, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.answer.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(Response::new(self.answer.clone()))
    }
}
