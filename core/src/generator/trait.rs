use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{Identity, Response};

/// Opaque text generation. Implementations return an unclassified
/// [`Response`]; compliance flags are owned by the compliance gate.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, context: &Identity) -> Result<Response, GenerationError>;
}
