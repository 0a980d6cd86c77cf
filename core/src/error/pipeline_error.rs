use thiserror::Error;

use super::PolicyCheckError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to start generator: {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("generator exited unexpectedly: code={code}: {stderr_tail}")]
    UnexpectedExit { code: i32, stderr_tail: String },

    #[error("generator output decode error (utf-8)")]
    Decode(#[source] std::string::FromUtf8Error),

    #[error("generator returned an empty answer")]
    Empty,
}

/// Hard failures of a request. A denial is not one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("security check failed")]
    Security(#[from] PolicyCheckError),

    #[error("content generation failed")]
    Generation(#[from] GenerationError),
}
