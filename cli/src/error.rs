use finguard_core::api::{ConfigError, PipelineError, ProvisionError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid policy model")]
    Model(#[from] ValidationError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Exit code for any failure that is not a business denial.
pub const EXIT_ERROR: i32 = 1;

impl CliError {
    /// The message and every underlying cause, outermost first.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
